//! Request/response correlation for the discovery client.
//!
//! Discovery exchanges are connectionless and carry no correlation
//! identifier, so the client lines replies up against the most recently
//! sent request. One slot: sending a new request supersedes the previous
//! one, and concurrent outstanding queries are deliberately not supported.

use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::protocol::{DiscoveryReply, IdentityQuery, IdentityReply, Message, SemanticQuery};

/// The request currently waiting for replies.
#[derive(Debug, Clone)]
pub enum PendingRequest {
    Identity(IdentityQuery),
    Semantic(SemanticQuery),
}

/// A reply that paired with the pending request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelatedReply {
    /// Address the reply arrived from
    pub source: SocketAddr,
    /// Local receive time
    pub received_at: DateTime<Utc>,
    #[serde(flatten)]
    pub body: ReplyBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ReplyBody {
    #[serde(rename = "identity-reply")]
    Identity(IdentityReply),
    #[serde(rename = "discovery-reply")]
    Discovery(DiscoveryReply),
}

/// Single-slot correlator.
#[derive(Debug, Default)]
pub struct Correlator {
    pending: Option<PendingRequest>,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sent request, superseding any prior pending one.
    pub fn record(&mut self, request: PendingRequest) {
        self.pending = Some(request);
    }

    pub fn pending(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    /// Decide whether an inbound message is a reply to the pending
    /// request.
    ///
    /// Identity replies pass through the inclusive instance-range filter
    /// carried by the original query; out-of-range replies are dropped
    /// without error. Discovery replies to a semantic request are always
    /// reported. Every other pairing, and anything received with no
    /// request pending, is ignored.
    pub fn classify(&self, source: SocketAddr, message: &Message) -> Option<CorrelatedReply> {
        let body = match (self.pending.as_ref()?, message) {
            (PendingRequest::Identity(request), Message::IdentityReply(reply)) => {
                if !request.matches_instance(reply.device_instance) {
                    tracing::debug!(
                        %source,
                        instance = reply.device_instance,
                        "identity reply outside requested range, dropped"
                    );
                    return None;
                }
                ReplyBody::Identity(reply.clone())
            }
            (PendingRequest::Semantic(_), Message::DiscoveryReply(reply)) => {
                ReplyBody::Discovery(reply.clone())
            }
            _ => return None,
        };

        Some(CorrelatedReply {
            source,
            received_at: Utc::now(),
            body,
        })
    }
}
