//! Message definitions and JSON codec.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::types::{ObjectId, Tag};

/// Every discovery message exchanged between nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Message {
    IdentityQuery(IdentityQuery),
    IdentityReply(IdentityReply),
    SemanticQuery(SemanticQuery),
    DiscoveryReply(DiscoveryReply),
}

/// Message kind, the dispatch key for inbound handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    IdentityQuery,
    IdentityReply,
    SemanticQuery,
    DiscoveryReply,
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::IdentityQuery(_) => MessageKind::IdentityQuery,
            Message::IdentityReply(_) => MessageKind::IdentityReply,
            Message::SemanticQuery(_) => MessageKind::SemanticQuery,
            Message::DiscoveryReply(_) => MessageKind::DiscoveryReply,
        }
    }
}

/// Ask devices in an instance range to announce themselves. Absent bounds
/// leave that side unbounded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<u32>,
}

impl IdentityQuery {
    /// Inclusive range check used on both sides of the exchange.
    pub fn matches_instance(&self, instance: u32) -> bool {
        if self.low.is_some_and(|low| instance < low) {
            return false;
        }
        if self.high.is_some_and(|high| instance > high) {
            return false;
        }
        true
    }
}

/// A device announcing its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityReply {
    pub device_instance: u32,
    pub device_name: String,
    pub vendor_id: u16,
}

/// Find objects carrying every listed tag. An empty or absent tag list is
/// invalid input, rejected by the receiving service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemanticQuery {
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// One matched object, unicast back to the query source. Never batched:
/// a query matching N objects produces N of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryReply {
    pub device_identifier: ObjectId,
    pub object_identifier: ObjectId,
    pub object_name: String,
}

/// Decode one datagram. `source_addr` only labels the error.
pub fn decode(buf: &[u8], source_addr: &str) -> Result<Message, ProtocolError> {
    serde_json::from_slice(buf).map_err(|e| ProtocolError::Decode {
        source_addr: source_addr.to_string(),
        message: e.to_string(),
    })
}

/// Encode one message as a JSON datagram.
pub fn encode(message: &Message) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(message)?)
}
