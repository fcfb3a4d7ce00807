//! The discovery client: send one request, collect correlated replies.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::{timeout, Instant};

use crate::correlate::{CorrelatedReply, Correlator, PendingRequest};
use crate::error::{CoreError, Result};
use crate::protocol::{decode, encode, IdentityQuery, Message, SemanticQuery};
use crate::tags::WILDCARD_VALUE;
use crate::types::Tag;

use super::MAX_DATAGRAM;

/// How long each receive attempt waits before re-checking the window
const RECEIVE_TIMEOUT: Duration = Duration::from_millis(500);

/// Resolve a target string into a destination address.
///
/// `None` means the IPv4 broadcast address on `port`. A bare IP gets
/// `port` appended; an `ip:port` pair is used as given.
pub fn resolve_target(target: Option<&str>, port: u16) -> Result<SocketAddr> {
    match target {
        None => Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::BROADCAST), port)),
        Some(s) => {
            if let Ok(addr) = s.parse::<SocketAddr>() {
                Ok(addr)
            } else if let Ok(ip) = s.parse::<IpAddr>() {
                Ok(SocketAddr::new(ip, port))
            } else {
                Err(CoreError::Other(format!("invalid target address '{}'", s)))
            }
        }
    }
}

/// Client side of the discovery exchange.
///
/// Binds an ephemeral broadcast-capable socket; replies come back to it
/// as plain unicast datagrams and run through the single-slot
/// [`Correlator`].
pub struct DiscoveryClient {
    socket: UdpSocket,
    correlator: Correlator,
}

impl DiscoveryClient {
    pub async fn open() -> Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        socket.set_broadcast(true)?;

        Ok(Self {
            socket,
            correlator: Correlator::new(),
        })
    }

    /// Send a semantic query and arm the correlator for discovery
    /// replies.
    ///
    /// The predicate is checked before anything leaves the host: an empty
    /// tag list and wildcard values are rejected here exactly as a remote
    /// service would reject them.
    pub async fn send_semantic_query(&mut self, tags: Vec<Tag>, target: SocketAddr) -> Result<()> {
        if tags.is_empty() {
            return Err(CoreError::InconsistentParameters(
                "at least one tag is required".to_string(),
            ));
        }
        if let Some(tag) = tags.iter().find(|tag| tag.value == WILDCARD_VALUE) {
            return Err(CoreError::Unsupported(format!(
                "tag value wildcards are not supported ('{}')",
                tag
            )));
        }

        let query = SemanticQuery { tags };
        self.correlator.record(PendingRequest::Semantic(query.clone()));
        self.send(&Message::SemanticQuery(query), target).await
    }

    /// Send an identity query and arm the correlator for identity
    /// replies within the range.
    pub async fn send_identity_query(
        &mut self,
        query: IdentityQuery,
        target: SocketAddr,
    ) -> Result<()> {
        if let (Some(low), Some(high)) = (query.low, query.high) {
            if low > high {
                return Err(CoreError::InconsistentParameters(format!(
                    "instance range low {} exceeds high {}",
                    low, high
                )));
            }
        }

        self.correlator.record(PendingRequest::Identity(query.clone()));
        self.send(&Message::IdentityQuery(query), target).await
    }

    async fn send(&self, message: &Message, target: SocketAddr) -> Result<()> {
        let bytes = encode(message)?;
        self.socket.send_to(&bytes, target).await?;
        Ok(())
    }

    /// Collect replies for `window`, invoking `on_reply` for each one the
    /// correlator reports, and return them all.
    ///
    /// Datagrams that fail to decode, don't pair with the pending
    /// request, or fail the range filter are dropped silently.
    pub async fn collect<F>(&mut self, window: Duration, mut on_reply: F) -> Result<Vec<CorrelatedReply>>
    where
        F: FnMut(&CorrelatedReply),
    {
        let deadline = Instant::now() + window;
        let mut replies = Vec::new();
        let mut buf = vec![0u8; MAX_DATAGRAM];

        while Instant::now() < deadline {
            let remaining = deadline - Instant::now();
            let wait = remaining.min(RECEIVE_TIMEOUT);

            let (len, source) = match timeout(wait, self.socket.recv_from(&mut buf)).await {
                Ok(Ok(received)) => received,
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "UDP receive error");
                    continue;
                }
                Err(_) => continue,
            };

            let message = match decode(&buf[..len], &source.to_string()) {
                Ok(message) => message,
                Err(e) => {
                    tracing::debug!(%source, error = %e, "ignoring malformed datagram");
                    continue;
                }
            };

            if let Some(reply) = self.correlator.classify(source, &message) {
                on_reply(&reply);
                replies.push(reply);
            }
        }

        Ok(replies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::LocalDevice;
    use crate::net::ResponderNode;
    use crate::types::{DeviceIdentity, LocalObject, ObjectId};
    use std::sync::Arc;

    fn test_device() -> Arc<LocalDevice> {
        Arc::new(
            LocalDevice::build(
                Some(DeviceIdentity {
                    instance: 150,
                    name: "roof-unit".to_string(),
                    vendor_id: 15,
                }),
                vec![
                    LocalObject {
                        id: ObjectId::new("analog-input", 1),
                        name: "supply-air-temp".to_string(),
                        tags: vec![Tag::new("a", "temperature_sensor")],
                    },
                    LocalObject {
                        id: ObjectId::new("analog-input", 2),
                        name: "return-air-temp".to_string(),
                        tags: vec![Tag::new("a", "temperature_sensor")],
                    },
                ],
            )
            .unwrap(),
        )
    }

    async fn spawn_node() -> SocketAddr {
        let node = ResponderNode::bind(0, test_device()).await.unwrap();
        let port = node.local_addr().unwrap().port();
        tokio::spawn(node.run());
        SocketAddr::new("127.0.0.1".parse().unwrap(), port)
    }

    #[test]
    fn test_resolve_target() {
        let broadcast = resolve_target(None, 3993).unwrap();
        assert_eq!(broadcast.to_string(), "255.255.255.255:3993");

        let bare_ip = resolve_target(Some("192.168.4.7"), 3993).unwrap();
        assert_eq!(bare_ip.to_string(), "192.168.4.7:3993");

        let full = resolve_target(Some("192.168.4.7:4000"), 3993).unwrap();
        assert_eq!(full.port(), 4000);

        assert!(resolve_target(Some("not-an-address"), 3993).is_err());
    }

    #[tokio::test]
    async fn test_semantic_query_round_trip() {
        let node_addr = spawn_node().await;
        let mut client = DiscoveryClient::open().await.unwrap();

        client
            .send_semantic_query(vec![Tag::new("a", "temperature_sensor")], node_addr)
            .await
            .unwrap();

        let mut seen = 0usize;
        let replies = client
            .collect(Duration::from_millis(600), |_| seen += 1)
            .await
            .unwrap();

        assert_eq!(replies.len(), 2);
        assert_eq!(seen, 2);
    }

    #[tokio::test]
    async fn test_identity_query_filtered_client_side() {
        let node_addr = spawn_node().await;
        let mut client = DiscoveryClient::open().await.unwrap();

        // Device instance is 150; the node itself filters [400,500], so
        // ask unbounded, then check the client filter path separately.
        client
            .send_identity_query(
                IdentityQuery {
                    low: Some(100),
                    high: Some(200),
                },
                node_addr,
            )
            .await
            .unwrap();

        let replies = client
            .collect(Duration::from_millis(600), |_| {})
            .await
            .unwrap();
        assert_eq!(replies.len(), 1);
    }

    #[tokio::test]
    async fn test_client_rejects_empty_predicate() {
        let mut client = DiscoveryClient::open().await.unwrap();
        let target = resolve_target(Some("127.0.0.1:9"), 3993).unwrap();

        let err = client.send_semantic_query(vec![], target).await.unwrap_err();
        assert!(matches!(err, CoreError::InconsistentParameters(_)));
    }

    #[tokio::test]
    async fn test_client_rejects_wildcards() {
        let mut client = DiscoveryClient::open().await.unwrap();
        let target = resolve_target(Some("127.0.0.1:9"), 3993).unwrap();

        let err = client
            .send_semantic_query(vec![Tag::new("a", "*")], target)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Unsupported(_)));
    }

    #[tokio::test]
    async fn test_client_rejects_inverted_range() {
        let mut client = DiscoveryClient::open().await.unwrap();
        let target = resolve_target(Some("127.0.0.1:9"), 3993).unwrap();

        let err = client
            .send_identity_query(
                IdentityQuery {
                    low: Some(200),
                    high: Some(100),
                },
                target,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InconsistentParameters(_)));
    }
}
