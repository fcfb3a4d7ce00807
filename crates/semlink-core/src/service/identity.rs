//! Identity discovery service: announce this device on request.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::device::LocalDevice;
use crate::error::Result;
use crate::protocol::{IdentityReply, Message};
use crate::service::{InboundHandler, ReplyEmitter};

/// Handles inbound identity queries.
///
/// Replies with the local identity when the query's instance range covers
/// it; otherwise stays silent. Range checks are inclusive and an absent
/// bound leaves that side unbounded.
pub struct IdentityQueryHandler {
    device: Arc<LocalDevice>,
}

impl IdentityQueryHandler {
    pub fn new(device: Arc<LocalDevice>) -> Self {
        Self { device }
    }
}

impl InboundHandler for IdentityQueryHandler {
    fn handle(
        &self,
        source: SocketAddr,
        message: &Message,
        emitter: &mut dyn ReplyEmitter,
    ) -> Result<()> {
        let query = match message {
            Message::IdentityQuery(query) => query,
            _ => return Ok(()),
        };

        let Some(identity) = self.device.identity() else {
            tracing::debug!(%source, "identity query ignored: no local device identity");
            return Ok(());
        };

        if !query.matches_instance(identity.instance) {
            tracing::debug!(
                %source,
                instance = identity.instance,
                "identity query range excludes this device"
            );
            return Ok(());
        }

        emitter.emit(
            Message::IdentityReply(IdentityReply {
                device_instance: identity.instance,
                device_name: identity.name.clone(),
                vendor_id: identity.vendor_id,
            }),
            source,
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::IdentityQuery;
    use crate::service::testing::RecordingEmitter;
    use crate::types::DeviceIdentity;

    fn device(instance: Option<u32>) -> Arc<LocalDevice> {
        let identity = instance.map(|instance| DeviceIdentity {
            instance,
            name: "roof-unit".to_string(),
            vendor_id: 15,
        });
        Arc::new(LocalDevice::build(identity, vec![]).unwrap())
    }

    fn source() -> SocketAddr {
        "192.168.4.20:49700".parse().unwrap()
    }

    fn query(low: Option<u32>, high: Option<u32>) -> Message {
        Message::IdentityQuery(IdentityQuery { low, high })
    }

    #[test]
    fn test_replies_when_in_range() {
        let handler = IdentityQueryHandler::new(device(Some(150)));
        let mut emitter = RecordingEmitter::default();

        handler
            .handle(source(), &query(Some(100), Some(200)), &mut emitter)
            .unwrap();

        assert_eq!(emitter.sent.len(), 1);
        assert_eq!(emitter.sent[0].1, source());
        match &emitter.sent[0].0 {
            Message::IdentityReply(reply) => {
                assert_eq!(reply.device_instance, 150);
                assert_eq!(reply.device_name, "roof-unit");
                assert_eq!(reply.vendor_id, 15);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_silent_when_out_of_range() {
        let handler = IdentityQueryHandler::new(device(Some(50)));
        let mut emitter = RecordingEmitter::default();

        handler
            .handle(source(), &query(Some(100), Some(200)), &mut emitter)
            .unwrap();

        assert!(emitter.sent.is_empty());
    }

    #[test]
    fn test_unbounded_query_always_answered() {
        let handler = IdentityQueryHandler::new(device(Some(7)));
        let mut emitter = RecordingEmitter::default();

        handler.handle(source(), &query(None, None), &mut emitter).unwrap();

        assert_eq!(emitter.sent.len(), 1);
    }

    #[test]
    fn test_unconfigured_device_stays_silent() {
        let handler = IdentityQueryHandler::new(device(None));
        let mut emitter = RecordingEmitter::default();

        handler.handle(source(), &query(None, None), &mut emitter).unwrap();

        assert!(emitter.sent.is_empty());
    }
}
