//! Semantic query service: answer tag queries against the local objects.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::device::LocalDevice;
use crate::error::Result;
use crate::protocol::{DiscoveryReply, Message};
use crate::service::{InboundHandler, ReplyEmitter};

/// Handles inbound semantic queries.
///
/// Stateless per request: consult the tag index, emit one discovery reply
/// per matched object back to the query source, remember nothing.
pub struct SemanticQueryHandler {
    device: Arc<LocalDevice>,
}

impl SemanticQueryHandler {
    pub fn new(device: Arc<LocalDevice>) -> Self {
        Self { device }
    }
}

impl InboundHandler for SemanticQueryHandler {
    fn handle(
        &self,
        source: SocketAddr,
        message: &Message,
        emitter: &mut dyn ReplyEmitter,
    ) -> Result<()> {
        let query = match message {
            Message::SemanticQuery(query) => query,
            _ => return Ok(()),
        };

        // An unconfigured node must not participate in discovery.
        let Some(identity) = self.device.identity() else {
            tracing::debug!(%source, "semantic query ignored: no local device identity");
            return Ok(());
        };

        // Rejects empty tag lists (InconsistentParameters) and wildcard
        // values (Unsupported); both surface to the node loop as a logged
        // rejection of this one request.
        let matches = self.device.tag_index().intersect_all(&query.tags)?;

        // No-match policy is silence; broadcast queries must not trigger
        // response storms.
        if matches.is_empty() {
            tracing::debug!(%source, tags = query.tags.len(), "semantic query matched nothing");
            return Ok(());
        }

        for object_id in &matches {
            // The index is rebuilt with the objects, so a member without a
            // backing object cannot occur; skip rather than fail if it does.
            let Some(object) = self.device.object(object_id) else {
                tracing::warn!(%object_id, "tag index member has no backing object");
                continue;
            };

            emitter.emit(
                Message::DiscoveryReply(DiscoveryReply {
                    device_identifier: identity.object_id(),
                    object_identifier: object_id.clone(),
                    object_name: object.name.clone(),
                }),
                source,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::protocol::SemanticQuery;
    use crate::service::testing::RecordingEmitter;
    use crate::types::{DeviceIdentity, LocalObject, ObjectId, Tag};

    fn identity() -> DeviceIdentity {
        DeviceIdentity {
            instance: 599,
            name: "roof-unit".to_string(),
            vendor_id: 15,
        }
    }

    fn device(identity: Option<DeviceIdentity>, objects: Vec<LocalObject>) -> Arc<LocalDevice> {
        Arc::new(LocalDevice::build(identity, objects).unwrap())
    }

    fn object(instance: u32, name: &str, tags: &[(&str, &str)]) -> LocalObject {
        LocalObject {
            id: ObjectId::new("analog-input", instance),
            name: name.to_string(),
            tags: tags.iter().map(|(n, v)| Tag::new(*n, *v)).collect(),
        }
    }

    fn source() -> SocketAddr {
        "192.168.4.20:49700".parse().unwrap()
    }

    fn query(tags: &[(&str, &str)]) -> Message {
        Message::SemanticQuery(SemanticQuery {
            tags: tags.iter().map(|(n, v)| Tag::new(*n, *v)).collect(),
        })
    }

    #[test]
    fn test_no_local_device_means_silence() {
        let handler = SemanticQueryHandler::new(device(
            None,
            vec![object(1, "ai-1", &[("a", "temperature_sensor")])],
        ));
        let mut emitter = RecordingEmitter::default();

        handler
            .handle(source(), &query(&[("a", "temperature_sensor")]), &mut emitter)
            .unwrap();

        assert!(emitter.sent.is_empty());
    }

    #[test]
    fn test_empty_tag_list_is_rejected() {
        let handler = SemanticQueryHandler::new(device(Some(identity()), vec![]));
        let mut emitter = RecordingEmitter::default();

        let err = handler.handle(source(), &query(&[]), &mut emitter).unwrap_err();
        assert!(matches!(err, CoreError::InconsistentParameters(_)));
        assert!(emitter.sent.is_empty());
    }

    #[test]
    fn test_one_reply_per_match_addressed_to_the_source() {
        let handler = SemanticQueryHandler::new(device(
            Some(identity()),
            vec![
                object(1, "supply-air-temp", &[("a", "temperature_sensor"), ("zone", "roof")]),
                object(2, "return-air-temp", &[("a", "temperature_sensor")]),
                object(3, "damper-cmd", &[("a", "damper")]),
            ],
        ));
        let mut emitter = RecordingEmitter::default();

        handler
            .handle(source(), &query(&[("a", "temperature_sensor")]), &mut emitter)
            .unwrap();

        assert_eq!(emitter.sent.len(), 2);
        for (message, destination) in &emitter.sent {
            assert_eq!(*destination, source());
            match message {
                Message::DiscoveryReply(reply) => {
                    assert_eq!(reply.device_identifier, ObjectId::device(599));
                    assert_eq!(reply.object_identifier.object_type, "analog-input");
                }
                other => panic!("unexpected message: {:?}", other),
            }
        }

        let mut named: Vec<_> = emitter
            .sent
            .iter()
            .map(|(m, _)| match m {
                Message::DiscoveryReply(r) => r.object_name.clone(),
                _ => unreachable!(),
            })
            .collect();
        named.sort();
        assert_eq!(named, vec!["return-air-temp", "supply-air-temp"]);
    }

    #[test]
    fn test_conjunction_filters_replies() {
        let handler = SemanticQueryHandler::new(device(
            Some(identity()),
            vec![
                object(1, "supply-air-temp", &[("a", "temperature_sensor"), ("zone", "roof")]),
                object(2, "return-air-temp", &[("a", "temperature_sensor")]),
            ],
        ));
        let mut emitter = RecordingEmitter::default();

        handler
            .handle(
                source(),
                &query(&[("a", "temperature_sensor"), ("zone", "roof")]),
                &mut emitter,
            )
            .unwrap();

        assert_eq!(emitter.sent.len(), 1);
        match &emitter.sent[0].0 {
            Message::DiscoveryReply(reply) => assert_eq!(reply.object_name, "supply-air-temp"),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_zero_matches_means_zero_replies() {
        let handler = SemanticQueryHandler::new(device(
            Some(identity()),
            vec![object(1, "ai-1", &[("a", "temperature_sensor")])],
        ));
        let mut emitter = RecordingEmitter::default();

        handler
            .handle(source(), &query(&[("a", "humidity_sensor")]), &mut emitter)
            .unwrap();

        assert!(emitter.sent.is_empty());
    }

    #[test]
    fn test_wildcard_value_fails_fast() {
        let handler = SemanticQueryHandler::new(device(
            Some(identity()),
            vec![object(1, "ai-1", &[("a", "temperature_sensor")])],
        ));
        let mut emitter = RecordingEmitter::default();

        let err = handler
            .handle(source(), &query(&[("a", "*")]), &mut emitter)
            .unwrap_err();
        assert!(matches!(err, CoreError::Unsupported(_)));
        assert!(emitter.sent.is_empty());
    }

    #[test]
    fn test_non_query_messages_are_ignored() {
        let handler = SemanticQueryHandler::new(device(Some(identity()), vec![]));
        let mut emitter = RecordingEmitter::default();

        let stray = Message::IdentityQuery(crate::protocol::IdentityQuery::default());
        handler.handle(source(), &stray, &mut emitter).unwrap();
        assert!(emitter.sent.is_empty());
    }
}
