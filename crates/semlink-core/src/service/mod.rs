//! Device-side discovery services.
//!
//! Inbound messages are routed through an explicit registry mapping
//! message kind to a handler. Handlers answer through a [`ReplyEmitter`]
//! supplied by the hosting node, so the same handlers run against a real
//! UDP socket or a recording stub in tests.

pub mod identity;
pub mod semantic;

pub use identity::IdentityQueryHandler;
pub use semantic::SemanticQueryHandler;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::device::LocalDevice;
use crate::error::Result;
use crate::protocol::{Message, MessageKind};

/// Collaborator primitive for sending one reply. Emission is
/// fire-and-forget: no acknowledgement, no retry.
pub trait ReplyEmitter {
    fn emit(&mut self, message: Message, destination: SocketAddr);
}

/// One unit of inbound message handling. Handlers are stateless across
/// requests; each call must run to completion without blocking.
pub trait InboundHandler: Send + Sync {
    fn handle(
        &self,
        source: SocketAddr,
        message: &Message,
        emitter: &mut dyn ReplyEmitter,
    ) -> Result<()>;
}

/// Registry of inbound handlers, populated once at node construction.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<MessageKind, Box<dyn InboundHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`, replacing any previous handler.
    pub fn register(&mut self, kind: MessageKind, handler: Box<dyn InboundHandler>) {
        self.handlers.insert(kind, handler);
    }

    /// The standard responder registry for one device.
    pub fn for_device(device: Arc<LocalDevice>) -> Self {
        let mut registry = Self::new();
        registry.register(
            MessageKind::IdentityQuery,
            Box::new(IdentityQueryHandler::new(device.clone())),
        );
        registry.register(
            MessageKind::SemanticQuery,
            Box::new(SemanticQueryHandler::new(device)),
        );
        registry
    }

    /// Dispatch one inbound message. Kinds with no handler are ignored;
    /// this node is a responder and inbound replies mean nothing to it.
    pub fn dispatch(
        &self,
        source: SocketAddr,
        message: &Message,
        emitter: &mut dyn ReplyEmitter,
    ) -> Result<()> {
        match self.handlers.get(&message.kind()) {
            Some(handler) => handler.handle(source, message, emitter),
            None => {
                tracing::trace!(?source, kind = ?message.kind(), "no handler, ignoring");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Records emissions instead of sending them.
    #[derive(Default)]
    pub struct RecordingEmitter {
        pub sent: Vec<(Message, SocketAddr)>,
    }

    impl ReplyEmitter for RecordingEmitter {
        fn emit(&mut self, message: Message, destination: SocketAddr) {
            self.sent.push((message, destination));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingEmitter;
    use super::*;
    use crate::protocol::DiscoveryReply;
    use crate::types::ObjectId;

    #[test]
    fn test_dispatch_ignores_unhandled_kinds() {
        let registry = HandlerRegistry::new();
        let mut emitter = RecordingEmitter::default();

        let reply = Message::DiscoveryReply(DiscoveryReply {
            device_identifier: ObjectId::device(1),
            object_identifier: ObjectId::new("analog-input", 2),
            object_name: "x".to_string(),
        });

        registry
            .dispatch("10.0.0.9:50000".parse().unwrap(), &reply, &mut emitter)
            .unwrap();
        assert!(emitter.sent.is_empty());
    }
}
