//! Discovery wire messages.
//!
//! Messages travel as single JSON datagrams tagged by a `kind` field.
//! Addressing, segmentation, and delivery guarantees stay with the
//! transport; this module only maps datagram bytes to typed messages.

pub mod messages;

pub use messages::{
    decode, encode, DiscoveryReply, IdentityQuery, IdentityReply, Message, MessageKind,
    SemanticQuery,
};
