//! The responder node: one UDP socket, one receive loop.
//!
//! Each datagram triggers exactly one synchronous dispatch through the
//! handler registry, in arrival order. Failures while handling one
//! datagram are logged and never affect the next one.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;

use crate::device::LocalDevice;
use crate::error::Result;
use crate::protocol::{decode, encode, Message};
use crate::service::{HandlerRegistry, ReplyEmitter};

use super::{create_reusable_socket, MAX_DATAGRAM};

/// Queues replies during dispatch; the node flushes the queue afterwards.
#[derive(Default)]
struct ReplyQueue {
    queued: Vec<(Message, SocketAddr)>,
}

impl ReplyEmitter for ReplyQueue {
    fn emit(&mut self, message: Message, destination: SocketAddr) {
        self.queued.push((message, destination));
    }
}

/// UDP discovery responder hosting a [`LocalDevice`].
pub struct ResponderNode {
    socket: UdpSocket,
    registry: HandlerRegistry,
}

impl ResponderNode {
    /// Bind the discovery socket and build the handler registry for
    /// `device`.
    pub async fn bind(port: u16, device: Arc<LocalDevice>) -> Result<Self> {
        let std_socket = create_reusable_socket(port)?;
        let socket = UdpSocket::from_std(std_socket)?;
        tracing::info!(addr = %socket.local_addr()?, "discovery responder listening");

        Ok(Self {
            socket,
            registry: HandlerRegistry::for_device(device),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Serve until the task is cancelled.
    pub async fn run(self) -> Result<()> {
        let mut buf = vec![0u8; MAX_DATAGRAM];

        loop {
            let (len, source) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    tracing::warn!(error = %e, "UDP receive error");
                    continue;
                }
            };

            self.serve_datagram(&buf[..len], source).await;
        }
    }

    /// Handle one datagram: decode, dispatch, flush queued replies.
    async fn serve_datagram(&self, datagram: &[u8], source: SocketAddr) {
        // Best-effort transport: datagrams that are not discovery
        // messages are dropped without ceremony.
        let message = match decode(datagram, &source.to_string()) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(%source, error = %e, "ignoring malformed datagram");
                return;
            }
        };

        let mut replies = ReplyQueue::default();
        if let Err(e) = self.registry.dispatch(source, &message, &mut replies) {
            // Request isolation: a rejected request never takes the loop
            // down with it.
            tracing::warn!(%source, error = %e, "request rejected");
            return;
        }

        for (reply, destination) in replies.queued {
            let bytes = match encode(&reply) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode reply");
                    continue;
                }
            };
            // Fire-and-forget: loss is tolerated by protocol design.
            if let Err(e) = self.socket.send_to(&bytes, destination).await {
                tracing::debug!(%destination, error = %e, "reply send failed");
            }
        }
    }
}
