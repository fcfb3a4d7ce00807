//! UDP transport for the discovery exchange.
//!
//! Uses SO_REUSEPORT on the responder side so a node can share the
//! discovery port with other listeners on the same host.

pub mod client;
pub mod node;

pub use client::{resolve_target, DiscoveryClient};
pub use node::ResponderNode;

use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};

/// Default UDP discovery port
pub const DISCOVERY_PORT: u16 = 3993;

/// Largest datagram either side will process
pub(crate) const MAX_DATAGRAM: usize = 2048;

/// Create a UDP socket with SO_REUSEADDR/SO_REUSEPORT bound to `port`.
pub fn create_reusable_socket(port: u16) -> Result<std::net::UdpSocket, std::io::Error> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

    socket.set_reuse_address(true)?;

    #[cfg(unix)]
    socket.set_reuse_port(true)?;

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    socket.bind(&addr.into())?;

    socket.set_nonblocking(true)?;

    Ok(socket.into())
}
