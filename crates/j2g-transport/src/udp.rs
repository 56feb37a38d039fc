//! UDP transport: one connected datagram socket to the collector.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use tokio::net::{lookup_host, UdpSocket};
use tracing::debug;

use crate::error::TransportError;
use crate::Transport;

#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Resolve `addr` (`host:port`), bind an ephemeral local port of the same
    /// address family and connect the socket to the first resolved address.
    pub async fn connect(addr: &str) -> Result<Self, TransportError> {
        let peer = lookup_host(addr)
            .await
            .map_err(|source| TransportError::Resolve {
                addr: addr.to_string(),
                source,
            })?
            .next()
            .ok_or_else(|| TransportError::NoAddress(addr.to_string()))?;

        let local: SocketAddr = match peer {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let connect_err = |source| TransportError::Connect {
            addr: addr.to_string(),
            source,
        };
        let socket = UdpSocket::bind(local).await.map_err(connect_err)?;
        socket.connect(peer).await.map_err(connect_err)?;

        debug!(%peer, local = ?socket.local_addr().ok(), "udp transport connected");
        Ok(Self { socket, peer })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl Transport for UdpTransport {
    async fn send(&self, payload: &[u8]) -> io::Result<()> {
        let written = self.socket.send(payload).await?;
        if written != payload.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("datagram truncated: {written} of {} bytes", payload.len()),
            ));
        }
        Ok(())
    }
}
