use super::DnsTransport;
use async_trait::async_trait;
use sinkhole_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP, one ephemeral socket per exchange.
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn timeout_error(&self) -> DomainError {
        DomainError::TransportTimeout {
            server: self.server_addr.to_string(),
        }
    }

    fn io_error(&self, context: &str, e: std::io::Error) -> DomainError {
        DomainError::Transport {
            server: self.server_addr.to_string(),
            reason: format!("{}: {}", context, e),
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    /// Send `message_bytes` and wait for the datagram carrying the same id.
    ///
    /// Datagrams from other addresses or with another id are discarded;
    /// `timeout` bounds the whole exchange.
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        if message_bytes.len() < 2 {
            return Err(DomainError::InvalidDnsMessage(
                "query shorter than a message id".into(),
            ));
        }
        let expected_id = [message_bytes[0], message_bytes[1]];

        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr: SocketAddr = if self.server_addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| self.io_error("failed to bind UDP socket", e))?;

        let deadline = Instant::now() + timeout;

        let bytes_sent = tokio::time::timeout_at(deadline, socket.send_to(message_bytes, self.server_addr))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| self.io_error("failed to send UDP query", e))?;

        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let (bytes_received, from_addr) =
                tokio::time::timeout_at(deadline, socket.recv_from(&mut recv_buf))
                    .await
                    .map_err(|_| self.timeout_error())?
                    .map_err(|e| self.io_error("failed to receive UDP response", e))?;

            if from_addr != self.server_addr {
                warn!(
                    expected = %self.server_addr,
                    received_from = %from_addr,
                    "UDP response from unexpected source"
                );
                continue;
            }

            if bytes_received < 2 || recv_buf[..2] != expected_id {
                debug!(server = %self.server_addr, "Discarding UDP response with mismatched id");
                continue;
            }

            recv_buf.truncate(bytes_received);

            debug!(server = %self.server_addr, bytes_received, "UDP response received");

            return Ok(recv_buf);
        }
    }

    fn server(&self) -> String {
        self.server_addr.to_string()
    }
}
