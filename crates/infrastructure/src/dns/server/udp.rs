use super::handler::DnsQueryHandler;
use sinkhole_domain::DomainError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Largest datagram accepted from clients (EDNS(0) payload size).
const MAX_DATAGRAM_SIZE: usize = 4096;

/// UDP listener: one receive loop, one spawned task per datagram.
pub struct UdpDnsServer {
    socket: Arc<UdpSocket>,
    handler: Arc<DnsQueryHandler>,
}

impl UdpDnsServer {
    /// Binding failure is fatal to the caller.
    pub async fn bind(addr: SocketAddr, handler: Arc<DnsQueryHandler>) -> Result<Self, DomainError> {
        let socket = UdpSocket::bind(addr).await.map_err(|e| {
            DomainError::IoError(format!("failed to bind DNS listener on {}: {}", addr, e))
        })?;
        Ok(Self {
            socket: Arc::new(socket),
            handler,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DomainError> {
        self.socket
            .local_addr()
            .map_err(|e| DomainError::IoError(e.to_string()))
    }

    /// Serve until `shutdown` is cancelled. In-flight handler tasks finish
    /// on their own.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

        if let Ok(addr) = self.socket.local_addr() {
            info!(addr = %addr, "DNS server listening (UDP)");
        }

        loop {
            let (len, peer) = tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("DNS server shutting down");
                    break;
                }
                received = self.socket.recv_from(&mut buf) => match received {
                    Ok(received) => received,
                    Err(e) => {
                        // ICMP port-unreachable from a previous reply surfaces here on some platforms.
                        debug!(error = %e, "UDP receive error");
                        continue;
                    }
                },
            };

            let datagram = buf[..len].to_vec();
            let socket = Arc::clone(&self.socket);
            let handler = Arc::clone(&self.handler);

            tokio::spawn(async move {
                if let Some(reply) = handler.handle(&datagram).await {
                    if let Err(e) = socket.send_to(&reply, peer).await {
                        warn!(peer = %peer, error = %e, "Failed to send DNS reply");
                    }
                }
            });
        }
    }
}
