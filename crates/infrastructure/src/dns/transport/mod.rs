pub mod udp;

use async_trait::async_trait;
use sinkhole_domain::DomainError;
use std::time::Duration;

pub use udp::UdpTransport;

/// Trait for sending raw DNS messages over the wire
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Raw reply bytes (wire format) for `message_bytes`.
    async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError>;

    /// Remote endpoint, for logs.
    fn server(&self) -> String;
}
