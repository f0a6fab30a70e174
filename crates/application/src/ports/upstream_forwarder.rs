use async_trait::async_trait;
use sinkhole_domain::DomainError;

/// Sends a raw query to the upstream resolver and returns its raw reply.
#[async_trait]
pub trait UpstreamForwarder: Send + Sync {
    /// The reply carries the same message id as `query`.
    async fn forward(&self, query: &[u8]) -> Result<Vec<u8>, DomainError>;

    /// Human-readable upstream address for logs.
    fn upstream(&self) -> String;
}
