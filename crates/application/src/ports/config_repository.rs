use async_trait::async_trait;
use sinkhole_domain::{Config, DomainError};

/// Durable home of the configuration.
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn load(&self) -> Result<Config, DomainError>;

    async fn save(&self, config: &Config) -> Result<(), DomainError>;
}
