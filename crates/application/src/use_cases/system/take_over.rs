use crate::ports::DnsConfigurator;
use sinkhole_domain::DomainError;
use std::sync::Arc;
use tracing::{info, instrument};

/// Free port 53, then point the system resolver at the sinkhole.
pub struct TakeOverSystemDnsUseCase {
    configurator: Arc<dyn DnsConfigurator>,
}

impl TakeOverSystemDnsUseCase {
    pub fn new(configurator: Arc<dyn DnsConfigurator>) -> Self {
        Self { configurator }
    }

    /// Port unlock must happen before the listener binds.
    #[instrument(skip(self), fields(configurator = self.configurator.name()))]
    pub async fn unlock_port(&self) -> Result<(), DomainError> {
        self.configurator.unlock_port().await
    }

    #[instrument(skip(self), fields(configurator = self.configurator.name()))]
    pub async fn point_system_at_sinkhole(&self) -> Result<(), DomainError> {
        self.configurator.setup_dns().await?;
        info!("System resolver now points at the sinkhole");
        Ok(())
    }
}
