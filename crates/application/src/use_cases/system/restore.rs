use crate::ports::DnsConfigurator;
use sinkhole_domain::DomainError;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct RestoreSystemDnsUseCase {
    configurator: Arc<dyn DnsConfigurator>,
}

impl RestoreSystemDnsUseCase {
    pub fn new(configurator: Arc<dyn DnsConfigurator>) -> Self {
        Self { configurator }
    }

    #[instrument(skip(self), fields(configurator = self.configurator.name()))]
    pub async fn execute(&self) -> Result<(), DomainError> {
        self.configurator.restore_dns().await?;
        info!("System resolver restored");
        Ok(())
    }
}
