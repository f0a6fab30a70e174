use async_trait::async_trait;
use sinkhole_application::ports::DnsConfigurator;
use sinkhole_domain::DomainError;

/// Leaves the system resolver alone.
pub struct NoopDnsConfigurator;

#[async_trait]
impl DnsConfigurator for NoopDnsConfigurator {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn unlock_port(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn setup_dns(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn restore_dns(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
