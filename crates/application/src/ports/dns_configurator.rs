use async_trait::async_trait;
use sinkhole_domain::DomainError;

/// Points the operating system's resolver at the sinkhole and back.
#[async_trait]
pub trait DnsConfigurator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Free port 53 from any local stub resolver.
    async fn unlock_port(&self) -> Result<(), DomainError>;

    /// Make 127.0.0.1 the system resolver, keeping a backup of the previous
    /// settings.
    async fn setup_dns(&self) -> Result<(), DomainError>;

    /// Undo `setup_dns` and `unlock_port` from the backups.
    async fn restore_dns(&self) -> Result<(), DomainError>;
}
