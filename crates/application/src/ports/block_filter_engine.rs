use async_trait::async_trait;
use sinkhole_domain::{BlocklistSource, DomainError, LoadReport, LocalDnsRecord};
use std::net::IpAddr;

/// The outcome of a filter check for one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Block,
    Allow,
}

/// Application-layer port for the blocklist engine.
///
/// The implementation lives in the infrastructure layer and is injected at
/// DI time.
///
/// Hot-path methods (`check`, `lookup_local`) are synchronous and lock-free:
/// they read the current snapshots only. Everything that mutates state is
/// async because it persists the configuration or touches the network, and
/// runs serialized behind the engine's write lock.
#[async_trait]
pub trait BlockFilterEnginePort: Send + Sync {
    /// Check whether `domain` is blocked.
    ///
    ///   1. Allowlist exact match  => Allow
    ///   2. Ruleset exact match    => Block
    ///   3. Any ancestor in ruleset => Block
    fn check(&self, domain: &str) -> FilterDecision;

    /// Addresses configured locally for `domain`, if any.
    fn lookup_local(&self, domain: &str) -> Option<Vec<IpAddr>>;

    /// Number of distinct domains in the active ruleset.
    fn compiled_domain_count(&self) -> usize;

    /// Report of the most recent completed load.
    fn last_load_report(&self) -> LoadReport;

    /// Re-read the configuration, load every enabled source and swap the
    /// new ruleset in. Source failures are part of the report; only a fatal
    /// condition (cache directory) is an error.
    async fn reload(&self) -> Result<LoadReport, DomainError>;

    fn list_sources(&self) -> Vec<BlocklistSource>;

    /// Persist the new state of `name`. Takes effect on the next reload.
    async fn toggle_source(&self, name: &str, enabled: bool) -> Result<(), DomainError>;

    async fn add_allowed(&self, domain: &str) -> Result<(), DomainError>;

    async fn remove_allowed(&self, domain: &str) -> Result<(), DomainError>;

    fn list_allowed(&self) -> Vec<String>;

    async fn add_local_record(&self, domain: &str, ip: IpAddr) -> Result<(), DomainError>;

    /// Remove every local record for `domain`.
    async fn remove_local_record(&self, domain: &str) -> Result<(), DomainError>;

    fn list_local_records(&self) -> Vec<LocalDnsRecord>;

    /// Drop all cached downloads so the next reload fetches every source.
    async fn invalidate_cache(&self) -> Result<(), DomainError>;
}
