#![allow(dead_code)]

use async_trait::async_trait;
use sinkhole_application::ports::{BlockFilterEnginePort, FilterDecision};
use sinkhole_domain::{
    BlocklistSource, DomainError, LoadReport, LoadStats, LocalDnsRecord,
};
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Engine that only counts reloads; every reload reports `domains` rules.
pub struct CountingEngine {
    reloads: AtomicUsize,
    fail: AtomicBool,
    domains: usize,
}

impl CountingEngine {
    pub fn new(domains: usize) -> Self {
        Self {
            reloads: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            domains,
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Reload attempts, failed ones included.
    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlockFilterEnginePort for CountingEngine {
    fn check(&self, _domain: &str) -> FilterDecision {
        FilterDecision::Allow
    }

    fn lookup_local(&self, _domain: &str) -> Option<Vec<IpAddr>> {
        None
    }

    fn compiled_domain_count(&self) -> usize {
        self.domains
    }

    fn last_load_report(&self) -> LoadReport {
        LoadReport::default()
    }

    async fn reload(&self) -> Result<LoadReport, DomainError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::CacheDirUnavailable {
                path: "/unwritable".into(),
                reason: "permission denied".into(),
            });
        }
        Ok(LoadReport {
            stats: LoadStats {
                total_domains: self.domains,
                ..LoadStats::default()
            },
            errors: vec![],
        })
    }

    fn list_sources(&self) -> Vec<BlocklistSource> {
        vec![]
    }

    async fn toggle_source(&self, name: &str, _enabled: bool) -> Result<(), DomainError> {
        Err(DomainError::SourceNotFound(name.to_string()))
    }

    async fn add_allowed(&self, _domain: &str) -> Result<(), DomainError> {
        Ok(())
    }

    async fn remove_allowed(&self, _domain: &str) -> Result<(), DomainError> {
        Ok(())
    }

    fn list_allowed(&self) -> Vec<String> {
        vec![]
    }

    async fn add_local_record(&self, _domain: &str, _ip: IpAddr) -> Result<(), DomainError> {
        Ok(())
    }

    async fn remove_local_record(&self, domain: &str) -> Result<(), DomainError> {
        Err(DomainError::LocalRecordNotFound(domain.to_string()))
    }

    fn list_local_records(&self) -> Vec<LocalDnsRecord> {
        vec![]
    }

    async fn invalidate_cache(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
