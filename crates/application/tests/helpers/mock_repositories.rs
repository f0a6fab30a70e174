#![allow(dead_code)]

use async_trait::async_trait;
use sinkhole_application::ports::{
    BlockFilterEnginePort, DnsConfigurator, EventLogReader, FilterDecision,
};
use sinkhole_domain::{
    ancestors, normalize_domain, BlocklistSource, DomainError, LoadReport, LoadStats,
    LocalDnsRecord,
};
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

// ============================================================================
// Mock BlockFilterEnginePort
// ============================================================================

#[derive(Default)]
struct EngineState {
    sources: Vec<BlocklistSource>,
    source_domains: Vec<(String, Vec<String>)>,
    ruleset: HashSet<String>,
    allowlist: Vec<String>,
    local_records: Vec<LocalDnsRecord>,
    cache_cleared: bool,
}

/// In-memory engine: each source maps to a fixed list of domains.
pub struct MockBlockFilterEngine {
    state: Mutex<EngineState>,
    reload_count: AtomicU64,
    fail_reload: Mutex<bool>,
}

impl MockBlockFilterEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
            reload_count: AtomicU64::new(0),
            fail_reload: Mutex::new(false),
        }
    }

    pub fn with_source(self, name: &str, domains: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.sources.push(BlocklistSource::new(
                name,
                format!("https://lists.test/{}", name),
                Default::default(),
            ));
            state.source_domains.push((
                name.to_string(),
                domains.iter().map(|d| d.to_string()).collect(),
            ));
        }
        self
    }

    pub fn set_fail_reload(&self, fail: bool) {
        *self.fail_reload.lock().unwrap() = fail;
    }

    pub fn reload_count(&self) -> u64 {
        self.reload_count.load(Ordering::SeqCst)
    }

    pub fn cache_cleared(&self) -> bool {
        self.state.lock().unwrap().cache_cleared
    }
}

impl Default for MockBlockFilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlockFilterEnginePort for MockBlockFilterEngine {
    fn check(&self, domain: &str) -> FilterDecision {
        let state = self.state.lock().unwrap();
        let domain = normalize_domain(domain);
        if state.allowlist.iter().any(|d| d == domain.as_ref()) {
            return FilterDecision::Allow;
        }
        if state.ruleset.contains(domain.as_ref())
            || ancestors(&domain).any(|d| state.ruleset.contains(d))
        {
            FilterDecision::Block
        } else {
            FilterDecision::Allow
        }
    }

    fn lookup_local(&self, domain: &str) -> Option<Vec<IpAddr>> {
        let state = self.state.lock().unwrap();
        let ips: Vec<IpAddr> = state
            .local_records
            .iter()
            .filter(|r| r.domain == domain)
            .map(|r| r.ip)
            .collect();
        (!ips.is_empty()).then_some(ips)
    }

    fn compiled_domain_count(&self) -> usize {
        self.state.lock().unwrap().ruleset.len()
    }

    fn last_load_report(&self) -> LoadReport {
        LoadReport::default()
    }

    async fn reload(&self) -> Result<LoadReport, DomainError> {
        if *self.fail_reload.lock().unwrap() {
            return Err(DomainError::CacheDirUnavailable {
                path: "/unwritable".into(),
                reason: "permission denied".into(),
            });
        }
        self.reload_count.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock().unwrap();
        let enabled: HashSet<String> = state
            .sources
            .iter()
            .filter(|s| s.enabled)
            .map(|s| s.name.clone())
            .collect();
        let mut ruleset = HashSet::new();
        let mut stats = LoadStats::default();
        for (name, domains) in &state.source_domains {
            if !enabled.contains(name) {
                continue;
            }
            for domain in domains {
                if !ruleset.insert(domain.clone()) {
                    stats.duplicates += 1;
                }
            }
            stats.per_source.insert(name.clone(), domains.len());
        }
        stats.total_domains = ruleset.len();
        state.ruleset = ruleset;

        Ok(LoadReport {
            stats,
            errors: vec![],
        })
    }

    fn list_sources(&self) -> Vec<BlocklistSource> {
        self.state.lock().unwrap().sources.clone()
    }

    async fn toggle_source(&self, name: &str, enabled: bool) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        let source = state
            .sources
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| DomainError::SourceNotFound(name.to_string()))?;
        source.enabled = enabled;
        Ok(())
    }

    async fn add_allowed(&self, domain: &str) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        if !state.allowlist.iter().any(|d| d == domain) {
            state.allowlist.push(domain.to_string());
        }
        Ok(())
    }

    async fn remove_allowed(&self, domain: &str) -> Result<(), DomainError> {
        self.state.lock().unwrap().allowlist.retain(|d| d != domain);
        Ok(())
    }

    fn list_allowed(&self) -> Vec<String> {
        self.state.lock().unwrap().allowlist.clone()
    }

    async fn add_local_record(&self, domain: &str, ip: IpAddr) -> Result<(), DomainError> {
        self.state
            .lock()
            .unwrap()
            .local_records
            .push(LocalDnsRecord::new(domain, ip));
        Ok(())
    }

    async fn remove_local_record(&self, domain: &str) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        let before = state.local_records.len();
        state.local_records.retain(|r| r.domain != domain);
        if state.local_records.len() == before {
            return Err(DomainError::LocalRecordNotFound(domain.to_string()));
        }
        Ok(())
    }

    fn list_local_records(&self) -> Vec<LocalDnsRecord> {
        self.state.lock().unwrap().local_records.clone()
    }

    async fn invalidate_cache(&self) -> Result<(), DomainError> {
        self.state.lock().unwrap().cache_cleared = true;
        Ok(())
    }
}

// ============================================================================
// Mock EventLogReader
// ============================================================================

pub struct MockEventLog {
    lines: Vec<String>,
}

impl MockEventLog {
    pub fn with_lines(count: usize) -> Self {
        Self {
            lines: (0..count).map(|i| format!("event {}", i)).collect(),
        }
    }
}

impl EventLogReader for MockEventLog {
    fn recent(&self, count: Option<usize>) -> Vec<String> {
        match count {
            Some(n) if n < self.lines.len() => self.lines[self.lines.len() - n..].to_vec(),
            _ => self.lines.clone(),
        }
    }
}

// ============================================================================
// Mock DnsConfigurator
// ============================================================================

#[derive(Default)]
pub struct MockDnsConfigurator {
    pub calls: Mutex<Vec<&'static str>>,
    pub fail_setup: bool,
}

impl MockDnsConfigurator {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsConfigurator for MockDnsConfigurator {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn unlock_port(&self) -> Result<(), DomainError> {
        self.calls.lock().unwrap().push("unlock_port");
        Ok(())
    }

    async fn setup_dns(&self) -> Result<(), DomainError> {
        self.calls.lock().unwrap().push("setup_dns");
        if self.fail_setup {
            return Err(DomainError::SystemDns("resolv.conf is read-only".into()));
        }
        Ok(())
    }

    async fn restore_dns(&self) -> Result<(), DomainError> {
        self.calls.lock().unwrap().push("restore_dns");
        Ok(())
    }
}
