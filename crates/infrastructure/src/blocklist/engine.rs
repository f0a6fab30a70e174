use super::fetcher::HttpFetcher;
use super::loader::{BlocklistLoader, LoadSettings};
use super::ruleset::{is_blocked, Allowlist, DomainRuleset, LocalRecordTable};
use super::source_cache::SourceCache;
use crate::events::EventEmitter;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use sinkhole_application::ports::{BlockFilterEnginePort, ConfigRepository, FilterDecision};
use sinkhole_domain::config::BlockingConfig;
use sinkhole_domain::{
    normalize_domain, normalize_user_domain, BlocklistSource, Config, DomainError, LoadReport,
    LocalDnsRecord,
};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// The persisted part of the configuration the engine owns.
#[derive(Debug, Clone)]
struct FilterState {
    blocking: BlockingConfig,
    local_records: Vec<LocalDnsRecord>,
}

impl FilterState {
    fn from_config(config: &Config) -> Self {
        Self {
            blocking: config.blocking.clone(),
            local_records: config.local_records.clone(),
        }
    }

    fn load_settings(&self) -> LoadSettings {
        LoadSettings {
            cache_dir: self.blocking.cache_dir.clone(),
            cache_ttl: Duration::from_secs(self.blocking.cache_ttl_secs),
            deadline: Duration::from_secs(self.blocking.load_deadline_secs),
        }
    }
}

/// The blocklist engine.
///
/// Readers (`check`, `lookup_local`, listings) only ever load `ArcSwap`
/// snapshots. Writers serialize on `state`, persist through the config
/// repository and only then publish new snapshots, so a failed save leaves
/// every visible structure untouched.
pub struct BlocklistEngine {
    ruleset: ArcSwap<DomainRuleset>,
    allowlist: ArcSwap<Allowlist>,
    local_records: ArcSwap<LocalRecordTable>,
    sources: ArcSwap<Vec<BlocklistSource>>,
    last_report: ArcSwap<LoadReport>,

    state: Mutex<FilterState>,
    /// Serializes whole load cycles without blocking the other writers.
    reload_lock: Mutex<()>,

    config_repo: Arc<dyn ConfigRepository>,
    loader: BlocklistLoader,
    events: EventEmitter,
}

impl BlocklistEngine {
    /// Build the engine with an empty ruleset. Call `reload` to populate it.
    pub fn new(
        config: &Config,
        config_repo: Arc<dyn ConfigRepository>,
        events: EventEmitter,
    ) -> Result<Self, DomainError> {
        let fetcher = HttpFetcher::new(Duration::from_secs(config.blocking.fetch_timeout_secs))?;
        let state = FilterState::from_config(config);

        let engine = Self {
            ruleset: ArcSwap::from_pointee(DomainRuleset::default()),
            allowlist: ArcSwap::from_pointee(Allowlist::default()),
            local_records: ArcSwap::from_pointee(LocalRecordTable::default()),
            sources: ArcSwap::from_pointee(Vec::new()),
            last_report: ArcSwap::from_pointee(LoadReport::default()),
            state: Mutex::new(state.clone()),
            reload_lock: Mutex::new(()),
            config_repo,
            loader: BlocklistLoader::new(fetcher, events.clone()),
            events,
        };
        engine.publish(&state);

        Ok(engine)
    }

    /// Create the blocklist cache directory without loading any source.
    /// Lets startup fail fast before the first (background) reload.
    pub async fn prepare_cache_dir(&self) -> Result<(), DomainError> {
        let settings = self.state.lock().await.load_settings();
        SourceCache::new(settings.cache_dir, settings.cache_ttl)
            .ensure_dir()
            .await
    }

    /// Swap in snapshots derived from `state`.
    fn publish(&self, state: &FilterState) {
        let allowed = state
            .blocking
            .allowlist
            .iter()
            .filter_map(|d| match normalize_user_domain(d) {
                Ok(domain) => Some(domain),
                Err(e) => {
                    warn!(error = %e, "Ignoring invalid allowlist entry");
                    None
                }
            })
            .collect::<Vec<_>>();

        self.allowlist
            .store(Arc::new(Allowlist::from_entries(allowed)));
        self.local_records
            .store(Arc::new(LocalRecordTable::from_records(&state.local_records)));
        self.sources.store(Arc::new(state.blocking.sources.clone()));
    }

    /// Write `candidate` into the stored config, leaving the file's other
    /// sections as they are.
    async fn persist(&self, candidate: &FilterState) -> Result<(), DomainError> {
        let mut config = self.config_repo.load().await?;
        config.blocking = candidate.blocking.clone();
        config.local_records = candidate.local_records.clone();
        self.config_repo.save(&config).await
    }

    /// Persist `candidate`, then make it current.
    async fn commit(
        &self,
        state: &mut FilterState,
        candidate: FilterState,
    ) -> Result<(), DomainError> {
        self.persist(&candidate).await?;
        self.publish(&candidate);
        *state = candidate;
        Ok(())
    }
}

#[async_trait]
impl BlockFilterEnginePort for BlocklistEngine {
    #[inline]
    fn check(&self, domain: &str) -> FilterDecision {
        let ruleset = self.ruleset.load();
        let allowlist = self.allowlist.load();
        if is_blocked(&ruleset, &allowlist, domain) {
            FilterDecision::Block
        } else {
            FilterDecision::Allow
        }
    }

    fn lookup_local(&self, domain: &str) -> Option<Vec<IpAddr>> {
        let domain = normalize_domain(domain);
        self.local_records.load().lookup(&domain).map(<[IpAddr]>::to_vec)
    }

    fn compiled_domain_count(&self) -> usize {
        self.ruleset.load().len()
    }

    fn last_load_report(&self) -> LoadReport {
        LoadReport::clone(&self.last_report.load())
    }

    async fn reload(&self) -> Result<LoadReport, DomainError> {
        let _cycle = self.reload_lock.lock().await;

        let (sources, settings) = {
            let mut state = self.state.lock().await;
            match self.config_repo.load().await {
                Ok(config) => {
                    let fresh = FilterState::from_config(&config);
                    self.publish(&fresh);
                    *state = fresh;
                }
                Err(e) => {
                    warn!(error = %e, "Config re-read failed; reloading with current settings");
                }
            }
            (state.blocking.sources.clone(), state.load_settings())
        };

        let outcome = self.loader.load(&sources, &settings).await?;

        self.ruleset.store(Arc::new(outcome.ruleset));
        let report = LoadReport {
            stats: outcome.stats,
            errors: outcome.errors,
        };
        self.last_report.store(Arc::new(report.clone()));

        info!(
            active_rules = self.compiled_domain_count(),
            "Ruleset swapped"
        );

        Ok(report)
    }

    fn list_sources(&self) -> Vec<BlocklistSource> {
        Vec::clone(&self.sources.load())
    }

    async fn toggle_source(&self, name: &str, enabled: bool) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;

        let mut candidate = state.clone();
        candidate
            .blocking
            .find_source_mut(name)
            .ok_or_else(|| DomainError::SourceNotFound(name.to_string()))?
            .enabled = enabled;

        self.commit(&mut state, candidate).await?;

        self.events.emit(&format!(
            "Source {} {}",
            name,
            if enabled { "enabled" } else { "disabled" }
        ));
        Ok(())
    }

    async fn add_allowed(&self, domain: &str) -> Result<(), DomainError> {
        let domain = normalize_user_domain(domain)?;
        let mut state = self.state.lock().await;

        if self.allowlist.load().contains(&domain) {
            return Ok(());
        }

        let mut candidate = state.clone();
        candidate.blocking.allowlist.push(domain.clone());
        self.commit(&mut state, candidate).await?;

        self.events.emit(&format!("[ALLOWLIST] added {}", domain));
        Ok(())
    }

    async fn remove_allowed(&self, domain: &str) -> Result<(), DomainError> {
        let domain = normalize_user_domain(domain)?;
        let mut state = self.state.lock().await;

        if !self.allowlist.load().contains(&domain) {
            return Ok(());
        }

        let mut candidate = state.clone();
        candidate
            .blocking
            .allowlist
            .retain(|entry| normalize_user_domain(entry).map_or(true, |d| d != domain));
        self.commit(&mut state, candidate).await?;

        self.events.emit(&format!("[ALLOWLIST] removed {}", domain));
        Ok(())
    }

    fn list_allowed(&self) -> Vec<String> {
        self.allowlist.load().entries().to_vec()
    }

    async fn add_local_record(&self, domain: &str, ip: IpAddr) -> Result<(), DomainError> {
        let domain = normalize_user_domain(domain)?;
        let mut state = self.state.lock().await;

        if self
            .local_records
            .load()
            .lookup(&domain)
            .is_some_and(|ips| ips.contains(&ip))
        {
            return Ok(());
        }

        let mut candidate = state.clone();
        candidate
            .local_records
            .push(LocalDnsRecord::new(domain.clone(), ip));
        self.commit(&mut state, candidate).await?;

        self.events
            .emit(&format!("[LOCAL] added {} -> {}", domain, ip));
        Ok(())
    }

    async fn remove_local_record(&self, domain: &str) -> Result<(), DomainError> {
        let domain = normalize_user_domain(domain)?;
        let mut state = self.state.lock().await;

        let mut candidate = state.clone();
        let before = candidate.local_records.len();
        candidate
            .local_records
            .retain(|record| normalize_domain(&record.domain) != domain.as_str());
        if candidate.local_records.len() == before {
            return Err(DomainError::LocalRecordNotFound(domain));
        }
        self.commit(&mut state, candidate).await?;

        self.events.emit(&format!("[LOCAL] removed {}", domain));
        Ok(())
    }

    fn list_local_records(&self) -> Vec<LocalDnsRecord> {
        self.local_records.load().records().to_vec()
    }

    async fn invalidate_cache(&self) -> Result<(), DomainError> {
        let state = self.state.lock().await;
        let settings = state.load_settings();
        SourceCache::new(settings.cache_dir, settings.cache_ttl)
            .clear()
            .await?;

        self.events.emit("Blocklist cache invalidated");
        Ok(())
    }
}
