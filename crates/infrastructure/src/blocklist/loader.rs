use super::fetcher::HttpFetcher;
use super::parser::parse_list_text;
use super::ruleset::DomainRuleset;
use super::source_cache::SourceCache;
use crate::events::EventEmitter;
use compact_str::CompactString;
use rustc_hash::FxHashSet;
use sinkhole_domain::{BlocklistSource, DomainError, LoadStats, SourceLoadError};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{info, warn};

/// Knobs that may change between loads (they come from the re-read config).
#[derive(Debug, Clone)]
pub struct LoadSettings {
    pub cache_dir: PathBuf,
    pub cache_ttl: Duration,
    pub deadline: Duration,
}

pub struct LoadOutcome {
    pub ruleset: DomainRuleset,
    pub stats: LoadStats,
    pub errors: Vec<SourceLoadError>,
}

/// Shared merge target. Each source takes the lock once, after parsing.
#[derive(Default)]
struct Accumulator {
    domains: FxHashSet<CompactString>,
    duplicates: usize,
}

/// Fetches every enabled source concurrently and merges the results.
#[derive(Clone)]
pub struct BlocklistLoader {
    fetcher: HttpFetcher,
    events: EventEmitter,
}

impl BlocklistLoader {
    pub fn new(fetcher: HttpFetcher, events: EventEmitter) -> Self {
        Self { fetcher, events }
    }

    /// Run one load cycle.
    ///
    /// Fails only when the cache directory cannot be created. Sources that
    /// fail to download, or are still running when `settings.deadline`
    /// expires, end up in `errors` and contribute nothing.
    pub async fn load(
        &self,
        sources: &[BlocklistSource],
        settings: &LoadSettings,
    ) -> Result<LoadOutcome, DomainError> {
        let cache = SourceCache::new(&settings.cache_dir, settings.cache_ttl);
        cache.ensure_dir().await?;

        let accumulator = Arc::new(Mutex::new(Accumulator::default()));
        let mut tasks = JoinSet::new();
        let mut pending: BTreeSet<String> = BTreeSet::new();

        for source in sources.iter().filter(|s| s.enabled) {
            pending.insert(source.name.clone());
            let source = source.clone();
            let fetcher = self.fetcher.clone();
            let cache = cache.clone();
            let events = self.events.clone();
            let accumulator = Arc::clone(&accumulator);
            tasks.spawn(async move {
                let result = load_source(&source, &fetcher, &cache, &events, &accumulator).await;
                (source.name, result)
            });
        }

        let deadline = Instant::now() + settings.deadline;
        let mut stats = LoadStats::default();
        let mut errors = Vec::new();

        let mut record = |name: String, result: Result<usize, String>| {
            pending.remove(&name);
            match result {
                Ok(count) => {
                    stats.per_source.insert(name, count);
                }
                Err(reason) => {
                    self.events
                        .emit(&format!("[ERROR] Failed to load {}: {}", name, reason));
                    warn!(source = %name, reason = %reason, "Blocklist source failed");
                    errors.push(SourceLoadError {
                        source_name: name,
                        reason,
                    });
                }
            }
        };

        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok((name, result)))) => record(name, result),
                Ok(Some(Err(e))) => warn!(error = %e, "Blocklist task failed to complete"),
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        remaining = tasks.len(),
                        "Blocklist load deadline reached; cancelling remaining sources"
                    );
                    tasks.abort_all();
                    // Tasks that finished right at the deadline still count.
                    while let Some(joined) = tasks.join_next().await {
                        if let Ok((name, result)) = joined {
                            record(name, result);
                        }
                    }
                    break;
                }
            }
        }

        drop(record);
        for name in std::mem::take(&mut pending) {
            let reason = "deadline exceeded".to_string();
            self.events
                .emit(&format!("[ERROR] Failed to load {}: {}", name, reason));
            errors.push(SourceLoadError {
                source_name: name,
                reason,
            });
        }

        // Every task is joined or aborted at this point, so the Arc is unique.
        let accumulator = match Arc::try_unwrap(accumulator) {
            Ok(inner) => inner.into_inner().unwrap_or_else(|e| e.into_inner()),
            Err(shared) => {
                let mut guard = shared.lock().unwrap_or_else(|e| e.into_inner());
                std::mem::take(&mut *guard)
            }
        };

        stats.total_domains = accumulator.domains.len();
        stats.duplicates = accumulator.duplicates;

        self.events.emit("Blocklist Update Complete.");
        self.events.emit(&format!(
            "Total Rules: {} | Duplicates Removed: {}",
            stats.total_domains, stats.duplicates
        ));
        info!(
            total_domains = stats.total_domains,
            duplicates = stats.duplicates,
            failed = errors.len(),
            "Blocklist load finished"
        );

        Ok(LoadOutcome {
            ruleset: DomainRuleset::new(accumulator.domains),
            stats,
            errors,
        })
    }
}

async fn load_source(
    source: &BlocklistSource,
    fetcher: &HttpFetcher,
    cache: &SourceCache,
    events: &EventEmitter,
    accumulator: &Mutex<Accumulator>,
) -> Result<usize, String> {
    let body = match cache.read_fresh(&source.url).await {
        Some(body) => {
            events.emit(&format!("Using cached copy of {}", source.name));
            body
        }
        None => {
            events.emit(&format!("Fetching source: {}...", source.name));
            let body = fetcher.fetch(&source.url).await?;
            events.emit(&format!(
                "Fetched {} (Size: {} bytes). Parsing...",
                source.name,
                body.len()
            ));
            cache.write(&source.url, &body).await;
            body
        }
    };

    let local = parse_list_text(&body, source.format);
    let count = local.len();

    {
        let mut acc = accumulator.lock().unwrap_or_else(|e| e.into_inner());
        for domain in local {
            if !acc.domains.insert(domain) {
                acc.duplicates += 1;
            }
        }
    }

    events.emit(&format!("Loaded {} domains from {}", count, source.name));
    Ok(count)
}
