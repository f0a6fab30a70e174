use crate::blocklist::{BlocklistFormat, BlocklistSource};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Blocklist sources, allowlist and download cache settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BlockingConfig {
    #[serde(default = "default_sources")]
    pub sources: Vec<BlocklistSource>,

    /// Domains exempt from blocking on exact match
    #[serde(default)]
    pub allowlist: Vec<String>,

    /// Downloaded list cache (default: `<user cache dir>/sinkhole`)
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// A cache entry younger than this is used instead of the network
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Per-request HTTP timeout
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Upper bound for one complete load cycle
    #[serde(default = "default_load_deadline_secs")]
    pub load_deadline_secs: u64,

    /// Interval of the background reload job (0 disables it)
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("sinkhole")
}

fn default_cache_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_fetch_timeout_secs() -> u64 {
    120
}

fn default_load_deadline_secs() -> u64 {
    300
}

fn default_sync_interval_secs() -> u64 {
    24 * 60 * 60
}

pub fn default_sources() -> Vec<BlocklistSource> {
    vec![
        BlocklistSource::new(
            "Abuse.ch ThreatFox",
            "https://threatfox.abuse.ch/downloads/hostfile/",
            BlocklistFormat::Hosts,
        ),
        BlocklistSource::new("AdAway", "https://adaway.org/hosts.txt", BlocklistFormat::Hosts),
        BlocklistSource::new(
            "AdGuard DNS",
            "https://v.firebog.net/hosts/AdguardDNS.txt",
            BlocklistFormat::Hosts,
        ),
        BlocklistSource::new("OISD Ads", "https://small.oisd.nl/domainswild", BlocklistFormat::Wild),
        BlocklistSource::new(
            "EasyList",
            "https://v.firebog.net/hosts/Easylist.txt",
            BlocklistFormat::Hosts,
        ),
        BlocklistSource::new(
            "EasyPrivacy",
            "https://v.firebog.net/hosts/Easyprivacy.txt",
            BlocklistFormat::Hosts,
        ),
    ]
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            allowlist: vec![],
            cache_dir: default_cache_dir(),
            cache_ttl_secs: default_cache_ttl_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            load_deadline_secs: default_load_deadline_secs(),
            sync_interval_secs: default_sync_interval_secs(),
        }
    }
}

impl BlockingConfig {
    pub fn find_source(&self, name: &str) -> Option<&BlocklistSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn find_source_mut(&mut self, name: &str) -> Option<&mut BlocklistSource> {
        self.sources.iter_mut().find(|s| s.name == name)
    }

    pub fn enabled_sources(&self) -> impl Iterator<Item = &BlocklistSource> {
        self.sources.iter().filter(|s| s.enabled)
    }
}
