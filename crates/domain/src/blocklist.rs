use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Line format of a remote list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlocklistFormat {
    /// `0.0.0.0 domain` hosts-file lines.
    #[default]
    Hosts,
    /// One domain per line, optionally prefixed with `*.`.
    Wild,
    /// One domain per line.
    Raw,
    /// Any other declared format (`abp`, `domains`, ...). Parsed like `raw`;
    /// written back as `other`.
    #[serde(other)]
    Other,
}

impl fmt::Display for BlocklistFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlocklistFormat::Hosts => f.write_str("hosts"),
            BlocklistFormat::Wild => f.write_str("wild"),
            BlocklistFormat::Raw => f.write_str("raw"),
            BlocklistFormat::Other => f.write_str("other"),
        }
    }
}

/// One configured remote list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BlocklistSource {
    /// Display identifier, unique within a configuration.
    pub name: String,

    pub url: String,

    #[serde(default)]
    pub format: BlocklistFormat,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl BlocklistSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>, format: BlocklistFormat) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            format,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Why a source contributed nothing to a load cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLoadError {
    pub source_name: String,
    pub reason: String,
}

/// Counters for one load cycle. Recomputed on every load, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Distinct domains in the merged ruleset.
    pub total_domains: usize,
    /// Domains already present in the accumulator when a source was merged.
    pub duplicates: usize,
    /// Distinct domains parsed from each source that loaded successfully.
    pub per_source: BTreeMap<String, usize>,
}

/// Result of one reload as seen by callers: counters plus the sources that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub stats: LoadStats,
    pub errors: Vec<SourceLoadError>,
}

impl LoadReport {
    pub fn failed_sources(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.source_name.as_str())
    }
}
