//! Sinkhole Domain Layer
pub mod blocklist;
pub mod config;
pub mod domain_name;
pub mod errors;
pub mod query_stats;

pub use blocklist::{BlocklistFormat, BlocklistSource, LoadReport, LoadStats, SourceLoadError};
pub use config::{CliOverrides, Config, ConfigError, LocalDnsRecord};
pub use domain_name::{ancestors, normalize_domain, normalize_user_domain};
pub use errors::DomainError;
pub use query_stats::{EngineStats, QueryCounters};
