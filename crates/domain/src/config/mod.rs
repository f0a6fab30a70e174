//! Configuration module for the sinkhole
//!
//! This module contains all configuration structures organized by concern:
//! - `root`: Main configuration, file lookup and CLI overrides
//! - `server`: Listener binding
//! - `upstream`: Upstream resolver strategy
//! - `blocking`: Blocklist sources, allowlist and cache settings
//! - `local_records`: Local DNS records
//! - `logging`: Logging settings
//! - `system`: Operating-system DNS takeover
//! - `errors`: Configuration errors

pub mod blocking;
pub mod errors;
pub mod local_records;
pub mod logging;
pub mod root;
pub mod server;
pub mod system;
pub mod upstream;

pub use blocking::BlockingConfig;
pub use errors::ConfigError;
pub use local_records::LocalDnsRecord;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use system::SystemConfig;
pub use upstream::{
    parse_upstream_addr, UpstreamConfig, UpstreamStrategy, CLOUDFLARE_DNS, GOOGLE_DNS,
};
