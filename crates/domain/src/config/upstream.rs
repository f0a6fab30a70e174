use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

pub const GOOGLE_DNS: SocketAddr = SocketAddr::new(IpAddr::V4(std::net::Ipv4Addr::new(8, 8, 8, 8)), 53);
pub const CLOUDFLARE_DNS: SocketAddr =
    SocketAddr::new(IpAddr::V4(std::net::Ipv4Addr::new(1, 1, 1, 1)), 53);

/// How the upstream resolver is chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamStrategy {
    /// Reuse the resolver the system was configured with before takeover.
    Auto,
    /// 1.1.1.1
    Cloudflare,
    /// 8.8.8.8
    #[default]
    Google,
    /// `UpstreamConfig::custom`
    Custom,
}

impl UpstreamStrategy {
    /// Fixed address for the public resolver strategies.
    pub fn public_address(&self) -> Option<SocketAddr> {
        match self {
            UpstreamStrategy::Cloudflare => Some(CLOUDFLARE_DNS),
            UpstreamStrategy::Google => Some(GOOGLE_DNS),
            UpstreamStrategy::Auto | UpstreamStrategy::Custom => None,
        }
    }
}

impl fmt::Display for UpstreamStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpstreamStrategy::Auto => "auto",
            UpstreamStrategy::Cloudflare => "cloudflare",
            UpstreamStrategy::Google => "google",
            UpstreamStrategy::Custom => "custom",
        };
        f.write_str(name)
    }
}

impl FromStr for UpstreamStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(UpstreamStrategy::Auto),
            "cloudflare" => Ok(UpstreamStrategy::Cloudflare),
            "google" => Ok(UpstreamStrategy::Google),
            "custom" => Ok(UpstreamStrategy::Custom),
            other => Err(ConfigError::Validation(format!(
                "unknown upstream strategy '{}' (expected auto, cloudflare, google or custom)",
                other
            ))),
        }
    }
}

/// Upstream resolver configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub strategy: UpstreamStrategy,

    /// Operator-supplied resolver for the `custom` strategy: `ip` or `ip:port`.
    #[serde(default)]
    pub custom: Option<String>,

    /// Per-exchange timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Share one upstream exchange between identical in-flight queries
    #[serde(default = "default_coalesce")]
    pub coalesce: bool,
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_coalesce() -> bool {
    true
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            strategy: UpstreamStrategy::default(),
            custom: None,
            timeout_ms: default_timeout_ms(),
            coalesce: default_coalesce(),
        }
    }
}

/// Parse `1.2.3.4`, `1.2.3.4:5353`, `::1` or `[::1]:5353`. Port defaults to 53.
pub fn parse_upstream_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    let value = value.trim();
    if let Ok(addr) = SocketAddr::from_str(value) {
        return Ok(addr);
    }
    IpAddr::from_str(value)
        .map(|ip| SocketAddr::new(ip, 53))
        .map_err(|_| ConfigError::Validation(format!("invalid upstream address '{}'", value)))
}
