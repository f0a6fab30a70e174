use super::{
    BlockingConfig, ConfigError, LocalDnsRecord, LoggingConfig, ServerConfig, SystemConfig,
    UpstreamConfig, UpstreamStrategy,
};
use crate::domain_name::normalize_user_domain;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

const SYSTEM_CONFIG_PATH: &str = "/etc/sinkhole/config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub blocking: BlockingConfig,

    #[serde(default)]
    pub local_records: Vec<LocalDnsRecord>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub system: SystemConfig,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub dns_port: Option<u16>,
    pub upstream: Option<UpstreamStrategy>,
    pub custom_upstream: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load from `path` or the first existing default location, apply
    /// overrides and validate. No file at all yields the defaults.
    ///
    /// Returns the effective config and the path it is persisted to.
    pub fn load(
        path: Option<&str>,
        overrides: CliOverrides,
    ) -> Result<(Self, PathBuf), ConfigError> {
        let file = Self::locate(path);
        let mut config = if file.exists() {
            Self::from_file(&file)?
        } else {
            Self::default()
        };

        config.apply_overrides(overrides);
        config.validate()?;
        Ok((config, file))
    }

    /// Explicit path, then the system-wide file, then the per-user file.
    /// When none exists the per-user path is returned so saves land there.
    pub fn locate(path: Option<&str>) -> PathBuf {
        if let Some(path) = path {
            return PathBuf::from(path);
        }

        let system = PathBuf::from(SYSTEM_CONFIG_PATH);
        if system.exists() {
            return system;
        }

        Self::user_config_path().unwrap_or(system)
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sinkhole").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the whole config, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(custom) = overrides.custom_upstream {
            self.upstream.custom = Some(custom);
            if overrides.upstream.is_none() {
                self.upstream.strategy = UpstreamStrategy::Custom;
            }
        }
        if let Some(strategy) = overrides.upstream {
            self.upstream.strategy = strategy;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("dns_port must not be 0".into()));
        }

        if self.server.bind_address.parse::<IpAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "bind_address '{}' is not an IP address",
                self.server.bind_address
            )));
        }

        if self.upstream.strategy == UpstreamStrategy::Custom {
            match self.upstream.custom.as_deref() {
                Some(addr) => {
                    super::parse_upstream_addr(addr)?;
                }
                None => {
                    return Err(ConfigError::Validation(
                        "upstream strategy 'custom' requires upstream.custom".into(),
                    ))
                }
            }
        }

        if self.upstream.timeout_ms == 0 {
            return Err(ConfigError::Validation("upstream.timeout_ms must not be 0".into()));
        }

        let mut names = HashSet::new();
        for source in &self.blocking.sources {
            if source.name.trim().is_empty() {
                return Err(ConfigError::Validation("blocklist source with empty name".into()));
            }
            if !names.insert(source.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate blocklist source name '{}'",
                    source.name
                )));
            }
            if !(source.url.starts_with("http://") || source.url.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "blocklist source '{}' has non-http url '{}'",
                    source.name, source.url
                )));
            }
        }

        for domain in &self.blocking.allowlist {
            normalize_user_domain(domain)
                .map_err(|e| ConfigError::Validation(format!("allowlist: {}", e)))?;
        }

        for record in &self.local_records {
            normalize_user_domain(&record.domain)
                .map_err(|e| ConfigError::Validation(format!("local record: {}", e)))?;
        }

        Ok(())
    }
}
