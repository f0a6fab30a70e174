use async_trait::async_trait;
use sinkhole_application::ports::ConfigRepository;
use sinkhole_domain::{Config, DomainError};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// TOML file backed configuration.
///
/// A missing file loads as the defaults. Saves go through a sibling temp
/// file and a rename so a crash never leaves a truncated config behind.
pub struct TomlConfigRepository {
    path: PathBuf,
}

impl TomlConfigRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConfigRepository for TomlConfigRepository {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Config, DomainError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Config file absent, using defaults");
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(DomainError::Config(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let config: Config = toml::from_str(&content).map_err(|e| {
            DomainError::Config(format!("failed to parse {}: {}", self.path.display(), e))
        })?;
        config
            .validate()
            .map_err(|e| DomainError::Config(e.to_string()))?;

        Ok(config)
    }

    #[instrument(skip(self, config), fields(path = %self.path.display()))]
    async fn save(&self, config: &Config) -> Result<(), DomainError> {
        let content = config
            .to_toml_string()
            .map_err(|e| DomainError::Config(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    DomainError::Config(format!("failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let tmp = self.path.with_extension("toml.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| DomainError::Config(format!("failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            DomainError::Config(format!("failed to replace {}: {}", self.path.display(), e))
        })?;

        debug!("Config saved");
        Ok(())
    }
}
