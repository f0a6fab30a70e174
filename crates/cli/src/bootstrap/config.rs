use anyhow::Context;
use sinkhole_domain::{CliOverrides, Config};
use std::path::{Path, PathBuf};
use tracing::info;

/// Load, override and validate the configuration. Returns the file the
/// configuration belongs to, whether or not it exists yet.
///
/// Runs before logging is initialized, so it does not log.
pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<(Config, PathBuf)> {
    Config::load(config_path, cli_overrides).context("failed to load configuration")
}

pub fn log_config(config: &Config, path: &Path) {
    info!(
        config_file = %path.display(),
        exists = path.exists(),
        dns_port = config.server.dns_port,
        bind = %config.server.bind_address,
        upstream = %config.upstream.strategy,
        sources = config.blocking.sources.len(),
        "Configuration loaded"
    );
}
