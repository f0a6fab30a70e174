//! # Sinkhole
//!
//! Local DNS sinkhole: answers blocked names with unspecified addresses and
//! forwards everything else to one upstream resolver.

mod bootstrap;
mod di;
mod server;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sinkhole_application::use_cases::RestoreSystemDnsUseCase;
use sinkhole_domain::config::UpstreamStrategy;
use sinkhole_domain::{CliOverrides, Config};
use sinkhole_infrastructure::system::select_configurator;
use sinkhole_jobs::{BlocklistSyncJob, JobRunner};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "sinkhole")]
#[command(version)]
#[command(about = "Local DNS sinkhole with blocklist subscriptions")]
struct Cli {
    /// Configuration file
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream strategy: auto, cloudflare, google or custom
    #[arg(short = 'u', long)]
    upstream: Option<UpstreamStrategy>,

    /// Custom upstream resolver (`ip` or `ip:port`); implies `--upstream custom`
    #[arg(long)]
    custom_upstream: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the sinkhole (default)
    Run {
        /// Leave the system resolver configuration alone
        #[arg(long)]
        no_system_dns: bool,
    },
    /// Restore the system resolver configuration and exit
    Restore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        bind_address: cli.bind,
        dns_port: cli.dns_port,
        upstream: cli.upstream,
        custom_upstream: cli.custom_upstream,
        log_level: cli.log_level,
    };
    let (mut config, config_path) = bootstrap::load_config(cli.config.as_deref(), overrides)?;

    bootstrap::init_logging(&config);
    bootstrap::log_config(&config, &config_path);

    match cli.command.unwrap_or(Command::Run {
        no_system_dns: false,
    }) {
        Command::Restore => restore().await,
        Command::Run { no_system_dns } => {
            if no_system_dns {
                config.system.manage_dns = false;
            }
            ensure_privileged(&config)?;
            run(config, config_path).await
        }
    }
}

/// Emergency restore of the system resolver configuration.
async fn restore() -> anyhow::Result<()> {
    RestoreSystemDnsUseCase::new(select_configurator(true))
        .execute()
        .await
        .context("failed to restore system DNS configuration")?;
    info!("System DNS configuration restored");
    Ok(())
}

async fn run(config: Config, config_path: std::path::PathBuf) -> anyhow::Result<()> {
    info!("Sinkhole starting");

    let services = di::Services::build(&config, config_path)?;
    let use_cases = &services.use_cases;

    // Cache directory failures are fatal; failing sources are not.
    services
        .engine
        .prepare_cache_dir()
        .await
        .context("cannot create blocklist cache directory")?;

    let manage_dns = config.system.manage_dns;
    if manage_dns {
        if let Err(e) = use_cases.take_over_system_dns.unlock_port().await {
            rollback(&services).await;
            return Err(e).context("failed to free the DNS port");
        }
    }

    let dns_server =
        match server::bind_dns_server(&config.server.listen_address(), services.handler.clone())
            .await
        {
            Ok(dns_server) => dns_server,
            Err(e) => {
                if manage_dns {
                    rollback(&services).await;
                }
                return Err(e);
            }
        };

    if manage_dns {
        if let Err(e) = use_cases.take_over_system_dns.point_system_at_sinkhole().await {
            rollback(&services).await;
            return Err(e).context("failed to point the system resolver at the sinkhole");
        }
    }

    let shutdown = CancellationToken::new();
    let server_task = tokio::spawn(dns_server.run(shutdown.clone()));

    // Queries are answered (unfiltered) while the first load runs.
    let first_load = use_cases.reload_blocklists.clone();
    tokio::spawn(async move {
        if let Err(e) = first_load.execute().await {
            error!(error = %e, "Initial blocklist load failed");
        }
    });

    JobRunner::new()
        .with_blocklist_sync(
            BlocklistSyncJob::new(use_cases.reload_blocklists.clone())
                .with_interval(config.blocking.sync_interval_secs)
                .with_cancellation(shutdown.clone()),
        )
        .start()
        .await;

    info!(
        upstream = %services.upstream,
        "Sinkhole ready; blocklists loading in the background; press Ctrl+C to stop"
    );

    wait_for_shutdown_signal().await;
    info!("Shutdown signal received");

    shutdown.cancel();
    if let Err(e) = server_task.await {
        warn!(error = %e, "DNS server task ended abnormally");
    }

    if manage_dns && config.system.restore_on_exit {
        rollback(&services).await;
    }

    let stats = use_cases.get_stats.execute();
    info!(
        queries_total = stats.queries_total,
        queries_blocked = stats.queries_blocked,
        active_rules = stats.active_rules,
        "Sinkhole stopped"
    );
    for line in use_cases.get_recent_logs.execute(5) {
        info!(target: "sinkhole::events", "{}", line);
    }

    Ok(())
}

async fn rollback(services: &di::Services) {
    if let Err(e) = services.use_cases.restore_system_dns.execute().await {
        error!(error = %e, "Failed to restore system DNS configuration");
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "Cannot listen for SIGTERM; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Binding below 1024 and rewriting resolver files both need root.
#[cfg(unix)]
fn ensure_privileged(config: &Config) -> anyhow::Result<()> {
    // SAFETY: geteuid has no preconditions and cannot fail.
    let euid = unsafe { libc::geteuid() };
    if euid != 0 && (config.system.manage_dns || config.server.dns_port < 1024) {
        anyhow::bail!(
            "sinkhole must run as root to bind port {} and manage the system resolver \
             (use sudo, or --no-system-dns with -d <port> >= 1024)",
            config.server.dns_port
        );
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_privileged(_config: &Config) -> anyhow::Result<()> {
    Ok(())
}
