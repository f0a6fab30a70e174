use super::{RESOLVED_CONF, RESOLVED_CONF_BACKUP, RESOLV_CONF, RESOLV_CONF_BACKUP};
use async_trait::async_trait;
use sinkhole_application::ports::DnsConfigurator;
use sinkhole_domain::DomainError;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::process::Command;
use tracing::{info, warn};

const MANAGED_RESOLV_CONF: &str =
    "# Managed by sinkhole\nnameserver 127.0.0.1\noptions edns0 trust-ad\n";

const PORT_WAIT_ATTEMPTS: u32 = 10;
const PORT_WAIT_INTERVAL: Duration = Duration::from_millis(500);

/// Disable the `DNSStubListener` of systemd-resolved in `input`.
///
/// An existing `DNSStubListener=` line inside `[Resolve]` is rewritten in
/// place; otherwise a `[Resolve]` section carrying the setting is appended.
pub fn patch_resolved_conf(input: &str) -> String {
    let mut output = Vec::new();
    let mut in_resolve = false;
    let mut patched = false;

    for line in input.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            in_resolve = trimmed == "[Resolve]";
            output.push(line.to_string());
            continue;
        }
        if in_resolve && trimmed.starts_with("DNSStubListener=") {
            output.push("DNSStubListener=no".to_string());
            patched = true;
        } else {
            output.push(line.to_string());
        }
    }

    if !patched {
        output.push(String::new());
        output.push("[Resolve]".to_string());
        output.push("DNSStubListener=no".to_string());
    }

    let mut result = output.join("\n");
    result.push('\n');
    result
}

/// systemd-resolved coexistence: free port 53 by turning off the stub
/// listener, then point resolv.conf at 127.0.0.1. Both files are backed up
/// once and restored from those backups.
pub struct LinuxDnsConfigurator {
    resolved_conf: PathBuf,
    resolved_conf_backup: PathBuf,
    resolv_conf: PathBuf,
    resolv_conf_backup: PathBuf,
    manage_service: bool,
}

impl LinuxDnsConfigurator {
    pub fn new() -> Self {
        Self {
            resolved_conf: PathBuf::from(RESOLVED_CONF),
            resolved_conf_backup: PathBuf::from(RESOLVED_CONF_BACKUP),
            resolv_conf: PathBuf::from(RESOLV_CONF),
            resolv_conf_backup: PathBuf::from(RESOLV_CONF_BACKUP),
            manage_service: true,
        }
    }

    /// Work on files under `root` and never touch systemd (useful for testing)
    pub fn with_root(root: &Path) -> Self {
        Self {
            resolved_conf: root.join("resolved.conf"),
            resolved_conf_backup: root.join("resolved.conf.backup.sinkhole"),
            resolv_conf: root.join("resolv.conf"),
            resolv_conf_backup: root.join("resolv.conf.orig.sinkhole"),
            manage_service: false,
        }
    }

    async fn restart_resolved(&self) -> Result<(), DomainError> {
        if !self.manage_service {
            return Ok(());
        }

        let status = Command::new("systemctl")
            .args(["restart", "systemd-resolved"])
            .status()
            .await
            .map_err(|e| DomainError::SystemDns(format!("failed to run systemctl: {}", e)))?;

        if !status.success() {
            return Err(DomainError::SystemDns(format!(
                "systemctl restart systemd-resolved exited with {}",
                status
            )));
        }
        Ok(())
    }

    async fn wait_for_port_53(&self) -> Result<(), DomainError> {
        if !self.manage_service {
            return Ok(());
        }

        let probe: SocketAddr = (Ipv4Addr::UNSPECIFIED, 53).into();
        for _ in 0..PORT_WAIT_ATTEMPTS {
            if tokio::net::UdpSocket::bind(probe).await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(PORT_WAIT_INTERVAL).await;
        }

        Err(DomainError::SystemDns(
            "timeout waiting for port 53 to be free (is another service using it?)".into(),
        ))
    }
}

impl Default for LinuxDnsConfigurator {
    fn default() -> Self {
        Self::new()
    }
}

fn io_err(action: &str, path: &Path, e: std::io::Error) -> DomainError {
    DomainError::SystemDns(format!("failed to {} {}: {}", action, path.display(), e))
}

#[async_trait]
impl DnsConfigurator for LinuxDnsConfigurator {
    fn name(&self) -> &'static str {
        "systemd-resolved"
    }

    async fn unlock_port(&self) -> Result<(), DomainError> {
        if fs::metadata(&self.resolved_conf).await.is_err() {
            info!(path = %self.resolved_conf.display(), "No systemd-resolved config; assuming port 53 is free");
            return Ok(());
        }

        if fs::metadata(&self.resolved_conf_backup).await.is_err() {
            fs::copy(&self.resolved_conf, &self.resolved_conf_backup)
                .await
                .map_err(|e| io_err("back up", &self.resolved_conf, e))?;
        }

        let current = fs::read_to_string(&self.resolved_conf)
            .await
            .map_err(|e| io_err("read", &self.resolved_conf, e))?;
        fs::write(&self.resolved_conf, patch_resolved_conf(&current))
            .await
            .map_err(|e| io_err("write", &self.resolved_conf, e))?;

        info!("Restarting systemd-resolved with the stub listener disabled");
        self.restart_resolved().await?;
        self.wait_for_port_53().await
    }

    async fn setup_dns(&self) -> Result<(), DomainError> {
        // Keep the very first backup across restarts: after one takeover the
        // live file only points at ourselves.
        if fs::metadata(&self.resolv_conf_backup).await.is_err() {
            let original = fs::read(&self.resolv_conf).await.unwrap_or_default();
            fs::write(&self.resolv_conf_backup, original)
                .await
                .map_err(|e| io_err("back up", &self.resolv_conf, e))?;
        }

        // resolv.conf is commonly a symlink into /run/systemd; replace the
        // link rather than writing through it.
        if let Ok(meta) = fs::symlink_metadata(&self.resolv_conf).await {
            if meta.file_type().is_symlink() {
                fs::remove_file(&self.resolv_conf)
                    .await
                    .map_err(|e| io_err("unlink", &self.resolv_conf, e))?;
            }
        }

        fs::write(&self.resolv_conf, MANAGED_RESOLV_CONF)
            .await
            .map_err(|e| io_err("write", &self.resolv_conf, e))?;

        info!(path = %self.resolv_conf.display(), "System resolver set to 127.0.0.1");
        Ok(())
    }

    async fn restore_dns(&self) -> Result<(), DomainError> {
        if let Ok(original) = fs::read(&self.resolv_conf_backup).await {
            fs::write(&self.resolv_conf, original)
                .await
                .map_err(|e| io_err("restore", &self.resolv_conf, e))?;
            if let Err(e) = fs::remove_file(&self.resolv_conf_backup).await {
                warn!(error = %e, "Failed to remove resolv.conf backup");
            }
        }

        if fs::metadata(&self.resolved_conf_backup).await.is_ok() {
            fs::copy(&self.resolved_conf_backup, &self.resolved_conf)
                .await
                .map_err(|e| io_err("restore", &self.resolved_conf, e))?;
            if let Err(e) = fs::remove_file(&self.resolved_conf_backup).await {
                warn!(error = %e, "Failed to remove resolved.conf backup");
            }
        }

        info!("Restarting systemd-resolved with the original configuration");
        self.restart_resolved().await
    }
}
