use async_trait::async_trait;
use sinkhole_application::ports::DnsConfigurator;
use sinkhole_domain::DomainError;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{info, warn};

const FALLBACK_INTERFACE: &str = "Wi-Fi";

/// Points the adapter that holds the default gateway at 127.0.0.1 through
/// `netsh`, and back to DHCP on restore.
pub struct WindowsDnsConfigurator {
    interface: Mutex<Option<String>>,
}

impl WindowsDnsConfigurator {
    pub fn new() -> Self {
        Self {
            interface: Mutex::new(None),
        }
    }

    async fn detect_interface() -> String {
        let output = Command::new("powershell")
            .args([
                "-NoProfile",
                "-Command",
                "Get-NetIPConfiguration | Where-Object { $_.IPv4DefaultGateway -ne $null } | Select-Object -First 1 -ExpandProperty InterfaceAlias",
            ])
            .output()
            .await;

        match output {
            Ok(out) if out.status.success() => {
                let alias = String::from_utf8_lossy(&out.stdout).trim().to_string();
                if alias.is_empty() {
                    FALLBACK_INTERFACE.to_string()
                } else {
                    alias
                }
            }
            _ => {
                warn!(fallback = FALLBACK_INTERFACE, "Could not detect active interface");
                FALLBACK_INTERFACE.to_string()
            }
        }
    }

    async fn interface(&self) -> String {
        let mut cached = self.interface.lock().await;
        if let Some(name) = cached.as_ref() {
            return name.clone();
        }
        let name = Self::detect_interface().await;
        *cached = Some(name.clone());
        name
    }

    async fn netsh(args: &[&str]) -> Result<(), DomainError> {
        let output = Command::new("netsh")
            .args(args)
            .output()
            .await
            .map_err(|e| DomainError::SystemDns(format!("failed to run netsh: {}", e)))?;

        if !output.status.success() {
            return Err(DomainError::SystemDns(format!(
                "netsh failed: {}",
                String::from_utf8_lossy(&output.stdout).trim()
            )));
        }
        Ok(())
    }
}

impl Default for WindowsDnsConfigurator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsConfigurator for WindowsDnsConfigurator {
    fn name(&self) -> &'static str {
        "netsh"
    }

    async fn unlock_port(&self) -> Result<(), DomainError> {
        // Port 53 is only taken when the DNS Server role is installed.
        Ok(())
    }

    async fn setup_dns(&self) -> Result<(), DomainError> {
        let interface = self.interface().await;
        info!(interface = %interface, "Setting interface DNS to 127.0.0.1");
        Self::netsh(&["interface", "ip", "set", "dns", &interface, "static", "127.0.0.1"]).await
    }

    async fn restore_dns(&self) -> Result<(), DomainError> {
        let interface = self.interface().await;
        info!(interface = %interface, "Restoring interface DNS to DHCP");
        Self::netsh(&["interface", "ip", "set", "dns", &interface, "dhcp"]).await
    }
}
