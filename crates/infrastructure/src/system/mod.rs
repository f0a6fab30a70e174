pub mod linux;
pub mod noop;
#[cfg(windows)]
pub mod windows;

use sinkhole_application::ports::DnsConfigurator;
use std::sync::Arc;

pub use linux::{patch_resolved_conf, LinuxDnsConfigurator};
pub use noop::NoopDnsConfigurator;

pub const RESOLV_CONF: &str = "/etc/resolv.conf";
/// Copy of resolv.conf taken before the sinkhole took over.
pub const RESOLV_CONF_BACKUP: &str = "/etc/resolv.conf.orig.sinkhole";
pub const RESOLVED_CONF: &str = "/etc/systemd/resolved.conf";
pub const RESOLVED_CONF_BACKUP: &str = "/etc/systemd/resolved.conf.backup.sinkhole";

/// Configurator for the running platform, or the no-op one when system DNS
/// management is turned off.
pub fn select_configurator(manage_system_dns: bool) -> Arc<dyn DnsConfigurator> {
    if !manage_system_dns {
        return Arc::new(NoopDnsConfigurator);
    }

    #[cfg(target_os = "linux")]
    {
        Arc::new(LinuxDnsConfigurator::new())
    }

    #[cfg(windows)]
    {
        Arc::new(windows::WindowsDnsConfigurator::new())
    }

    #[cfg(not(any(target_os = "linux", windows)))]
    {
        tracing::warn!("System DNS management is not supported on this platform");
        Arc::new(NoopDnsConfigurator)
    }
}
