use crate::system::{RESOLV_CONF, RESOLV_CONF_BACKUP};
use sinkhole_domain::config::{parse_upstream_addr, UpstreamConfig, UpstreamStrategy, GOOGLE_DNS};
use sinkhole_domain::DomainError;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use tracing::{info, warn};

/// Pick the upstream resolver address for `config.strategy`.
pub fn resolve_upstream(config: &UpstreamConfig) -> Result<SocketAddr, DomainError> {
    match config.strategy {
        UpstreamStrategy::Custom => {
            let custom = config.custom.as_deref().ok_or_else(|| {
                DomainError::Config("upstream strategy 'custom' requires upstream.custom".into())
            })?;
            parse_upstream_addr(custom).map_err(|e| DomainError::Config(e.to_string()))
        }
        UpstreamStrategy::Auto => Ok(detect_system_upstream(&[
            Path::new(RESOLV_CONF_BACKUP),
            Path::new(RESOLV_CONF),
        ])),
        strategy => Ok(strategy.public_address().unwrap_or(GOOGLE_DNS)),
    }
}

/// First usable nameserver in the given resolv.conf files, tried in order.
///
/// The pre-takeover backup comes first: once the sinkhole owns the system
/// resolver, the live file only points back at ourselves.
pub fn detect_system_upstream(candidates: &[&Path]) -> SocketAddr {
    for path in candidates {
        let Ok(content) = std::fs::read_to_string(path) else {
            continue;
        };
        if let Some(addr) = parse_resolv_conf(&content) {
            info!(upstream = %addr, source = %path.display(), "Detected system resolver");
            return addr;
        }
    }

    warn!(fallback = %GOOGLE_DNS, "No usable system resolver found");
    GOOGLE_DNS
}

/// First non-loopback `nameserver` entry, port 53.
pub fn parse_resolv_conf(content: &str) -> Option<SocketAddr> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("nameserver") => fields.next(),
                _ => None,
            }
        })
        // Strip an IPv6 zone id ("fe80::1%eth0").
        .filter_map(|addr| addr.split('%').next()?.parse::<IpAddr>().ok())
        .find(|ip| !ip.is_loopback() && !ip.is_unspecified())
        .map(|ip| SocketAddr::new(ip, 53))
}
