use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Local DNS record for static hostname resolution
///
/// Answered directly by the sinkhole, ahead of the allowlist and the
/// blocklists, without consulting the upstream resolver.
///
/// Use cases:
/// - Home network devices (NAS, printers, IoT)
/// - Development environments (local services)
/// - Pinning a name to an internal address
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LocalDnsRecord {
    /// Fully qualified name, e.g. "nas.home.lan"
    pub domain: String,

    /// IPv4 answers A queries, IPv6 answers AAAA queries
    pub ip: IpAddr,

    /// Time-to-live in seconds (optional, default 300)
    #[serde(default)]
    pub ttl: Option<u32>,
}

impl LocalDnsRecord {
    pub fn new(domain: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            domain: domain.into(),
            ip,
            ttl: None,
        }
    }

    /// Get TTL with default fallback
    pub fn ttl_or_default(&self) -> u32 {
        self.ttl.unwrap_or(300)
    }
}
