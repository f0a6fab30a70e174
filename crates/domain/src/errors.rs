use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Blocklist source not found: {0}")]
    SourceNotFound(String),

    #[error("Local record not found: {0}")]
    LocalRecordNotFound(String),

    #[error("Cache directory {path} unavailable: {reason}")]
    CacheDirUnavailable { path: String, reason: String },

    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Timeout waiting for {server}")]
    TransportTimeout { server: String },

    #[error("Transport error talking to {server}: {reason}")]
    Transport { server: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("System DNS configuration failed: {0}")]
    SystemDns(String),

    #[error("I/O error: {0}")]
    IoError(String),
}
