use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (default: "info")
    /// Options: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Engine events kept in memory for `get_recent_logs`
    #[serde(default = "default_recent_lines")]
    pub recent_lines: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            recent_lines: default_recent_lines(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_recent_lines() -> usize {
    200
}
