use serde::{Deserialize, Serialize};

/// Operating-system resolver takeover
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SystemConfig {
    /// Point the system resolver at the sinkhole on startup
    #[serde(default = "default_true")]
    pub manage_dns: bool,

    /// Put the previous resolver settings back on shutdown
    #[serde(default = "default_true")]
    pub restore_on_exit: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            manage_dns: true,
            restore_on_exit: true,
        }
    }
}
