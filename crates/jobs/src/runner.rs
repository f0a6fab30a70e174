use crate::BlocklistSyncJob;
use std::sync::Arc;
use tracing::info;

/// Central orchestrator for background jobs.
///
/// ```rust,ignore
/// JobRunner::new()
///     .with_blocklist_sync(BlocklistSyncJob::new(reload).with_interval(86400))
///     .start()
///     .await;
/// ```
pub struct JobRunner {
    blocklist_sync: Option<BlocklistSyncJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            blocklist_sync: None,
        }
    }

    pub fn with_blocklist_sync(mut self, job: BlocklistSyncJob) -> Self {
        self.blocklist_sync = Some(job);
        self
    }

    /// Start all registered background jobs.
    pub async fn start(self) {
        info!("Starting background job runner");

        if let Some(job) = self.blocklist_sync {
            Arc::new(job).start().await;
        }

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
