use crate::ports::BlockFilterEnginePort;
use sinkhole_domain::{DomainError, LoadReport};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct ReloadBlocklistsUseCase {
    engine: Arc<dyn BlockFilterEnginePort>,
}

impl ReloadBlocklistsUseCase {
    pub fn new(engine: Arc<dyn BlockFilterEnginePort>) -> Self {
        Self { engine }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> Result<LoadReport, DomainError> {
        let report = self.engine.reload().await?;

        for error in &report.errors {
            warn!(source = %error.source_name, reason = %error.reason, "Source skipped");
        }

        info!(
            total_domains = report.stats.total_domains,
            duplicates = report.stats.duplicates,
            failed_sources = report.errors.len(),
            "Blocklists reloaded"
        );

        Ok(report)
    }
}
