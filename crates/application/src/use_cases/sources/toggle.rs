use crate::ports::BlockFilterEnginePort;
use sinkhole_domain::DomainError;
use std::sync::Arc;
use tracing::{info, instrument};

/// Enable or disable a source by name.
///
/// The change is persisted immediately and applies to the ruleset on the
/// next reload.
pub struct ToggleSourceUseCase {
    engine: Arc<dyn BlockFilterEnginePort>,
}

impl ToggleSourceUseCase {
    pub fn new(engine: Arc<dyn BlockFilterEnginePort>) -> Self {
        Self { engine }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, name: &str, enabled: bool) -> Result<(), DomainError> {
        self.engine.toggle_source(name, enabled).await?;

        info!(source = %name, enabled, "Blocklist source toggled");

        Ok(())
    }
}
