use crate::ports::BlockFilterEnginePort;
use sinkhole_domain::DomainError;
use std::sync::Arc;
use tracing::info;

pub struct InvalidateCacheUseCase {
    engine: Arc<dyn BlockFilterEnginePort>,
}

impl InvalidateCacheUseCase {
    pub fn new(engine: Arc<dyn BlockFilterEnginePort>) -> Self {
        Self { engine }
    }

    pub async fn execute(&self) -> Result<(), DomainError> {
        self.engine.invalidate_cache().await?;
        info!("Blocklist download cache cleared");
        Ok(())
    }
}
