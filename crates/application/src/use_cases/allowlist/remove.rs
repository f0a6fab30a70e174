use crate::ports::BlockFilterEnginePort;
use sinkhole_domain::{normalize_user_domain, DomainError};
use std::sync::Arc;
use tracing::{info, instrument};

pub struct RemoveAllowedDomainUseCase {
    engine: Arc<dyn BlockFilterEnginePort>,
}

impl RemoveAllowedDomainUseCase {
    pub fn new(engine: Arc<dyn BlockFilterEnginePort>) -> Self {
        Self { engine }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, domain: &str) -> Result<(), DomainError> {
        let domain = normalize_user_domain(domain)?;
        self.engine.remove_allowed(&domain).await?;

        info!(domain = %domain, "Domain removed from allowlist");

        Ok(())
    }
}
