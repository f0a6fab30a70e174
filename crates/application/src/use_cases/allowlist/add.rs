use crate::ports::BlockFilterEnginePort;
use sinkhole_domain::{normalize_user_domain, DomainError};
use std::sync::Arc;
use tracing::{info, instrument};

/// Exempt one domain (exact match only) from blocking. Effective immediately.
pub struct AddAllowedDomainUseCase {
    engine: Arc<dyn BlockFilterEnginePort>,
}

impl AddAllowedDomainUseCase {
    pub fn new(engine: Arc<dyn BlockFilterEnginePort>) -> Self {
        Self { engine }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, domain: &str) -> Result<(), DomainError> {
        let domain = normalize_user_domain(domain)?;
        self.engine.add_allowed(&domain).await?;

        info!(domain = %domain, "Domain allowed");

        Ok(())
    }
}
