use crate::ports::BlockFilterEnginePort;
use sinkhole_domain::{normalize_user_domain, DomainError};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct AddLocalRecordUseCase {
    engine: Arc<dyn BlockFilterEnginePort>,
}

impl AddLocalRecordUseCase {
    pub fn new(engine: Arc<dyn BlockFilterEnginePort>) -> Self {
        Self { engine }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, domain: &str, ip: &str) -> Result<(), DomainError> {
        let domain = normalize_user_domain(domain)?;
        let ip: IpAddr = ip
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidIpAddress(ip.to_string()))?;

        self.engine.add_local_record(&domain, ip).await?;

        info!(domain = %domain, ip = %ip, "Local record added");

        Ok(())
    }
}
