use crate::ports::BlockFilterEnginePort;
use sinkhole_domain::LocalDnsRecord;
use std::sync::Arc;

pub struct ListLocalRecordsUseCase {
    engine: Arc<dyn BlockFilterEnginePort>,
}

impl ListLocalRecordsUseCase {
    pub fn new(engine: Arc<dyn BlockFilterEnginePort>) -> Self {
        Self { engine }
    }

    pub fn execute(&self) -> Vec<LocalDnsRecord> {
        self.engine.list_local_records()
    }
}
