use crate::ports::BlockFilterEnginePort;
use sinkhole_domain::BlocklistSource;
use std::sync::Arc;

pub struct ListSourcesUseCase {
    engine: Arc<dyn BlockFilterEnginePort>,
}

impl ListSourcesUseCase {
    pub fn new(engine: Arc<dyn BlockFilterEnginePort>) -> Self {
        Self { engine }
    }

    pub fn execute(&self) -> Vec<BlocklistSource> {
        self.engine.list_sources()
    }
}
