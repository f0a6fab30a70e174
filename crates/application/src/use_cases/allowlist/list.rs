use crate::ports::BlockFilterEnginePort;
use std::sync::Arc;

pub struct ListAllowedDomainsUseCase {
    engine: Arc<dyn BlockFilterEnginePort>,
}

impl ListAllowedDomainsUseCase {
    pub fn new(engine: Arc<dyn BlockFilterEnginePort>) -> Self {
        Self { engine }
    }

    /// Insertion order.
    pub fn execute(&self) -> Vec<String> {
        self.engine.list_allowed()
    }
}
