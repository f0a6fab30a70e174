use crate::ports::BlockFilterEnginePort;
use sinkhole_domain::{EngineStats, QueryCounters};
use std::sync::Arc;

pub struct GetStatsUseCase {
    engine: Arc<dyn BlockFilterEnginePort>,
    counters: Arc<QueryCounters>,
}

impl GetStatsUseCase {
    pub fn new(engine: Arc<dyn BlockFilterEnginePort>, counters: Arc<QueryCounters>) -> Self {
        Self { engine, counters }
    }

    pub fn execute(&self) -> EngineStats {
        EngineStats {
            queries_total: self.counters.total(),
            queries_blocked: self.counters.blocked(),
            active_rules: self.engine.compiled_domain_count(),
        }
    }
}
