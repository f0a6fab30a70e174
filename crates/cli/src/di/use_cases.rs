use sinkhole_application::ports::{BlockFilterEnginePort, DnsConfigurator, EventLogReader};
use sinkhole_application::use_cases::{
    GetRecentLogsUseCase, GetStatsUseCase, ReloadBlocklistsUseCase, RestoreSystemDnsUseCase,
    TakeOverSystemDnsUseCase,
};
use sinkhole_domain::QueryCounters;
use std::sync::Arc;

pub struct UseCases {
    pub reload_blocklists: Arc<ReloadBlocklistsUseCase>,
    pub get_stats: Arc<GetStatsUseCase>,
    pub get_recent_logs: Arc<GetRecentLogsUseCase>,
    pub take_over_system_dns: Arc<TakeOverSystemDnsUseCase>,
    pub restore_system_dns: Arc<RestoreSystemDnsUseCase>,
}

impl UseCases {
    pub fn new(
        engine: Arc<dyn BlockFilterEnginePort>,
        counters: Arc<QueryCounters>,
        logs: Arc<dyn EventLogReader>,
        configurator: Arc<dyn DnsConfigurator>,
    ) -> Self {
        Self {
            reload_blocklists: Arc::new(ReloadBlocklistsUseCase::new(engine.clone())),
            get_stats: Arc::new(GetStatsUseCase::new(engine, counters)),
            get_recent_logs: Arc::new(GetRecentLogsUseCase::new(logs)),
            take_over_system_dns: Arc::new(TakeOverSystemDnsUseCase::new(configurator.clone())),
            restore_system_dns: Arc::new(RestoreSystemDnsUseCase::new(configurator)),
        }
    }
}
