pub mod allowlist;
pub mod local_records;
pub mod logs;
pub mod sources;
pub mod stats;
pub mod system;

pub use allowlist::{AddAllowedDomainUseCase, ListAllowedDomainsUseCase, RemoveAllowedDomainUseCase};
pub use local_records::{AddLocalRecordUseCase, ListLocalRecordsUseCase, RemoveLocalRecordUseCase};
pub use logs::GetRecentLogsUseCase;
pub use sources::{
    InvalidateCacheUseCase, ListSourcesUseCase, ReloadBlocklistsUseCase, ToggleSourceUseCase,
};
pub use stats::GetStatsUseCase;
pub use system::{RestoreSystemDnsUseCase, TakeOverSystemDnsUseCase};
