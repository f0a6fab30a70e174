pub mod get_recent;

pub use get_recent::GetRecentLogsUseCase;
