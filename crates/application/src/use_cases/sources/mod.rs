pub mod invalidate_cache;
pub mod list;
pub mod reload;
pub mod toggle;

pub use invalidate_cache::InvalidateCacheUseCase;
pub use list::ListSourcesUseCase;
pub use reload::ReloadBlocklistsUseCase;
pub use toggle::ToggleSourceUseCase;
