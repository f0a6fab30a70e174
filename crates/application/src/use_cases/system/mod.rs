pub mod restore;
pub mod take_over;

pub use restore::RestoreSystemDnsUseCase;
pub use take_over::TakeOverSystemDnsUseCase;
