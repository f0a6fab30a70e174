pub mod add;
pub mod list;
pub mod remove;

pub use add::AddAllowedDomainUseCase;
pub use list::ListAllowedDomainsUseCase;
pub use remove::RemoveAllowedDomainUseCase;
