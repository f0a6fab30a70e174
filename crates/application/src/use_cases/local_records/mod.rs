pub mod add;
pub mod list;
pub mod remove;

pub use add::AddLocalRecordUseCase;
pub use list::ListLocalRecordsUseCase;
pub use remove::RemoveLocalRecordUseCase;
