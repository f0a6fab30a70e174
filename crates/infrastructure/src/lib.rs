pub mod blocklist;
pub mod dns;
pub mod events;
pub mod repositories;
pub mod system;
