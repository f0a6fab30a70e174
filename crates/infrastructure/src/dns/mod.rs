pub mod forwarding;
pub mod server;
pub mod transport;

pub use forwarding::{MessageBuilder, UdpForwarder};
pub use server::{DnsQueryHandler, UdpDnsServer};
