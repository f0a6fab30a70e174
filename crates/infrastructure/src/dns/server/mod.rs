pub mod handler;
pub mod udp;

pub use handler::DnsQueryHandler;
pub use udp::UdpDnsServer;
