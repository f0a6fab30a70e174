pub mod forwarder;
pub mod message_builder;
pub mod upstream;

pub use forwarder::UdpForwarder;
pub use message_builder::MessageBuilder;
pub use upstream::{parse_resolv_conf, resolve_upstream};
