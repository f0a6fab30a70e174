mod block_filter_engine;
mod config_repository;
mod dns_configurator;
mod event_log;
mod upstream_forwarder;

pub use block_filter_engine::{BlockFilterEnginePort, FilterDecision};
pub use config_repository::ConfigRepository;
pub use dns_configurator::DnsConfigurator;
pub use event_log::{EventLogReader, EventSink};
pub use upstream_forwarder::UpstreamForwarder;
