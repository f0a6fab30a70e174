mod use_cases;

pub use use_cases::UseCases;

use anyhow::Context;
use sinkhole_domain::{Config, QueryCounters};
use sinkhole_infrastructure::blocklist::BlocklistEngine;
use sinkhole_infrastructure::dns::forwarding::resolve_upstream;
use sinkhole_infrastructure::dns::{DnsQueryHandler, UdpForwarder};
use sinkhole_infrastructure::events::{EventEmitter, LogRingBuffer};
use sinkhole_infrastructure::repositories::TomlConfigRepository;
use sinkhole_infrastructure::system::select_configurator;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Everything the running service needs, wired once at startup.
pub struct Services {
    pub engine: Arc<BlocklistEngine>,
    pub handler: Arc<DnsQueryHandler>,
    pub use_cases: UseCases,
    pub upstream: SocketAddr,
}

impl Services {
    /// The upstream is resolved here, before the system resolver is touched,
    /// so the auto strategy still sees the original configuration.
    pub fn build(config: &Config, config_path: PathBuf) -> anyhow::Result<Self> {
        let upstream =
            resolve_upstream(&config.upstream).context("failed to resolve upstream resolver")?;
        info!(upstream = %upstream, strategy = %config.upstream.strategy, "Upstream resolver selected");

        let repository = Arc::new(TomlConfigRepository::new(config_path));
        let log_buffer = Arc::new(LogRingBuffer::new(config.logging.recent_lines));
        let events = EventEmitter::new(log_buffer.clone());

        let engine = Arc::new(
            BlocklistEngine::new(config, repository, events.clone())
                .context("failed to build blocklist engine")?,
        );

        let counters = Arc::new(QueryCounters::new());
        let forwarder = Arc::new(UdpForwarder::from_config(upstream, &config.upstream));
        let handler = Arc::new(DnsQueryHandler::new(
            engine.clone(),
            forwarder,
            counters.clone(),
            events,
        ));

        let configurator = select_configurator(config.system.manage_dns);
        let use_cases = UseCases::new(engine.clone(), counters, log_buffer, configurator);

        Ok(Self {
            engine,
            handler,
            use_cases,
            upstream,
        })
    }
}
