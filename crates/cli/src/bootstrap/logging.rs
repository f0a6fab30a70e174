use sinkhole_domain::Config;
use tracing::{info, warn};

pub fn init_logging(config: &Config) {
    let parsed = config.logging.level.parse::<tracing::Level>().ok();
    let log_level = parsed.unwrap_or(tracing::Level::INFO);

    tracing_subscriber::fmt()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_max_level(log_level)
        .with_ansi(true)
        .init();

    if parsed.is_none() {
        warn!(level = %config.logging.level, "Unknown log level; using info");
    }
    info!("Logging initialized at level: {}", log_level);
}
