use anyhow::Context;
use sinkhole_infrastructure::dns::{DnsQueryHandler, UdpDnsServer};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Bind the UDP listener. A bind failure is fatal.
pub async fn bind_dns_server(
    bind_addr: &str,
    handler: Arc<DnsQueryHandler>,
) -> anyhow::Result<UdpDnsServer> {
    let socket_addr = SocketAddr::from_str(bind_addr)
        .with_context(|| format!("invalid listen address {}", bind_addr))?;

    info!(bind_address = %socket_addr, "Starting DNS server");

    let server = UdpDnsServer::bind(socket_addr, handler)
        .await
        .with_context(|| format!("cannot listen on {}", socket_addr))?;

    info!(protocol = "UDP", "DNS server ready to accept queries");
    Ok(server)
}
