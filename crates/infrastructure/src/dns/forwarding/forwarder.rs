use crate::dns::transport::{DnsTransport, UdpTransport};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use rustc_hash::FxBuildHasher;
use sinkhole_application::ports::UpstreamForwarder;
use sinkhole_domain::config::UpstreamConfig;
use sinkhole_domain::DomainError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const DNS_HEADER_LEN: usize = 12;

type Exchange = Shared<BoxFuture<'static, Result<Arc<Vec<u8>>, DomainError>>>;

/// Identity of a query for coalescing: every byte after the message id.
///
/// Covers the header flags (RD, CD), the question exactly as sent (0x20
/// case included) and any EDNS OPT record (DO bit, payload size), so a
/// follower always receives an answer to its own question.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CoalesceKey(Box<[u8]>);

impl CoalesceKey {
    /// Only single-question queries are coalesced.
    fn from_query(query: &[u8]) -> Option<Self> {
        if query.len() < DNS_HEADER_LEN {
            return None;
        }
        let qdcount = u16::from_be_bytes([query[4], query[5]]);
        if qdcount != 1 {
            return None;
        }
        Some(Self(query[2..].into()))
    }
}

/// Forwards raw queries to a single upstream resolver.
///
/// With coalescing on, concurrent identical queries share one upstream
/// exchange; every caller gets the reply rewritten to its own message id.
pub struct UdpForwarder {
    transport: Arc<dyn DnsTransport>,
    timeout: Duration,
    coalesce: bool,
    inflight: Arc<DashMap<CoalesceKey, Exchange, FxBuildHasher>>,
}

impl UdpForwarder {
    pub fn new(transport: Arc<dyn DnsTransport>, timeout: Duration, coalesce: bool) -> Self {
        Self {
            transport,
            timeout,
            coalesce,
            inflight: Arc::new(DashMap::with_hasher(FxBuildHasher)),
        }
    }

    pub fn from_config(upstream: SocketAddr, config: &UpstreamConfig) -> Self {
        Self::new(
            Arc::new(UdpTransport::new(upstream)),
            Duration::from_millis(config.timeout_ms),
            config.coalesce,
        )
    }

    /// Number of distinct exchanges currently outstanding.
    pub fn inflight_count(&self) -> usize {
        self.inflight.len()
    }

    async fn exchange(&self, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        self.transport.send(query, self.timeout).await
    }

    fn start_exchange(&self, key: CoalesceKey, query: Vec<u8>) -> Exchange {
        let transport = Arc::clone(&self.transport);
        let inflight = Arc::clone(&self.inflight);
        let timeout = self.timeout;
        async move {
            let result = transport.send(&query, timeout).await.map(Arc::new);
            inflight.remove(&key);
            result
        }
        .boxed()
        .shared()
    }
}

#[async_trait]
impl UpstreamForwarder for UdpForwarder {
    async fn forward(&self, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        if query.len() < 2 {
            return Err(DomainError::InvalidDnsMessage("query too short".into()));
        }

        let key = if self.coalesce {
            CoalesceKey::from_query(query)
        } else {
            None
        };
        let Some(key) = key else {
            return self.exchange(query).await;
        };

        let exchange = match self.inflight.entry(key.clone()) {
            Entry::Occupied(entry) => {
                debug!(
                    id = u16::from_be_bytes([query[0], query[1]]),
                    "Joining in-flight upstream exchange"
                );
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let exchange = self.start_exchange(key, query.to_vec());
                entry.insert(exchange.clone());
                exchange
            }
        };

        let shared_reply = exchange.await?;
        let mut reply = Vec::clone(&shared_reply);
        if reply.len() >= 2 {
            reply[..2].copy_from_slice(&query[..2]);
        }
        Ok(reply)
    }

    fn upstream(&self) -> String {
        self.transport.server()
    }
}
