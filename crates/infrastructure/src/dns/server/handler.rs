use crate::dns::forwarding::MessageBuilder;
use crate::events::EventEmitter;
use hickory_proto::op::{Message, MessageType, OpCode};
use sinkhole_application::ports::{BlockFilterEnginePort, FilterDecision, UpstreamForwarder};
use sinkhole_domain::{normalize_domain, QueryCounters};
use std::sync::Arc;
use tracing::{debug, warn};

/// TTL of answers built from local records.
const LOCAL_RECORD_TTL: u32 = 300;

/// Turns one inbound datagram into at most one reply datagram.
///
/// Per decodable query:
///   1. Non-QUERY opcode => forwarded untouched, not counted
///   2. `queries_total += 1`
///   3. First question with a local record => local answer
///   4. First blocked question => `queries_blocked += 1`, sinkhole answer
///   5. Otherwise forwarded; upstream failure => SERVFAIL
pub struct DnsQueryHandler {
    engine: Arc<dyn BlockFilterEnginePort>,
    forwarder: Arc<dyn UpstreamForwarder>,
    counters: Arc<QueryCounters>,
    events: EventEmitter,
}

impl DnsQueryHandler {
    pub fn new(
        engine: Arc<dyn BlockFilterEnginePort>,
        forwarder: Arc<dyn UpstreamForwarder>,
        counters: Arc<QueryCounters>,
        events: EventEmitter,
    ) -> Self {
        Self {
            engine,
            forwarder,
            counters,
            events,
        }
    }

    /// `None` means nothing can be sent back (too short to carry an id, or
    /// not a query at all).
    pub async fn handle(&self, datagram: &[u8]) -> Option<Vec<u8>> {
        let request = match Message::from_vec(datagram) {
            Ok(message) => message,
            Err(e) => return self.malformed(datagram, &e.to_string()),
        };

        if request.message_type() == MessageType::Response {
            debug!(id = request.id(), "Dropping inbound DNS response");
            return None;
        }

        if request.op_code() != OpCode::Query {
            debug!(op_code = ?request.op_code(), "Forwarding non-query opcode");
            return self.forward(datagram, &request).await;
        }

        self.counters.record_query();

        for query in request.queries() {
            let name = query.name().to_ascii();
            let domain = normalize_domain(&name);

            if let Some(ips) = self.engine.lookup_local(&domain) {
                self.events.emit_with(|| format!("[LOCAL] {}", domain));
                let response = MessageBuilder::local(&request, query, &ips, LOCAL_RECORD_TTL);
                return self.encode(&response);
            }

            if self.engine.check(&domain) == FilterDecision::Block {
                self.counters.record_blocked();
                self.events.emit_with(|| format!("[BLOCKED] {}", domain));
                return self.encode(&MessageBuilder::sinkhole(&request));
            }

            self.events.emit_with(|| format!("[ALLOWED] {}", domain));
        }

        self.forward(datagram, &request).await
    }

    async fn forward(&self, datagram: &[u8], request: &Message) -> Option<Vec<u8>> {
        match self.forwarder.forward(datagram).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!(
                    upstream = %self.forwarder.upstream(),
                    id = request.id(),
                    error = %e,
                    "Upstream exchange failed; answering SERVFAIL"
                );
                self.encode(&MessageBuilder::servfail(request))
            }
        }
    }

    fn malformed(&self, datagram: &[u8], reason: &str) -> Option<Vec<u8>> {
        if datagram.len() < 2 {
            debug!(len = datagram.len(), "Dropping datagram without a message id");
            return None;
        }
        // QR set: someone else's response, never answer it.
        if datagram.len() >= 3 && datagram[2] & 0x80 != 0 {
            debug!("Dropping undecodable response datagram");
            return None;
        }

        let id = u16::from_be_bytes([datagram[0], datagram[1]]);
        debug!(id, reason = %reason, "Undecodable query; answering FORMERR");
        self.encode(&MessageBuilder::formerr(id))
    }

    fn encode(&self, message: &Message) -> Option<Vec<u8>> {
        match MessageBuilder::serialize(message) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(id = message.id(), error = %e, "Failed to encode reply");
                None
            }
        }
    }
}
