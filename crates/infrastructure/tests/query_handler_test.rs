use async_trait::async_trait;
use hickory_proto::op::{OpCode, ResponseCode};
use hickory_proto::rr::RecordType;
use sinkhole_application::ports::{
    BlockFilterEnginePort, EventLogReader, FilterDecision, UpstreamForwarder,
};
use sinkhole_domain::{BlocklistSource, DomainError, LoadReport, LocalDnsRecord, QueryCounters};
use sinkhole_infrastructure::dns::DnsQueryHandler;
use sinkhole_infrastructure::events::{EventEmitter, LogRingBuffer};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mod helpers;
use helpers::builders::{
    answer_ips, build_multi_query, build_query, build_query_with_opcode, decode,
};
use helpers::dns_server_mock::MockDnsServer;

// ============================================================================
// Test doubles
// ============================================================================

/// Fixed block set plus local records; no loading.
struct StaticEngine {
    blocked: Vec<&'static str>,
    local: Vec<(&'static str, IpAddr)>,
}

#[async_trait]
impl BlockFilterEnginePort for StaticEngine {
    fn check(&self, domain: &str) -> FilterDecision {
        let hit = self
            .blocked
            .iter()
            .any(|rule| domain == *rule || domain.ends_with(&format!(".{}", rule)));
        if hit {
            FilterDecision::Block
        } else {
            FilterDecision::Allow
        }
    }

    fn lookup_local(&self, domain: &str) -> Option<Vec<IpAddr>> {
        let ips: Vec<IpAddr> = self
            .local
            .iter()
            .filter(|(name, _)| *name == domain)
            .map(|(_, ip)| *ip)
            .collect();
        (!ips.is_empty()).then_some(ips)
    }

    fn compiled_domain_count(&self) -> usize {
        self.blocked.len()
    }

    fn last_load_report(&self) -> LoadReport {
        LoadReport::default()
    }

    async fn reload(&self) -> Result<LoadReport, DomainError> {
        Ok(LoadReport::default())
    }

    fn list_sources(&self) -> Vec<BlocklistSource> {
        vec![]
    }

    async fn toggle_source(&self, name: &str, _enabled: bool) -> Result<(), DomainError> {
        Err(DomainError::SourceNotFound(name.to_string()))
    }

    async fn add_allowed(&self, _domain: &str) -> Result<(), DomainError> {
        Ok(())
    }

    async fn remove_allowed(&self, _domain: &str) -> Result<(), DomainError> {
        Ok(())
    }

    fn list_allowed(&self) -> Vec<String> {
        vec![]
    }

    async fn add_local_record(&self, _domain: &str, _ip: IpAddr) -> Result<(), DomainError> {
        Ok(())
    }

    async fn remove_local_record(&self, domain: &str) -> Result<(), DomainError> {
        Err(DomainError::LocalRecordNotFound(domain.to_string()))
    }

    fn list_local_records(&self) -> Vec<LocalDnsRecord> {
        vec![]
    }

    async fn invalidate_cache(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Echoes the mock upstream answer, or fails every exchange.
struct ScriptedForwarder {
    fail: bool,
    calls: AtomicUsize,
}

impl ScriptedForwarder {
    fn answering() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamForwarder for ScriptedForwarder {
    async fn forward(&self, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DomainError::TransportTimeout {
                server: "192.0.2.1:53".into(),
            });
        }
        Ok(MockDnsServer::build_mock_response(query))
    }

    fn upstream(&self) -> String {
        "mock".into()
    }
}

struct Harness {
    handler: DnsQueryHandler,
    forwarder: Arc<ScriptedForwarder>,
    counters: Arc<QueryCounters>,
    events: Arc<LogRingBuffer>,
}

fn harness(forwarder: ScriptedForwarder) -> Harness {
    let engine = Arc::new(StaticEngine {
        blocked: vec!["ads.example.com", "doubleclick.net"],
        local: vec![
            ("nas.home.lan", "192.168.1.10".parse().unwrap()),
            ("v6only.home.lan", "fd00::20".parse().unwrap()),
        ],
    });
    let forwarder = Arc::new(forwarder);
    let counters = Arc::new(QueryCounters::new());
    let events = Arc::new(LogRingBuffer::new(50));
    let handler = DnsQueryHandler::new(
        engine,
        forwarder.clone(),
        counters.clone(),
        EventEmitter::new(events.clone()),
    );
    Harness {
        handler,
        forwarder,
        counters,
        events,
    }
}

// ============================================================================
// Blocking
// ============================================================================

#[tokio::test]
async fn test_blocked_a_query_gets_unspecified_v4() {
    let h = harness(ScriptedForwarder::answering());

    let reply = h
        .handler
        .handle(&build_query(0x1234, "ads.example.com.", RecordType::A))
        .await
        .unwrap();
    let message = decode(&reply);

    assert_eq!(message.id(), 0x1234);
    assert_eq!(message.response_code(), ResponseCode::NoError);
    assert!(message.recursion_available());
    assert!(message.recursion_desired());
    assert_eq!(message.queries().len(), 1);
    assert_eq!(answer_ips(&message), vec!["0.0.0.0".parse::<IpAddr>().unwrap()]);
    assert_eq!(message.answers()[0].ttl(), 3600);
    assert_eq!(h.counters.total(), 1);
    assert_eq!(h.counters.blocked(), 1);
    assert_eq!(h.forwarder.calls(), 0);
    assert!(h.events.recent(None)[0].ends_with("[BLOCKED] ads.example.com"));
}

#[tokio::test]
async fn test_blocked_aaaa_query_gets_unspecified_v6() {
    let h = harness(ScriptedForwarder::answering());

    let reply = h
        .handler
        .handle(&build_query(7, "tracker.doubleclick.net", RecordType::AAAA))
        .await
        .unwrap();

    assert_eq!(answer_ips(&decode(&reply)), vec!["::".parse::<IpAddr>().unwrap()]);
}

#[tokio::test]
async fn test_blocked_other_type_has_no_answer() {
    let h = harness(ScriptedForwarder::answering());

    let reply = h
        .handler
        .handle(&build_query(8, "ads.example.com", RecordType::MX))
        .await
        .unwrap();
    let message = decode(&reply);

    assert_eq!(message.response_code(), ResponseCode::NoError);
    assert!(message.answers().is_empty());
    assert_eq!(h.counters.blocked(), 1);
}

#[tokio::test]
async fn test_first_blocked_question_wins() {
    let h = harness(ScriptedForwarder::answering());

    let query = build_multi_query(
        9,
        &[("fine.example", RecordType::A), ("ads.example.com", RecordType::A)],
    );
    let reply = h.handler.handle(&query).await.unwrap();
    let message = decode(&reply);

    assert_eq!(message.queries().len(), 2);
    assert_eq!(answer_ips(&message).len(), 2);
    assert_eq!(h.forwarder.calls(), 0);
    assert_eq!(h.counters.blocked(), 1);
}

// ============================================================================
// Forwarding
// ============================================================================

#[tokio::test]
async fn test_allowed_query_is_forwarded() {
    let h = harness(ScriptedForwarder::answering());

    let reply = h
        .handler
        .handle(&build_query(0x4242, "google.com", RecordType::A))
        .await
        .unwrap();
    let message = decode(&reply);

    assert_eq!(message.id(), 0x4242);
    assert_eq!(answer_ips(&message), vec!["93.184.216.34".parse::<IpAddr>().unwrap()]);
    assert_eq!(h.forwarder.calls(), 1);
    assert_eq!(h.counters.total(), 1);
    assert_eq!(h.counters.blocked(), 0);
}

#[tokio::test]
async fn test_upstream_failure_yields_servfail() {
    let h = harness(ScriptedForwarder::failing());

    let reply = h
        .handler
        .handle(&build_query(0x0a0b, "google.com", RecordType::A))
        .await
        .unwrap();
    let message = decode(&reply);

    assert_eq!(message.id(), 0x0a0b);
    assert_eq!(message.response_code(), ResponseCode::ServFail);
    assert_eq!(message.queries().len(), 1);
}

#[tokio::test]
async fn test_non_query_opcode_is_forwarded_uncounted() {
    let h = harness(ScriptedForwarder::answering());

    let query = build_query_with_opcode(3, "ads.example.com", RecordType::SOA, OpCode::Notify);
    let reply = h.handler.handle(&query).await;

    assert!(reply.is_some());
    assert_eq!(h.forwarder.calls(), 1);
    assert_eq!(h.counters.total(), 0);
    assert_eq!(h.counters.blocked(), 0);
}

// ============================================================================
// Local records
// ============================================================================

#[tokio::test]
async fn test_local_record_answers_matching_family() {
    let h = harness(ScriptedForwarder::answering());

    let reply = h
        .handler
        .handle(&build_query(11, "NAS.home.lan.", RecordType::A))
        .await
        .unwrap();

    assert_eq!(
        answer_ips(&decode(&reply)),
        vec!["192.168.1.10".parse::<IpAddr>().unwrap()]
    );
    assert_eq!(h.forwarder.calls(), 0);
    assert_eq!(h.counters.blocked(), 0);
}

#[tokio::test]
async fn test_local_record_other_family_is_empty_noerror() {
    let h = harness(ScriptedForwarder::answering());

    let reply = h
        .handler
        .handle(&build_query(12, "v6only.home.lan", RecordType::A))
        .await
        .unwrap();
    let message = decode(&reply);

    assert_eq!(message.response_code(), ResponseCode::NoError);
    assert!(message.answers().is_empty());
    assert_eq!(h.forwarder.calls(), 0);
}

// ============================================================================
// Malformed input
// ============================================================================

#[tokio::test]
async fn test_garbage_with_id_gets_formerr() {
    let h = harness(ScriptedForwarder::answering());

    // Header claims one question but the datagram ends after the header.
    let garbage = [0xbe, 0xef, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff];
    let reply = h.handler.handle(&garbage).await.unwrap();
    let message = decode(&reply);

    assert_eq!(message.id(), 0xbeef);
    assert_eq!(message.response_code(), ResponseCode::FormErr);
    assert_eq!(h.counters.total(), 0);
}

#[tokio::test]
async fn test_single_byte_is_dropped() {
    let h = harness(ScriptedForwarder::answering());
    assert!(h.handler.handle(&[0x01]).await.is_none());
}

#[tokio::test]
async fn test_inbound_responses_are_dropped() {
    let h = harness(ScriptedForwarder::answering());
    let response = MockDnsServer::build_mock_response(&build_query(5, "google.com", RecordType::A));

    assert!(h.handler.handle(&response).await.is_none());
    assert_eq!(h.forwarder.calls(), 0);
}
