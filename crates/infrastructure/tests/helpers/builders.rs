#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RData, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::IpAddr;
use std::str::FromStr;

/// Wire-format query with a single question.
pub fn build_query(id: u16, name: &str, record_type: RecordType) -> Vec<u8> {
    build_query_with_opcode(id, name, record_type, OpCode::Query)
}

pub fn build_query_with_opcode(
    id: u16,
    name: &str,
    record_type: RecordType,
    op_code: OpCode,
) -> Vec<u8> {
    let mut query = Query::new();
    query.set_name(Name::from_str(name).unwrap());
    query.set_query_type(record_type);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(id, MessageType::Query, op_code);
    message.set_recursion_desired(true);
    message.add_query(query);
    encode(&message)
}

pub fn build_multi_query(id: u16, questions: &[(&str, RecordType)]) -> Vec<u8> {
    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    for (name, record_type) in questions {
        let mut query = Query::new();
        query.set_name(Name::from_str(name).unwrap());
        query.set_query_type(*record_type);
        query.set_query_class(DNSClass::IN);
        message.add_query(query);
    }
    encode(&message)
}

pub fn encode(message: &Message) -> Vec<u8> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message.emit(&mut encoder).unwrap();
    buf
}

pub fn decode(bytes: &[u8]) -> Message {
    Message::from_vec(bytes).unwrap()
}

/// A / AAAA addresses in the answer section.
pub fn answer_ips(message: &Message) -> Vec<IpAddr> {
    message
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            RData::A(a) => Some(IpAddr::V4(a.0)),
            RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
            _ => None,
        })
        .collect()
}

/// Append an EDNS(0) OPT record with the DO bit set and bump ARCOUNT.
pub fn with_dnssec_ok(mut query: Vec<u8>) -> Vec<u8> {
    let arcount = u16::from_be_bytes([query[10], query[11]]) + 1;
    query[10..12].copy_from_slice(&arcount.to_be_bytes());
    query.extend_from_slice(&[
        0x00, // root owner name
        0x00, 0x29, // type OPT
        0x10, 0x00, // UDP payload size 4096
        0x00, 0x00, 0x80, 0x00, // extended rcode, version, DO flag
        0x00, 0x00, // no options
    ]);
    query
}
