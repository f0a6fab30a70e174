//! DNS Message Builder
//!
//! Synthesizes the replies the sinkhole answers itself: sinkhole answers
//! for blocked names, local record answers, SERVFAIL and FORMERR. Every
//! reply echoes the request id, opcode, RD flag and question section.

use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{RData, Record, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use sinkhole_domain::DomainError;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// TTL of sinkhole answers.
pub const SINKHOLE_TTL: u32 = 3600;

pub struct MessageBuilder;

impl MessageBuilder {
    /// NOERROR reply skeleton for `request`.
    fn reply_to(request: &Message) -> Message {
        let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
        response.set_recursion_desired(request.recursion_desired());
        response.set_recursion_available(true);
        response.set_checking_disabled(request.checking_disabled());
        response.set_response_code(ResponseCode::NoError);
        for query in request.queries() {
            response.add_query(query.clone());
        }
        response
    }

    /// `0.0.0.0` for every A question, `::` for every AAAA question, no
    /// answer for any other type.
    pub fn sinkhole(request: &Message) -> Message {
        let mut response = Self::reply_to(request);
        for query in request.queries() {
            let rdata = match query.query_type() {
                RecordType::A => RData::A(A(Ipv4Addr::UNSPECIFIED)),
                RecordType::AAAA => RData::AAAA(AAAA(Ipv6Addr::UNSPECIFIED)),
                _ => continue,
            };
            response.add_answer(Record::from_rdata(query.name().clone(), SINKHOLE_TTL, rdata));
        }
        response
    }

    /// Answer `query` from local addresses of the matching family. A name
    /// with only addresses of the other family yields an empty NOERROR.
    pub fn local(request: &Message, query: &Query, ips: &[IpAddr], ttl: u32) -> Message {
        let mut response = Self::reply_to(request);
        for ip in ips {
            let rdata = match (query.query_type(), ip) {
                (RecordType::A, IpAddr::V4(v4)) => RData::A(A(*v4)),
                (RecordType::AAAA, IpAddr::V6(v6)) => RData::AAAA(AAAA(*v6)),
                _ => continue,
            };
            response.add_answer(Record::from_rdata(query.name().clone(), ttl, rdata));
        }
        response
    }

    pub fn servfail(request: &Message) -> Message {
        let mut response = Self::reply_to(request);
        response.set_response_code(ResponseCode::ServFail);
        response
    }

    /// Reply to a datagram that did not decode: only the id is known.
    pub fn formerr(id: u16) -> Message {
        let mut response = Message::new(id, MessageType::Response, OpCode::Query);
        response.set_response_code(ResponseCode::FormErr);
        response
    }

    /// Serialize a Message to wire format bytes
    pub fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsMessage(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
