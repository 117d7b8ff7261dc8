//! Construction of mDNS responses and cache-flush bit handling.

use crate::message::{Header, Message, RCode, Resource};

/// The cache-flush bit, marking a record as a member of a unique RRSet.
///
/// In the Resource Record Sections of a Multicast DNS response, the top
/// bit of the rrclass field indicates that the record set is under the
/// exclusive ownership of the responder (RFC 6762 sections 10.2 and
/// 18.13). Legacy unicast responses never carry it.
pub const CACHE_FLUSH_BIT: u16 = 1 << 15;

/// Returns a new (empty) response to an mDNS query.
///
/// See RFC 6762 sections 6 and 18.
pub fn new_response(query: &Message, unicast: bool) -> Message {
    Message {
        header: Header {
            // In multicast responses the ID MUST be zero on transmission.
            // In legacy unicast responses it MUST match the query
            // (RFC 6762 section 18.1).
            id: if unicast { query.header.id } else { 0 },

            response: true,

            // OPCODE must be zero on transmission (RFC 6762 section 18.3).
            op_code: 0,

            // The Authoritative Answer bit MUST be one in responses; not
            // setting it would imply some better source of the records
            // exists (RFC 6762 section 18.4).
            authoritative: true,

            // Sections 18.5 through 18.11: TC, RD, RA, Z, AD, CD and
            // RCODE must all be zero.
            truncated: false,
            recursion_desired: false,
            recursion_available: false,
            authentic_data: false,
            checking_disabled: false,
            rcode: RCode::Success,
        },

        // Multicast DNS responses MUST NOT contain any questions in the
        // Question Section (RFC 6762 section 6).
        questions: Vec::new(),
        ..Default::default()
    }
}

/// Returns true if the record carries the cache-flush bit.
pub fn is_unique_record(r: &Resource) -> bool {
    r.header.class.0 & CACHE_FLUSH_BIT != 0
}

/// Sets the cache-flush bit on the record's class.
pub fn set_unique_record(r: &mut Resource) {
    r.header.class.0 |= CACHE_FLUSH_BIT;
}

/// Clears the cache-flush bit, restoring the record's actual class.
pub fn clear_unique_record(r: &mut Resource) {
    r.header.class.0 &= !CACHE_FLUSH_BIT;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{DNSCLASS_INET, Name, PtrResource, ResourceHeader};
    use crate::query::new_query;

    #[test]
    fn test_new_response_flags() {
        let mut query = new_query(false, vec![]);
        query.header.id = 0x4242;
        query.questions = vec![Default::default()];

        let multicast = new_response(&query, false);
        assert!(multicast.header.response);
        assert!(multicast.header.authoritative);
        assert_eq!(multicast.header.id, 0);
        assert!(multicast.questions.is_empty());
        assert!(multicast.is_empty());

        let unicast = new_response(&query, true);
        assert_eq!(unicast.header.id, 0x4242);
        assert!(unicast.questions.is_empty());
    }

    #[test]
    fn test_unique_record_bit() {
        let mut r = Resource {
            header: ResourceHeader {
                name: Name::new("svc.local.").unwrap(),
                class: DNSCLASS_INET,
                ttl: 120,
                ..Default::default()
            },
            body: Some(Box::new(PtrResource::new(
                Name::new("target.local.").unwrap(),
            ))),
        };

        assert!(!is_unique_record(&r));
        set_unique_record(&mut r);
        assert!(is_unique_record(&r));
        assert_eq!(r.header.class.0, 0x8001);
        clear_unique_record(&mut r);
        assert!(!is_unique_record(&r));
        assert_eq!(r.header.class, DNSCLASS_INET);
    }
}
