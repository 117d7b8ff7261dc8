//! Construction and validation of mDNS queries.
//!
//! The flag policy follows RFC 6762 section 18: everything is cleared
//! except the ID, which is random for self-originated multicast queries
//! and zero is also acceptable; legacy ("one-shot") queries keep whatever
//! ID discipline the caller wants by copying it in afterwards.

use crate::message::{Header, Message, Question, RCode};
use shared::error::{Error, Result};

/// The unicast-response bit.
///
/// In the Question Section of a Multicast DNS query, the top bit of the
/// qclass field is used to indicate that unicast responses are preferred
/// for this particular question (RFC 6762 section 18.12).
pub const UNICAST_RESPONSE_BIT: u16 = 1 << 15;

/// Returns a new DNS query carrying the given questions.
///
/// If `legacy` is true the query is on behalf of a "one-shot" querier and
/// the ID is left at zero for the caller to fill in; otherwise a random ID
/// is chosen (RFC 6762 section 18.1).
pub fn new_query(legacy: bool, questions: Vec<Question>) -> Message {
    Message {
        header: Header {
            // In multicast query messages the Query Identifier SHOULD be
            // set to zero on transmission; a random ID is still permitted
            // and helps correlate one-shot responses.
            id: if legacy { 0 } else { rand::random::<u16>() },

            // OPCODE must be zero: only standard queries are supported
            // over multicast (RFC 6762 section 18.3).
            op_code: 0,

            // Sections 18.2 and 18.4 through 18.11: QR, AA, TC, RD, RA,
            // Z, AD, CD and RCODE must all be zero in queries.
            response: false,
            authoritative: false,
            truncated: false,
            recursion_desired: false,
            recursion_available: false,
            authentic_data: false,
            checking_disabled: false,
            rcode: RCode::Success,
        },
        questions,
        ..Default::default()
    }
}

/// Returns an error if `m` is not a valid mDNS query.
///
/// Messages with a non-zero OPCODE or RCODE must be silently ignored
/// (RFC 6762 sections 18.3 and 18.11); the caller is expected to log at
/// debug level and drop the packet.
pub fn validate_query(m: &Message) -> Result<()> {
    if m.header.response {
        return Err(Error::ErrMessageIsResponse);
    }

    if m.header.op_code != 0 {
        return Err(Error::ErrNonZeroOpcode);
    }

    if m.header.rcode != RCode::Success {
        return Err(Error::ErrNonZeroRcode);
    }

    Ok(())
}

/// Returns true if the given question requested a unicast response, along
/// with a copy of the question with the unicast-response bit cleared, to
/// reflect the actual question class.
pub fn wants_unicast_response(q: &Question) -> (bool, Question) {
    let unicast = q.class.0 & UNICAST_RESPONSE_BIT != 0;
    let mut q = q.clone();
    q.class.0 &= !UNICAST_RESPONSE_BIT;
    (unicast, q)
}

/// Adds the unicast-response bit to the given question.
pub fn set_unicast_response(mut q: Question) -> Question {
    q.class.0 |= UNICAST_RESPONSE_BIT;
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{DNSCLASS_INET, DnsType, Name};

    fn question() -> Question {
        Question {
            name: Name::new("svc.local.").unwrap(),
            typ: DnsType::A,
            class: DNSCLASS_INET,
        }
    }

    #[test]
    fn test_new_query_flags() {
        let m = new_query(false, vec![question()]);
        assert!(!m.header.response);
        assert_eq!(m.header.op_code, 0);
        assert!(!m.header.authoritative);
        assert!(!m.header.truncated);
        assert!(!m.header.recursion_desired);
        assert!(!m.header.recursion_available);
        assert_eq!(m.header.rcode, RCode::Success);
        assert_eq!(m.questions.len(), 1);
    }

    #[test]
    fn test_new_legacy_query_has_zero_id() {
        let m = new_query(true, vec![question()]);
        assert_eq!(m.header.id, 0);
    }

    #[test]
    fn test_validate_query() {
        let mut m = new_query(false, vec![question()]);
        assert!(validate_query(&m).is_ok());

        m.header.op_code = 4;
        assert_eq!(validate_query(&m).unwrap_err(), Error::ErrNonZeroOpcode);

        m.header.op_code = 0;
        m.header.rcode = RCode::Refused;
        assert_eq!(validate_query(&m).unwrap_err(), Error::ErrNonZeroRcode);
    }

    #[test]
    fn test_unicast_response_bit_round_trip() {
        let q = set_unicast_response(question());
        assert_eq!(q.class.0, 0x8001);

        let (unicast, cleaned) = wants_unicast_response(&q);
        assert!(unicast);
        assert_eq!(cleaned.class, DNSCLASS_INET);

        let (unicast, cleaned) = wants_unicast_response(&cleaned);
        assert!(!unicast);
        assert_eq!(cleaned.class, DNSCLASS_INET);
    }
}
