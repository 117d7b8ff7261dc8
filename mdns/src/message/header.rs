use std::fmt;

use super::RCode;
use super::packer::*;
use shared::error::Result;

const HEADER_BIT_QR: u16 = 1 << 15; // query/response (response=1)
const HEADER_BIT_AA: u16 = 1 << 10; // authoritative
const HEADER_BIT_TC: u16 = 1 << 9; // truncated
const HEADER_BIT_RD: u16 = 1 << 8; // recursion desired
const HEADER_BIT_RA: u16 = 1 << 7; // recursion available
const HEADER_BIT_AD: u16 = 1 << 5; // authentic data
const HEADER_BIT_CD: u16 = 1 << 4; // checking disabled

/// A DNS message header (RFC 1035 section 4.1.1).
///
/// The section counts are not stored here; they are derived from the
/// message's section vectors when packing and live in [`HeaderInternal`]
/// while unpacking.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub id: u16,
    pub response: bool,
    pub op_code: u16,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub authentic_data: bool,
    pub checking_disabled: bool,
    pub rcode: RCode,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Header{{id: {}, response: {}, op_code: {}, authoritative: {}, truncated: {}, rcode: {}}}",
            self.id, self.response, self.op_code, self.authoritative, self.truncated, self.rcode,
        )
    }
}

impl Header {
    // pack returns the header's id and flag bits in wire form.
    pub(crate) fn pack(&self) -> (u16, u16) {
        let mut bits = (self.op_code << 11) | self.rcode as u16;
        if self.recursion_available {
            bits |= HEADER_BIT_RA;
        }
        if self.recursion_desired {
            bits |= HEADER_BIT_RD;
        }
        if self.truncated {
            bits |= HEADER_BIT_TC;
        }
        if self.authoritative {
            bits |= HEADER_BIT_AA;
        }
        if self.response {
            bits |= HEADER_BIT_QR;
        }
        if self.authentic_data {
            bits |= HEADER_BIT_AD;
        }
        if self.checking_disabled {
            bits |= HEADER_BIT_CD;
        }
        (self.id, bits)
    }
}

// HeaderInternal is the wire form of the header, including section counts.
#[derive(Default, Debug, Clone)]
pub(crate) struct HeaderInternal {
    pub(crate) id: u16,
    pub(crate) bits: u16,
    pub(crate) questions: u16,
    pub(crate) answers: u16,
    pub(crate) authorities: u16,
    pub(crate) additionals: u16,
}

impl HeaderInternal {
    pub(crate) fn header(&self) -> Header {
        Header {
            id: self.id,
            response: self.bits & HEADER_BIT_QR != 0,
            op_code: (self.bits >> 11) & 0xF,
            authoritative: self.bits & HEADER_BIT_AA != 0,
            truncated: self.bits & HEADER_BIT_TC != 0,
            recursion_desired: self.bits & HEADER_BIT_RD != 0,
            recursion_available: self.bits & HEADER_BIT_RA != 0,
            authentic_data: self.bits & HEADER_BIT_AD != 0,
            checking_disabled: self.bits & HEADER_BIT_CD != 0,
            rcode: RCode::from((self.bits & 0xF) as u8),
        }
    }

    // pack appends the wire format of the header to msg.
    pub(crate) fn pack(&self, mut msg: Vec<u8>) -> Vec<u8> {
        msg = pack_uint16(msg, self.id);
        msg = pack_uint16(msg, self.bits);
        msg = pack_uint16(msg, self.questions);
        msg = pack_uint16(msg, self.answers);
        msg = pack_uint16(msg, self.authorities);
        msg = pack_uint16(msg, self.additionals);
        msg
    }

    pub(crate) fn unpack(&mut self, msg: &[u8], off: usize) -> Result<usize> {
        let (id, off) = unpack_uint16(msg, off)?;
        self.id = id;
        let (bits, off) = unpack_uint16(msg, off)?;
        self.bits = bits;
        let (questions, off) = unpack_uint16(msg, off)?;
        self.questions = questions;
        let (answers, off) = unpack_uint16(msg, off)?;
        self.answers = answers;
        let (authorities, off) = unpack_uint16(msg, off)?;
        self.authorities = authorities;
        let (additionals, off) = unpack_uint16(msg, off)?;
        self.additionals = additionals;
        Ok(off)
    }
}
