use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use super::ResourceBody;
use crate::message::DnsType;
use crate::message::packer::*;
use shared::error::Result;

/// A TXT resource record body: a sequence of character strings.
///
/// An empty sequence packs as a single zero-length string, as required for
/// DNS-SD TXT records (RFC 6763 section 6.1).
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct TxtResource {
    pub txt: Vec<String>,
}

impl fmt::Display for TxtResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TXTResource{{txt: {}}}", self.txt.join(", "))
    }
}

impl TxtResource {
    pub fn new(txt: Vec<String>) -> Self {
        TxtResource { txt }
    }

    pub(crate) fn unpack(msg: &[u8], off: usize, length: usize) -> Result<Self> {
        let mut txt = Vec::new();
        let mut n = 0;
        let mut off = off;
        while n < length {
            let (s, new_off) = unpack_str(msg, off)?;
            n += new_off - off;
            off = new_off;
            txt.push(String::from_utf8_lossy(&s).into_owned());
        }
        Ok(TxtResource { txt })
    }
}

impl ResourceBody for TxtResource {
    fn real_type(&self) -> DnsType {
        DnsType::Txt
    }

    fn pack(
        &self,
        mut msg: Vec<u8>,
        _compression: &mut Option<HashMap<String, usize>>,
        _compression_off: usize,
    ) -> Result<Vec<u8>> {
        if self.txt.is_empty() {
            msg.push(0);
            return Ok(msg);
        }
        for s in &self.txt {
            msg = pack_str(msg, s.as_bytes())?;
        }
        Ok(msg)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
