use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use super::ResourceBody;
use crate::message::DnsType;
use crate::message::name::Name;
use crate::message::packer::*;
use shared::error::Result;

/// An SRV resource record body (RFC 2782).
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SrvResource {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: Name,
}

impl fmt::Display for SrvResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SRVResource{{priority: {}, weight: {}, port: {}, target: {}}}",
            self.priority, self.weight, self.port, self.target,
        )
    }
}

impl SrvResource {
    pub(crate) fn unpack(msg: &[u8], off: usize, _length: usize) -> Result<Self> {
        let (priority, off) = unpack_uint16(msg, off)?;
        let (weight, off) = unpack_uint16(msg, off)?;
        let (port, off) = unpack_uint16(msg, off)?;
        let mut target = Name::default();
        target.unpack(msg, off)?;
        Ok(SrvResource {
            priority,
            weight,
            port,
            target,
        })
    }
}

impl ResourceBody for SrvResource {
    fn real_type(&self) -> DnsType {
        DnsType::Srv
    }

    fn pack(
        &self,
        mut msg: Vec<u8>,
        _compression: &mut Option<HashMap<String, usize>>,
        _compression_off: usize,
    ) -> Result<Vec<u8>> {
        msg = pack_uint16(msg, self.priority);
        msg = pack_uint16(msg, self.weight);
        msg = pack_uint16(msg, self.port);
        // The SRV target must not be compressed (RFC 2782).
        self.target.pack(msg, &mut None, 0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
