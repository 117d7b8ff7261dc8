use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::net::Ipv4Addr;

use super::ResourceBody;
use crate::message::DnsType;
use crate::message::packer::*;
use shared::error::{Error, Result};

/// An A resource record body: a single IPv4 address.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct AResource {
    pub a: [u8; 4],
}

impl fmt::Display for AResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AResource{{a: {}}}", Ipv4Addr::from(self.a))
    }
}

impl AResource {
    pub fn new(addr: Ipv4Addr) -> Self {
        AResource { a: addr.octets() }
    }

    pub fn addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.a)
    }

    pub(crate) fn unpack(msg: &[u8], off: usize, length: usize) -> Result<Self> {
        if length != 4 || off + 4 > msg.len() {
            return Err(Error::ErrResourceLen);
        }
        let mut a = [0u8; 4];
        a.copy_from_slice(&msg[off..off + 4]);
        Ok(AResource { a })
    }
}

impl ResourceBody for AResource {
    fn real_type(&self) -> DnsType {
        DnsType::A
    }

    fn pack(
        &self,
        msg: Vec<u8>,
        _compression: &mut Option<HashMap<String, usize>>,
        _compression_off: usize,
    ) -> Result<Vec<u8>> {
        Ok(pack_bytes(msg, &self.a))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
