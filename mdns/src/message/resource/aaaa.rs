use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::net::Ipv6Addr;

use super::ResourceBody;
use crate::message::DnsType;
use crate::message::packer::*;
use shared::error::{Error, Result};

/// An AAAA resource record body: a single IPv6 address.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct AaaaResource {
    pub aaaa: [u8; 16],
}

impl fmt::Display for AaaaResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AAAAResource{{aaaa: {}}}", Ipv6Addr::from(self.aaaa))
    }
}

impl AaaaResource {
    pub fn new(addr: Ipv6Addr) -> Self {
        AaaaResource {
            aaaa: addr.octets(),
        }
    }

    pub fn addr(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.aaaa)
    }

    pub(crate) fn unpack(msg: &[u8], off: usize, length: usize) -> Result<Self> {
        if length != 16 || off + 16 > msg.len() {
            return Err(Error::ErrResourceLen);
        }
        let mut aaaa = [0u8; 16];
        aaaa.copy_from_slice(&msg[off..off + 16]);
        Ok(AaaaResource { aaaa })
    }
}

impl ResourceBody for AaaaResource {
    fn real_type(&self) -> DnsType {
        DnsType::Aaaa
    }

    fn pack(
        &self,
        msg: Vec<u8>,
        _compression: &mut Option<HashMap<String, usize>>,
        _compression_off: usize,
    ) -> Result<Vec<u8>> {
        Ok(pack_bytes(msg, &self.aaaa))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
