use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use super::ResourceBody;
use crate::message::DnsType;
use crate::message::name::Name;
use shared::error::Result;

/// A PTR resource record body: the name the owner points at.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PtrResource {
    pub ptr: Name,
}

impl fmt::Display for PtrResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PTRResource{{ptr: {}}}", self.ptr)
    }
}

impl PtrResource {
    pub fn new(ptr: Name) -> Self {
        PtrResource { ptr }
    }

    pub(crate) fn unpack(msg: &[u8], off: usize, _length: usize) -> Result<Self> {
        let mut ptr = Name::default();
        ptr.unpack(msg, off)?;
        Ok(PtrResource { ptr })
    }
}

impl ResourceBody for PtrResource {
    fn real_type(&self) -> DnsType {
        DnsType::Ptr
    }

    fn pack(
        &self,
        msg: Vec<u8>,
        compression: &mut Option<HashMap<String, usize>>,
        compression_off: usize,
    ) -> Result<Vec<u8>> {
        self.ptr.pack(msg, compression, compression_off)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
