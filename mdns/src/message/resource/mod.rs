pub(crate) mod a;
pub(crate) mod aaaa;
pub(crate) mod ptr;
pub(crate) mod srv;
pub(crate) mod txt;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

pub use a::AResource;
pub use aaaa::AaaaResource;
pub use ptr::PtrResource;
pub use srv::SrvResource;
pub use txt::TxtResource;

use super::name::Name;
use super::packer::*;
use super::{DnsClass, DnsType};
use shared::error::{Error, Result};

/// A DNS resource record.
#[derive(Default, Debug)]
pub struct Resource {
    pub header: ResourceHeader,
    pub body: Option<Box<dyn ResourceBody>>,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Resource{{header: {}, body: {}}}",
            self.header,
            if let Some(body) = &self.body {
                body.to_string()
            } else {
                "None".to_owned()
            }
        )
    }
}

impl Resource {
    // pack appends the wire format of the resource to msg.
    pub(crate) fn pack(
        &mut self,
        msg: Vec<u8>,
        compression: &mut Option<HashMap<String, usize>>,
        compression_off: usize,
    ) -> Result<Vec<u8>> {
        self.header.typ = self
            .body
            .as_ref()
            .ok_or(Error::ErrNilResourceBody)?
            .real_type();
        let (mut msg, len_off) = self.header.pack(msg, compression, compression_off)?;
        let pre_len = msg.len();
        if let Some(body) = &self.body {
            msg = body.pack(msg, compression, compression_off)?;
            self.header.fix_len(&mut msg, len_off, pre_len)?;
        }
        Ok(msg)
    }

    // unpack parses a resource starting at off. Record types outside the
    // supported set keep their header but have their body skipped.
    pub(crate) fn unpack(msg: &[u8], off: usize) -> Result<(Self, usize)> {
        let mut header = ResourceHeader::default();
        let off = header.unpack(msg, off)?;
        let (body, off) = unpack_resource_body(header.typ, msg, off, header.length as usize)?;
        Ok((Resource { header, body }, off))
    }

    pub(crate) fn skip(msg: &[u8], off: usize) -> Result<usize> {
        let mut new_off = Name::skip(msg, off)?;
        new_off = DnsType::skip(msg, new_off)?;
        new_off = DnsClass::skip(msg, new_off)?;
        new_off = skip_uint32(msg, new_off)?;
        let (length, mut new_off) = unpack_uint16(msg, new_off)?;
        new_off += length as usize;
        if new_off > msg.len() {
            return Err(Error::ErrResourceLen);
        }
        Ok(new_off)
    }
}

/// The common fields at the start of every resource record.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct ResourceHeader {
    /// The domain name this record pertains to.
    pub name: Name,

    /// The record type. Filled in automatically while packing.
    pub typ: DnsType,

    /// The record class. In mDNS responses the top bit of this field is
    /// the cache-flush bit (RFC 6762 section 18.13).
    pub class: DnsClass,

    /// Time to live, in seconds.
    pub ttl: u32,

    /// Length of the record data. Filled in automatically while packing.
    pub length: u16,
}

impl fmt::Display for ResourceHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ResourceHeader{{name: {}, type: {}, class: {}, ttl: {}, length: {}}}",
            self.name, self.typ, self.class, self.ttl, self.length,
        )
    }
}

impl ResourceHeader {
    // pack appends the wire format of the header to msg, returning the
    // offset of the (not yet known) Length field for fix_len.
    pub(crate) fn pack(
        &self,
        mut msg: Vec<u8>,
        compression: &mut Option<HashMap<String, usize>>,
        compression_off: usize,
    ) -> Result<(Vec<u8>, usize)> {
        msg = self.name.pack(msg, compression, compression_off)?;
        msg = self.typ.pack(msg);
        msg = self.class.pack(msg);
        msg = pack_uint32(msg, self.ttl);
        let len_off = msg.len();
        msg = pack_uint16(msg, self.length);
        Ok((msg, len_off))
    }

    pub(crate) fn unpack(&mut self, msg: &[u8], off: usize) -> Result<usize> {
        let mut new_off = off;
        new_off = self.name.unpack(msg, new_off)?;
        new_off = self.typ.unpack(msg, new_off)?;
        new_off = self.class.unpack(msg, new_off)?;
        let (ttl, new_off) = unpack_uint32(msg, new_off)?;
        self.ttl = ttl;
        let (l, new_off) = unpack_uint16(msg, new_off)?;
        self.length = l;
        Ok(new_off)
    }

    // fix_len updates a packed header with the length of the body.
    //
    // len_off is the offset of the Length field in msg; pre_len is the
    // length msg had before the body was packed.
    pub(crate) fn fix_len(&mut self, msg: &mut [u8], len_off: usize, pre_len: usize) -> Result<()> {
        if msg.len() < pre_len || msg.len() > pre_len + u16::MAX as usize {
            return Err(Error::ErrResTooLong);
        }

        let con_len = msg.len() - pre_len;

        msg[len_off] = ((con_len >> 8) & 0xFF) as u8;
        msg[len_off + 1] = (con_len & 0xFF) as u8;
        self.length = con_len as u16;

        Ok(())
    }
}

/// A DNS resource record minus the header.
pub trait ResourceBody: fmt::Display + fmt::Debug + Send + Sync {
    // real_type returns the actual type of the resource, used to fill in
    // the header Type field while packing.
    fn real_type(&self) -> DnsType;

    // pack packs a resource except for its header.
    fn pack(
        &self,
        msg: Vec<u8>,
        compression: &mut Option<HashMap<String, usize>>,
        compression_off: usize,
    ) -> Result<Vec<u8>>;

    fn as_any(&self) -> &dyn Any;
}

pub(crate) fn unpack_resource_body(
    typ: DnsType,
    msg: &[u8],
    off: usize,
    length: usize,
) -> Result<(Option<Box<dyn ResourceBody>>, usize)> {
    if off + length > msg.len() {
        return Err(Error::ErrResourceLen);
    }

    let rb: Box<dyn ResourceBody> = match typ {
        DnsType::A => Box::new(AResource::unpack(msg, off, length)?),
        DnsType::Aaaa => Box::new(AaaaResource::unpack(msg, off, length)?),
        DnsType::Ptr => Box::new(PtrResource::unpack(msg, off, length)?),
        DnsType::Srv => Box::new(SrvResource::unpack(msg, off, length)?),
        DnsType::Txt => Box::new(TxtResource::unpack(msg, off, length)?),
        // Other record types are not interpreted by this responder; keep
        // the header and step over the record data.
        _ => return Ok((None, off + length)),
    };

    Ok((Some(rb), off + length))
}
