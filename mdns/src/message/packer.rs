use shared::error::{Error, Result};

// Low-level helpers for packing and unpacking big-endian wire data.
//
// The pack_* functions append to the message buffer and return it, so that
// callers can chain them without intermediate allocations.

pub(crate) fn pack_uint16(mut msg: Vec<u8>, field: u16) -> Vec<u8> {
    msg.extend_from_slice(&field.to_be_bytes());
    msg
}

pub(crate) fn unpack_uint16(msg: &[u8], off: usize) -> Result<(u16, usize)> {
    if off + 2 > msg.len() {
        return Err(Error::ErrBaseLen);
    }
    Ok((u16::from_be_bytes([msg[off], msg[off + 1]]), off + 2))
}

pub(crate) fn skip_uint16(msg: &[u8], off: usize) -> Result<usize> {
    if off + 2 > msg.len() {
        return Err(Error::ErrBaseLen);
    }
    Ok(off + 2)
}

pub(crate) fn pack_uint32(mut msg: Vec<u8>, field: u32) -> Vec<u8> {
    msg.extend_from_slice(&field.to_be_bytes());
    msg
}

pub(crate) fn unpack_uint32(msg: &[u8], off: usize) -> Result<(u32, usize)> {
    if off + 4 > msg.len() {
        return Err(Error::ErrBaseLen);
    }
    Ok((
        u32::from_be_bytes([msg[off], msg[off + 1], msg[off + 2], msg[off + 3]]),
        off + 4,
    ))
}

pub(crate) fn skip_uint32(msg: &[u8], off: usize) -> Result<usize> {
    if off + 4 > msg.len() {
        return Err(Error::ErrBaseLen);
    }
    Ok(off + 4)
}

pub(crate) fn pack_bytes(mut msg: Vec<u8>, field: &[u8]) -> Vec<u8> {
    msg.extend_from_slice(field);
    msg
}

// pack_str appends a length-prefixed character string (RFC 1035 section 3.3).
pub(crate) fn pack_str(mut msg: Vec<u8>, field: &[u8]) -> Result<Vec<u8>> {
    if field.len() > 255 {
        return Err(Error::ErrStringTooLong);
    }
    msg.push(field.len() as u8);
    msg.extend_from_slice(field);
    Ok(msg)
}

pub(crate) fn unpack_str(msg: &[u8], off: usize) -> Result<(Vec<u8>, usize)> {
    if off >= msg.len() {
        return Err(Error::ErrBaseLen);
    }
    let begin = off + 1;
    let end = begin + msg[off] as usize;
    if end > msg.len() {
        return Err(Error::ErrCalcLen);
    }
    Ok((msg[begin..end].to_vec(), end))
}
