use std::ops::Deref;
use std::sync::{Arc, Mutex};

/// Size of a pooled receive buffer. Matches the largest possible DNS
/// message over UDP, which is more than mDNS strictly requires but keeps
/// buffer management trivial.
pub const BUFFER_SIZE: usize = 65536;

/// A free-list of fixed-size receive buffers.
///
/// The pool is a dependency of each transport rather than a global; clones
/// share the same free-list.
#[derive(Default, Clone)]
pub struct BufferPool {
    free: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leases a buffer from the pool, allocating if the free-list is
    /// empty. The buffer is returned to the pool when dropped.
    pub fn get(&self) -> PooledBuffer {
        let buf = {
            let mut free = self.free.lock().unwrap_or_else(|e| e.into_inner());
            free.pop()
        };

        PooledBuffer {
            pool: self.clone(),
            buf: buf.unwrap_or_else(|| vec![0u8; BUFFER_SIZE]),
            len: 0,
        }
    }

    fn put(&self, buf: Vec<u8>) {
        // Guard against buffers whose capacity drifted from the pool size.
        if buf.len() == BUFFER_SIZE {
            let mut free = self.free.lock().unwrap_or_else(|e| e.into_inner());
            free.push(buf);
        }
    }

    #[cfg(test)]
    fn free_count(&self) -> usize {
        self.free.lock().unwrap().len()
    }
}

/// A leased buffer. Dereferences to the received datagram bytes and
/// returns itself to the pool on drop.
pub struct PooledBuffer {
    pool: BufferPool,
    buf: Vec<u8>,
    len: usize,
}

impl PooledBuffer {
    /// The full buffer, for reading a datagram into.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// Records the length of the datagram placed in the buffer.
    pub fn set_len(&mut self, len: usize) {
        self.len = len.min(self.buf.len());
    }
}

impl Deref for PooledBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        self.pool.put(std::mem::take(&mut self.buf));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_is_returned_on_drop() {
        let pool = BufferPool::new();
        assert_eq!(pool.free_count(), 0);

        {
            let mut buf = pool.get();
            assert_eq!(buf.as_mut_slice().len(), BUFFER_SIZE);
        }
        assert_eq!(pool.free_count(), 1);

        // Leasing again reuses the returned buffer.
        let _buf = pool.get();
        assert_eq!(pool.free_count(), 0);
    }

    #[test]
    fn test_len_tracks_datagram() {
        let pool = BufferPool::new();
        let mut buf = pool.get();
        buf.as_mut_slice()[..4].copy_from_slice(&[1, 2, 3, 4]);
        buf.set_len(4);
        assert_eq!(&*buf, &[1, 2, 3, 4]);
    }

    #[test]
    fn test_drifted_buffer_is_discarded() {
        let pool = BufferPool::new();
        let mut buf = pool.get();
        buf.buf.truncate(16);
        drop(buf);
        assert_eq!(pool.free_count(), 0);
    }
}
