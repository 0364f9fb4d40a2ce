//! Thread-local pool of read buffers.

use std::cell::RefCell;

/// Largest buffer kept in the pool; bigger ones are freed on drop.
pub const MAX_POOLED_CAPACITY: usize = 1024 * 1024;

/// Maximum number of buffers to keep per thread.
pub const MAX_POOL_SIZE: usize = 4;

/// A zero-filled scratch buffer of a fixed length.
pub struct ReadBuffer {
    data: Vec<u8>,
}

impl ReadBuffer {
    /// Takes a buffer of `len` bytes from the pool or allocates one.
    pub fn take(len: usize) -> Self {
        let mut data = THREAD_BUFFER_POOL
            .with(|pool| {
                let mut pool = pool.borrow_mut();
                let pos = pool.iter().position(|buf| buf.capacity() >= len)?;
                Some(pool.swap_remove(pos))
            })
            .unwrap_or_else(|| Vec::with_capacity(len));
        data.resize(len, 0);
        Self { data }
    }

    /// Length of the scratch area.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Mutable access to the scratch area, for filling from a reader.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The first `n` bytes of the scratch area.
    pub fn filled(&self, n: usize) -> &[u8] {
        &self.data[..n]
    }
}

impl Drop for ReadBuffer {
    fn drop(&mut self) {
        if self.data.capacity() > MAX_POOLED_CAPACITY {
            return;
        }
        self.data.clear();
        // try_with: the pool may already be torn down during thread exit
        let _ = THREAD_BUFFER_POOL.try_with(|pool| {
            let mut pool = pool.borrow_mut();
            if pool.len() < MAX_POOL_SIZE {
                pool.push(std::mem::take(&mut self.data));
            }
        });
    }
}

thread_local! {
    static THREAD_BUFFER_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_has_requested_len() {
        let buf = ReadBuffer::take(8192);
        assert_eq!(buf.len(), 8192);
        assert!(buf.filled(8192).iter().all(|&b| b == 0));
    }

    #[test]
    fn test_reuse_is_zeroed() {
        {
            let mut buf = ReadBuffer::take(16);
            buf.as_mut_slice().copy_from_slice(&[0xAA; 16]);
        }

        // The pooled buffer comes back cleared and re-zeroed
        let buf = ReadBuffer::take(16);
        assert_eq!(buf.filled(16), &[0u8; 16]);
    }

    #[test]
    fn test_oversized_not_pooled() {
        drop(ReadBuffer::take(MAX_POOLED_CAPACITY + 1));
        let pooled = THREAD_BUFFER_POOL.with(|pool| {
            pool.borrow()
                .iter()
                .any(|buf| buf.capacity() > MAX_POOLED_CAPACITY)
        });
        assert!(!pooled);
    }
}
