//! Reusable byte buffers for encode output.
//!
//! Workers check a buffer out, encode into it, write it to disk, and the
//! guard hands it back on drop, cleared. Checkout is exclusive: a buffer
//! lives either in the idle list or in exactly one guard.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};

use crate::config::PoolConfig;

struct Inner {
    idle: Mutex<Vec<Vec<u8>>>,
    max_idle: usize,
    max_capacity: usize,
}

/// Concurrency-safe pool of byte buffers. Cloning shares the same pool.
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<Inner>,
}

impl BufferPool {
    pub fn new(max_idle: usize, max_capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                idle: Mutex::new(Vec::new()),
                max_idle,
                max_capacity,
            }),
        }
    }

    pub fn from_config(config: &PoolConfig) -> Self {
        Self::new(config.max_idle_buffers, config.max_buffer_capacity)
    }

    /// Take an empty buffer, reusing an idle one when available.
    pub fn checkout(&self) -> PooledBuffer {
        let buf = self
            .inner
            .idle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop()
            .unwrap_or_default();
        PooledBuffer {
            buf,
            pool: self.clone(),
        }
    }

    /// Number of buffers waiting for reuse.
    pub fn idle_count(&self) -> usize {
        self.inner
            .idle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn give_back(&self, mut buf: Vec<u8>) {
        if buf.capacity() > self.inner.max_capacity {
            return;
        }
        buf.clear();
        let mut idle = self
            .inner
            .idle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if idle.len() < self.inner.max_idle {
            idle.push(buf);
        }
    }
}

/// A checked-out buffer. Returned to its pool when dropped.
pub struct PooledBuffer {
    buf: Vec<u8>,
    pool: BufferPool,
}

impl Deref for PooledBuffer {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        self.pool.give_back(buf);
    }
}
