// Growable byte buffer backing the ID3 tag

use crate::error::{ConvertError, Result};

/// Capacity reserved when a tag buffer is created
pub const INITIAL_CAPACITY: usize = 4096;

/// Fixed step by which the buffer grows once full
pub const GROW_INCREMENT: usize = 512;

/// Owned byte region with a tracked capacity.
///
/// Capacity grows in `GROW_INCREMENT` steps, never proportionally, and
/// `len() <= capacity()` always holds.
#[derive(Debug)]
pub struct TagBuffer {
    bytes: Vec<u8>,
    capacity: usize,
}

impl TagBuffer {
    /// Create an empty buffer with `INITIAL_CAPACITY` bytes reserved
    pub fn new() -> Result<Self> {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(capacity)
            .map_err(|_| ConvertError::Allocation("tag buffer"))?;
        Ok(TagBuffer { bytes, capacity })
    }

    /// Make room for `additional` more bytes, growing one increment at a time
    pub fn ensure_capacity(&mut self, additional: usize) -> Result<()> {
        while self.bytes.len() + additional > self.capacity {
            let target = self.capacity + GROW_INCREMENT;
            self.bytes
                .try_reserve_exact(target - self.bytes.len())
                .map_err(|_| ConvertError::Allocation("tag buffer"))?;
            self.capacity = target;
        }
        Ok(())
    }

    /// Append raw bytes, growing first if needed
    pub fn append(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_capacity(data.len())?;
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    /// Overwrite already-written bytes at `offset`
    pub fn patch(&mut self, offset: usize, data: &[u8]) {
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
    }

    /// Drop all content, keeping the allocation
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
