//! # Slice - Shared Immutable Row Bytes
//!
//! A `Slice` is a contiguous, read-only byte range with shared ownership.
//! Cloning a `Slice` bumps an atomic reference count; the backing allocation
//! is freed exactly once, when the last clone is dropped. Because the bytes
//! never change after construction, any number of threads may read and drop
//! clones of the same `Slice` without further synchronization.
//!
//! ## Ownership
//!
//! ```text
//!   Vec<u8> ──managed()──> Arc<Vec<u8>> ─┬─> Slice [0, len)
//!                                        ├─> Slice [0, len)   (clone)
//!                                        └─> Slice [a, b)     (sub_slice)
//! ```
//!
//! `managed` moves the vector into the `Slice`; the payload is not copied.
//! There is no non-owning constructor.

use std::fmt;
use std::ops::{Deref, Range};
use std::sync::Arc;

use crate::error::{CodecError, Result};

#[derive(Clone)]
pub struct Slice {
    buf: Arc<Vec<u8>>,
    offset: usize,
    len: usize,
}

impl Slice {
    /// Takes ownership of `buf`.
    pub fn managed(buf: Vec<u8>) -> Self {
        let len = buf.len();
        Self {
            buf: Arc::new(buf),
            offset: 0,
            len,
        }
    }

    pub fn copy_from(bytes: &[u8]) -> Self {
        Self::managed(bytes.to_vec())
    }

    pub fn empty() -> Self {
        Self::managed(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[self.offset..self.offset + self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A narrower `Slice` sharing the same allocation.
    pub fn sub_slice(&self, range: Range<usize>) -> Result<Slice> {
        if range.start > range.end || range.end > self.len {
            return Err(CodecError::SchemaMismatch(format!(
                "sub-slice {:?} out of bounds for slice of {} bytes",
                range, self.len
            )));
        }
        Ok(Self {
            buf: Arc::clone(&self.buf),
            offset: self.offset + range.start,
            len: range.end - range.start,
        })
    }

    /// Number of live `Slice` handles sharing this allocation.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.buf)
    }

    /// True when both handles point at the same bytes of the same allocation.
    pub fn shares_buffer(&self, other: &Slice) -> bool {
        Arc::ptr_eq(&self.buf, &other.buf) && self.offset == other.offset && self.len == other.len
    }
}

impl Deref for Slice {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Slice {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for Slice {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Slice {}

impl From<Vec<u8>> for Slice {
    fn from(buf: Vec<u8>) -> Self {
        Self::managed(buf)
    }
}

impl fmt::Debug for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slice")
            .field("len", &self.len)
            .field("refs", &self.ref_count())
            .finish()
    }
}
