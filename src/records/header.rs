//! # Row Header
//!
//! Every packed row starts with a 6-byte header:
//!
//! ```text
//! +-----------+----------------+------------------+
//! | version   | schema version | row size         |
//! | u8        | u8             | u32 LE           |
//! +-----------+----------------+------------------+
//! ```
//!
//! The struct is `Unaligned`, so it can be read in place from any offset of a
//! row buffer without copying.

use zerocopy::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::config::{HEADER_SIZE, ROW_FORMAT_VERSION};
use crate::error::{CodecError, Result};

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct RowHeader {
    version: u8,
    schema_version: u8,
    size: U32,
}

const _: () = assert!(std::mem::size_of::<RowHeader>() == HEADER_SIZE);

impl RowHeader {
    pub fn new(schema_version: u8, size: u32) -> Self {
        Self {
            version: ROW_FORMAT_VERSION,
            schema_version,
            size: U32::new(size),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(CodecError::SchemaMismatch(format!(
                "row of {} bytes too small for header",
                bytes.len()
            )));
        }
        let header = Self::ref_from_bytes(&bytes[..HEADER_SIZE])
            .map_err(|e| CodecError::SchemaMismatch(format!("unreadable row header: {:?}", e)))?;
        if header.version != ROW_FORMAT_VERSION {
            return Err(CodecError::SchemaMismatch(format!(
                "unsupported row format version {} (expected {})",
                header.version, ROW_FORMAT_VERSION
            )));
        }
        Ok(header)
    }

    /// Mutable in-place header of an already written row.
    pub fn from_bytes_mut(bytes: &mut [u8]) -> Result<&mut Self> {
        let len = bytes.len();
        if len < HEADER_SIZE {
            return Err(CodecError::SchemaMismatch(format!(
                "row of {} bytes too small for header",
                len
            )));
        }
        let header = Self::mut_from_bytes(&mut bytes[..HEADER_SIZE])
            .map_err(|_| CodecError::SchemaMismatch("unwritable row header".to_string()))?;
        if header.version != ROW_FORMAT_VERSION {
            return Err(CodecError::SchemaMismatch(format!(
                "unsupported row format version {} (expected {})",
                header.version, ROW_FORMAT_VERSION
            )));
        }
        Ok(header)
    }

    pub fn write_to(&self, buf: &mut [u8]) {
        buf[..HEADER_SIZE].copy_from_slice(self.as_bytes());
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn schema_version(&self) -> u8 {
        self.schema_version
    }

    zerocopy_accessors! {
        size: u32,
    }
}
