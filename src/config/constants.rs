//! # Row Format Constants
//!
//! All numeric constants that shape the packed row layout live here so the
//! builder, the view and the selector cannot drift apart.
//!
//! ## Dependency Graph
//!
//! ```text
//! HEADER_SIZE (6 bytes)
//!   │
//!   ├─> ROW_FORMAT_VERSION (u8) + schema version (u8) + row size (u32 LE)
//!   │
//!   └─> MAX_ROW_SIZE = u32::MAX
//!         Row size is stored as u32, so no row may exceed it.
//!
//! VAR_OFFSET_SIZE (4 bytes)
//!   │
//!   └─> one absolute u32 start offset per variable-length column
//! ```
//!
//! ## Critical Invariants
//!
//! 1. `HEADER_SIZE == size_of::<RowHeader>()` (checked where the header is defined)
//! 2. `VAR_OFFSET_SIZE == size_of::<u32>()` so offsets can address `MAX_ROW_SIZE`

// ============================================================================
// ROW HEADER
// ============================================================================

/// Version byte written at offset 0 of every packed row.
pub const ROW_FORMAT_VERSION: u8 = 1;

/// Schema version used when a schema does not specify one.
pub const DEFAULT_SCHEMA_VERSION: u8 = 1;

/// Bytes occupied by the row header (format version, schema version, size).
pub const HEADER_SIZE: usize = 6;

/// Largest row the header can describe.
pub const MAX_ROW_SIZE: usize = u32::MAX as usize;

// ============================================================================
// VARIABLE-LENGTH REGION
// ============================================================================

/// Bytes per entry in the variable-length offset table.
pub const VAR_OFFSET_SIZE: usize = 4;

const _: () = assert!(VAR_OFFSET_SIZE == std::mem::size_of::<u32>());
const _: () = assert!(HEADER_SIZE == 2 + std::mem::size_of::<u32>());

// ============================================================================
// INDEX KEYS
// ============================================================================

/// Separator placed between column values in a composite index key.
pub const KEY_SEPARATOR: char = '|';

// ============================================================================
// DATE PACKING
// ============================================================================

/// Base year subtracted before packing a date.
pub const DATE_BASE_YEAR: u32 = 1900;
