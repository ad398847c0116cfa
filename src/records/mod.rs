//! # Packed Rows with O(1) Column Access
//!
//! This module turns typed column values into a compact packed row driven by
//! a `Schema`, and back. Rows can be projected into smaller self-contained
//! rows and recombined into one logical row backed by several buffers.
//!
//! ## Row Binary Layout
//!
//! ```text
//! +---------+---------+----------+-------------+---------+-------------+----------+
//! | Version | Schema  | Row Size | Null Bitmap | Fixed   | Var Offsets | Var Data |
//! | (u8)    | Ver (u8)| (u32)    | [u8; N/8]   | Region  | [u32; M]    | [u8; ..] |
//! +---------+---------+----------+-------------+---------+-------------+----------+
//! ```
//!
//! | Component | Type | Description |
//! |-----------|------|-------------|
//! | **Version** | `u8` | Row format version |
//! | **Schema Version** | `u8` | Version of the schema the row was written with |
//! | **Row Size** | `u32` | Total bytes of the row, header included |
//! | **Null Bitmap** | `[u8; (N+7)/8]` | 1 bit per column. `1` = NULL |
//! | **Fixed Region** | `[u8; ..]` | Fixed-width columns at schema-computed offsets |
//! | **Var Offsets** | `[u32; M]` | Absolute start of each variable-length column |
//! | **Var Data** | `[u8; ..]` | Variable-length payloads in column order |
//!
//! A variable-length column ends where the next one starts; the last one ends
//! at the row size. NULL fixed columns hold zeros and NULL variable columns
//! are empty.
//!
//! ## Storage Classes
//!
//! | Class | Types | Storage |
//! |-------|-------|---------|
//! | **Fixed** | bool, int16, int32, int64, float, double, date, timestamp | Direct bytes |
//! | **Variable** | string, varchar | Offset in table -> payload |
//!
//! ## Module Structure
//!
//! - `schema`: `Schema` with precomputed offsets and resolved index definitions
//! - `defaults`: `DefaultValueMap` shared by every builder of a table
//! - `slice`: `Slice`, reference-counted immutable bytes
//! - `header`: the zerocopy `RowHeader`
//! - `builder`: `RowBuilder`, ordered encoding with default backfill
//! - `view`: `RowView`, zero-copy decoding
//! - `selector`: `ColumnSelector`, projection into a sub-schema row
//! - `composite`: `CompositeRow` and `SegmentLayout`, rows over several slices
//! - `batch`: `InsertRows` and `BatchRequestSplitter`

pub mod batch;
pub mod builder;
pub mod composite;
pub mod defaults;
pub mod header;
pub mod schema;
pub mod selector;
pub mod slice;
pub mod view;


pub use batch::{BatchRequestSplitter, InsertRows};
pub use builder::{BuiltRow, Dimension, RowBuilder};
pub use composite::{CompositeRow, Segment, SegmentLayout};
pub use defaults::DefaultValueMap;
pub use header::RowHeader;
pub use schema::{ColumnKey, IndexDefinition, Schema};
pub use selector::ColumnSelector;
pub use slice::Slice;
pub use view::RowView;

use crate::error::Result;
use crate::types::Value;

/// Positional read access to a row, however many buffers back it.
pub trait RowAccess {
    fn column_count(&self) -> usize;

    fn is_null(&self, col_idx: usize) -> Result<bool>;

    fn get(&self, col_idx: usize) -> Result<Value<'_>>;
}
