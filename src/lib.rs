//! # rowpack - Packed Row Encoding
//!
//! rowpack is the binary row layer of a tabular query engine. It encodes typed
//! column values into a compact packed row driven by a table schema, and it
//! projects and recombines those rows without re-encoding them:
//!
//! - **Ordered encoding**: values are appended in column order into a buffer
//!   sized once; skipped columns are backfilled from a default map
//! - **Index keys**: composite index keys and row timestamps are collected
//!   while appending and handed to storage with the row
//! - **Zero-copy projection**: any column subset can be cut out of a row into
//!   a new row, byte-identical to encoding that subset directly
//! - **Shared buffers**: rows live in reference-counted `Slice`s that many
//!   readers and composite rows may hold at once
//!
//! ## Quick Start
//!
//! ```ignore
//! use rowpack::records::{DefaultValueMap, RowBuilder, Schema};
//! use rowpack::types::{ColumnDef, DataType};
//!
//! let schema = Schema::new(vec![
//!     ColumnDef::new("id", DataType::String).indexed(),
//!     ColumnDef::new("ts", DataType::Timestamp).timestamp(),
//! ])?;
//! let defaults = DefaultValueMap::new();
//!
//! let mut builder = RowBuilder::new(&schema, &defaults);
//! builder.init("user42".len())?;
//! builder.append_string("user42")?;
//! builder.append_timestamp(1000)?;
//! let row = builder.build()?;
//! // row.slice, row.dimensions == [("user42", 0)], row.timestamps == [1000]
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │   Storage / Query Execution (callers)   │
//! ├───────────────────┬─────────────────────┤
//! │ InsertRows        │ BatchRequestSplitter│
//! ├───────────────────┼─────────────────────┤
//! │ RowBuilder        │ ColumnSelector      │
//! │ (+ dimensions)    │ CompositeRow        │
//! ├───────────────────┴─────────────────────┤
//! │     RowView / RowHeader / Slice         │
//! ├─────────────────────────────────────────┤
//! │  Schema / DefaultValueMap / DataType    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`records`]: schema, builder, view, selector, composite rows, batches
//! - [`types`]: `DataType`, `Value`, `ColumnDef`, packed dates
//! - [`config`]: layout constants and builder options
//! - [`error`]: `CodecError`

#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod records;
pub mod types;

pub use config::{BuilderOptions, TypeCheck};
pub use error::{CodecError, Result};
pub use records::{
    BatchRequestSplitter, BuiltRow, ColumnSelector, CompositeRow, DefaultValueMap, Dimension,
    InsertRows, RowAccess, RowBuilder, RowView, Schema, SegmentLayout, Slice,
};
pub use types::{ColumnDef, DataType, Value};
