//! # Codec Errors
//!
//! Every failure in the row codec surfaces as a [`CodecError`] value returned
//! synchronously. Nothing is retried internally: a caller that hits
//! `BufferExhausted` decides for itself whether to rebuild the row with a
//! larger variable-length budget.
//!
//! | Variant | Raised by |
//! |---------|-----------|
//! | `NotInitialized` | append/build before `RowBuilder::init` |
//! | `AlreadyInitialized` | a second `RowBuilder::init` |
//! | `BufferExhausted` | var budget too small, or row size not representable |
//! | `CursorAtEnd` | append after the row is complete |
//! | `OutOfOrder` | positional append that does not target the cursor |
//! | `TypeMismatch` | value cannot be stored in the column's layout |
//! | `RowIncomplete` | build before every column is filled |
//! | `ColumnOutOfRange` | selector/projection given an invalid position |
//! | `SchemaMismatch` | buffer or segment set inconsistent with a schema |
//! | `MalformedSchemaDefinition` | index definition names an unknown column |
//! | `InvalidDate` | year/month/day outside the packed date range |
//!
//! Higher layers that parse external input return `eyre::Result` and attach
//! context; the typed error stays reachable through `downcast_ref`.

use thiserror::Error;

use crate::types::DataType;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("row builder used before init")]
    NotInitialized,

    #[error("row builder already initialized")]
    AlreadyInitialized,

    #[error("row buffer exhausted: need {needed} bytes, {available} available")]
    BufferExhausted { needed: usize, available: usize },

    #[error("append past end of row ({column_count} columns already filled)")]
    CursorAtEnd { column_count: usize },

    #[error("append targets column {actual} but cursor is at column {expected}")]
    OutOfOrder { expected: usize, actual: usize },

    #[error("column {column} is {expected:?}, cannot store {actual:?} value")]
    TypeMismatch {
        column: usize,
        expected: DataType,
        actual: DataType,
    },

    #[error("row incomplete: {cursor} of {column_count} columns filled")]
    RowIncomplete { cursor: usize, column_count: usize },

    #[error("column {column} out of range for schema with {column_count} columns")]
    ColumnOutOfRange { column: usize, column_count: usize },

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("malformed schema definition: {0}")]
    MalformedSchemaDefinition(String),

    #[error("invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: u32, month: u32, day: u32 },
}

pub type Result<T> = std::result::Result<T, CodecError>;
