//! # Column Descriptors
//!
//! A `ColumnDef` pairs a column name with its `DataType` and two flags:
//!
//! - `is_timestamp`: values appended to this column are reported to the
//!   storage layer as row timestamps
//! - `is_indexed`: legacy single-column index marker, only consulted when the
//!   schema has no composite index definitions
//!
//! ## Usage
//!
//! ```ignore
//! use rowpack::types::{ColumnDef, DataType};
//!
//! let id = ColumnDef::new("id", DataType::String).indexed();
//! let ts = ColumnDef::new("ts", DataType::Timestamp).timestamp();
//! ```

use super::DataType;

/// Column definition with type and flags. Immutable once in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    name: String,
    data_type: DataType,
    is_timestamp: bool,
    is_indexed: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_timestamp: false,
            is_indexed: false,
        }
    }

    /// Marks the column as a timestamp column.
    pub fn timestamp(mut self) -> Self {
        self.is_timestamp = true;
        self
    }

    /// Marks the column as a legacy single-column index.
    pub fn indexed(mut self) -> Self {
        self.is_indexed = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn is_timestamp(&self) -> bool {
        self.is_timestamp
    }

    pub fn is_indexed(&self) -> bool {
        self.is_indexed
    }

    pub fn fixed_size(&self) -> Option<usize> {
        self.data_type.fixed_size()
    }
}
