//! # RowView - Zero-Copy Row Access
//!
//! `RowView` reads a packed row in place. Fixed-width columns are located by
//! their precomputed offset, variable-length columns through the var offset
//! table, so every column is O(1) to reach. Text getters return `&str`
//! borrowed from the underlying buffer.
//!
//! ## Usage
//!
//! ```ignore
//! let view = RowView::new(slice.as_bytes(), &schema)?;
//! let id: i32 = view.get_int32(0)?;
//! let name: &str = view.get_string(1)?;   // zero-copy
//! let any = view.get_value(2)?;           // typed by the schema
//! ```
//!
//! ## Validation
//!
//! `new` checks the header and that the buffer holds at least the declared row
//! size. Every getter bounds-checks the column position and the var offsets it
//! reads, so a corrupt row yields `SchemaMismatch` rather than a panic.
//!
//! ## Thread Safety
//!
//! `RowView` borrows immutably; any number of views may read the same bytes.

use std::borrow::Cow;

use crate::config::VAR_OFFSET_SIZE;
use crate::error::{CodecError, Result};
use crate::records::header::RowHeader;
use crate::records::schema::Schema;
use crate::records::RowAccess;
use crate::types::{DataType, Value};

#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    data: &'a [u8],
    schema: &'a Schema,
}

impl<'a> RowView<'a> {
    pub fn new(data: &'a [u8], schema: &'a Schema) -> Result<Self> {
        let header = RowHeader::from_bytes(data)?;
        let size = header.size() as usize;
        if size > data.len() {
            return Err(CodecError::SchemaMismatch(format!(
                "row declares {} bytes but buffer holds {}",
                size,
                data.len()
            )));
        }
        if size < schema.min_row_size() {
            return Err(CodecError::SchemaMismatch(format!(
                "row of {} bytes shorter than schema layout ({} bytes)",
                size,
                schema.min_row_size()
            )));
        }
        Ok(Self {
            data: &data[..size],
            schema,
        })
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn schema_version(&self) -> u8 {
        self.data[1]
    }

    fn check_column(&self, col_idx: usize) -> Result<()> {
        if col_idx >= self.schema.column_count() {
            return Err(CodecError::ColumnOutOfRange {
                column: col_idx,
                column_count: self.schema.column_count(),
            });
        }
        Ok(())
    }

    pub fn is_null(&self, col_idx: usize) -> Result<bool> {
        self.check_column(col_idx)?;
        let byte = self.data[self.schema.bitmap_offset() + col_idx / 8];
        Ok(byte & (1 << (col_idx % 8)) != 0)
    }

    fn read_offset(&self, slot: usize) -> usize {
        let at = self.schema.var_table_offset() + slot * VAR_OFFSET_SIZE;
        let bytes: [u8; VAR_OFFSET_SIZE] = self.data[at..at + VAR_OFFSET_SIZE]
            .try_into()
            .unwrap_or([0; VAR_OFFSET_SIZE]);
        u32::from_le_bytes(bytes) as usize
    }

    /// Absolute `[start, end)` of a variable-length column's bytes.
    pub fn var_bounds(&self, col_idx: usize) -> Result<(usize, usize)> {
        self.check_column(col_idx)?;
        let slot = self
            .schema
            .var_column_index(col_idx)
            .ok_or_else(|| CodecError::SchemaMismatch(format!(
                "column {} is not a variable column",
                col_idx
            )))?;

        let start = self.read_offset(slot);
        let end = if slot + 1 < self.schema.var_column_count() {
            self.read_offset(slot + 1)
        } else {
            self.data.len()
        };

        if start < self.schema.var_data_offset() || start > end || end > self.data.len() {
            return Err(CodecError::SchemaMismatch(format!(
                "corrupt var offsets for column {}: [{}, {}) in row of {} bytes",
                col_idx,
                start,
                end,
                self.data.len()
            )));
        }
        Ok((start, end))
    }

    /// Encoded bytes of a column: the fixed-width field, or the
    /// variable-length payload.
    pub fn column_bytes(&self, col_idx: usize) -> Result<&'a [u8]> {
        self.check_column(col_idx)?;
        match self.schema.columns[col_idx].fixed_size() {
            Some(size) => {
                let start = self.schema.fixed_region_offset() + self.schema.fixed_offset(col_idx);
                Ok(&self.data[start..start + size])
            }
            None => {
                let (start, end) = self.var_bounds(col_idx)?;
                Ok(&self.data[start..end])
            }
        }
    }

    fn fixed<const N: usize>(&self, col_idx: usize, wanted: DataType) -> Result<[u8; N]> {
        self.check_column(col_idx)?;
        let actual = self.schema.columns[col_idx].data_type();
        if actual != wanted {
            return Err(CodecError::TypeMismatch {
                column: col_idx,
                expected: actual,
                actual: wanted,
            });
        }
        let start = self.schema.fixed_region_offset() + self.schema.fixed_offset(col_idx);
        self.data[start..start + N].try_into().map_err(|_| {
            CodecError::SchemaMismatch(format!("insufficient data for {} at col {}", wanted, col_idx))
        })
    }

    pub fn get_bool(&self, col_idx: usize) -> Result<bool> {
        Ok(self.fixed::<1>(col_idx, DataType::Bool)?[0] != 0)
    }

    pub fn get_int16(&self, col_idx: usize) -> Result<i16> {
        Ok(i16::from_le_bytes(self.fixed(col_idx, DataType::Int16)?))
    }

    pub fn get_int32(&self, col_idx: usize) -> Result<i32> {
        Ok(i32::from_le_bytes(self.fixed(col_idx, DataType::Int32)?))
    }

    pub fn get_int64(&self, col_idx: usize) -> Result<i64> {
        Ok(i64::from_le_bytes(self.fixed(col_idx, DataType::Int64)?))
    }

    pub fn get_float(&self, col_idx: usize) -> Result<f32> {
        Ok(f32::from_le_bytes(self.fixed(col_idx, DataType::Float)?))
    }

    pub fn get_double(&self, col_idx: usize) -> Result<f64> {
        Ok(f64::from_le_bytes(self.fixed(col_idx, DataType::Double)?))
    }

    pub fn get_date(&self, col_idx: usize) -> Result<u32> {
        Ok(u32::from_le_bytes(self.fixed(col_idx, DataType::Date)?))
    }

    pub fn get_timestamp(&self, col_idx: usize) -> Result<i64> {
        Ok(i64::from_le_bytes(self.fixed(col_idx, DataType::Timestamp)?))
    }

    pub fn get_string(&self, col_idx: usize) -> Result<&'a str> {
        let bytes = self.column_bytes(col_idx)?;
        if !self.schema.columns[col_idx].data_type().is_text() {
            return Err(CodecError::TypeMismatch {
                column: col_idx,
                expected: self.schema.columns[col_idx].data_type(),
                actual: DataType::String,
            });
        }
        std::str::from_utf8(bytes).map_err(|e| {
            CodecError::SchemaMismatch(format!("invalid UTF-8 in text column {}: {}", col_idx, e))
        })
    }

    /// Decodes a column according to its declared type. NULL columns decode
    /// to `Value::Null`.
    pub fn get_value(&self, col_idx: usize) -> Result<Value<'a>> {
        if self.is_null(col_idx)? {
            return Ok(Value::Null);
        }
        Ok(match self.schema.columns[col_idx].data_type() {
            DataType::Bool => Value::Bool(self.get_bool(col_idx)?),
            DataType::Int16 => Value::Int16(self.get_int16(col_idx)?),
            DataType::Int32 => Value::Int32(self.get_int32(col_idx)?),
            DataType::Int64 => Value::Int64(self.get_int64(col_idx)?),
            DataType::Float => Value::Float(self.get_float(col_idx)?),
            DataType::Double => Value::Double(self.get_double(col_idx)?),
            DataType::Date => Value::Date(self.get_date(col_idx)?),
            DataType::Timestamp => Value::Timestamp(self.get_timestamp(col_idx)?),
            DataType::String | DataType::Varchar => {
                Value::String(Cow::Borrowed(self.get_string(col_idx)?))
            }
        })
    }

    /// Decodes every column in order.
    pub fn values(&self) -> Result<Vec<Value<'a>>> {
        (0..self.schema.column_count())
            .map(|col| self.get_value(col))
            .collect()
    }
}

impl RowAccess for RowView<'_> {
    fn column_count(&self) -> usize {
        self.schema.column_count()
    }

    fn is_null(&self, col_idx: usize) -> Result<bool> {
        RowView::is_null(self, col_idx)
    }

    fn get(&self, col_idx: usize) -> Result<Value<'_>> {
        self.get_value(col_idx)
    }
}
