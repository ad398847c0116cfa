//! # RowBuilder - Ordered Row Encoding
//!
//! `RowBuilder` writes one row's values, in strict column order, into a
//! buffer sized once up front. Columns with a default are backfilled
//! automatically as soon as the cursor reaches them.
//!
//! ## Usage
//!
//! ```ignore
//! let mut builder = RowBuilder::new(&schema, &defaults);
//! builder.init(name.len())?;
//! builder.append_int32(42)?;
//! builder.append_string(name)?;
//! let row = builder.build()?;   // Slice + dimensions + timestamps
//! ```
//!
//! ## Append Cycle
//!
//! Each append targets the column under the cursor:
//!
//! 1. the value is converted to the column's storage type (see `TypeCheck`)
//! 2. its bytes are written at the column's place in the layout
//! 3. its key form is recorded if any index definition uses the column
//! 4. it is recorded as a row timestamp if the column is timestamp-flagged
//! 5. the cursor advances
//! 6. steps 1-5 repeat with the default value of every following column
//!    that has one, stopping at the first column without a default
//!
//! If any step fails, including a default write in step 6, the builder is
//! rolled back to exactly the state it had before the call.
//!
//! ## Buffer Sizing
//!
//! `init(budget)` allocates `header + null bitmap + fixed region + var offset
//! table + budget + string defaults` bytes. `build()` trims the buffer to the
//! bytes actually written, so the output is independent of how generous the
//! budget was.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::config::{BuilderOptions, KEY_SEPARATOR, MAX_ROW_SIZE, VAR_OFFSET_SIZE};
use crate::error::{CodecError, Result};
use crate::records::defaults::DefaultValueMap;
use crate::records::header::RowHeader;
use crate::records::schema::Schema;
use crate::records::slice::Slice;
use crate::types::{pack_date, ColumnDef, Value};

/// A composite index key together with the ordinal of the index definition
/// it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dimension {
    pub key: String,
    pub index: u32,
}

impl Dimension {
    pub fn new(key: impl Into<String>, index: u32) -> Self {
        Self {
            key: key.into(),
            index,
        }
    }
}

/// Everything the storage layer needs for one encoded row.
#[derive(Debug, Clone)]
pub struct BuiltRow {
    pub slice: Slice,
    pub dimensions: Vec<Dimension>,
    pub timestamps: Vec<i64>,
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    cursor: usize,
    var_cursor: usize,
    timestamps: usize,
}

pub struct RowBuilder<'a> {
    schema: &'a Schema,
    defaults: &'a DefaultValueMap,
    options: BuilderOptions,
    buf: Option<Vec<u8>>,
    cursor: usize,
    var_cursor: usize,
    raw_dimensions: Vec<Option<String>>,
    timestamps: Vec<i64>,
    dimensions: Option<Vec<Dimension>>,
}

impl<'a> RowBuilder<'a> {
    pub fn new(schema: &'a Schema, defaults: &'a DefaultValueMap) -> Self {
        Self::with_options(schema, defaults, BuilderOptions::default())
    }

    pub fn with_options(
        schema: &'a Schema,
        defaults: &'a DefaultValueMap,
        options: BuilderOptions,
    ) -> Self {
        Self {
            schema,
            defaults,
            options,
            buf: None,
            cursor: 0,
            var_cursor: 0,
            raw_dimensions: vec![None; schema.column_count()],
            timestamps: Vec::new(),
            dimensions: None,
        }
    }

    /// Allocates the row buffer. `var_budget` is the total byte length of the
    /// string values the caller intends to append.
    pub fn init(&mut self, var_budget: usize) -> Result<()> {
        if self.buf.is_some() {
            return Err(CodecError::AlreadyInitialized);
        }

        let total = self
            .schema
            .min_row_size()
            .saturating_add(var_budget)
            .saturating_add(self.defaults.string_budget());
        if total > MAX_ROW_SIZE {
            return Err(CodecError::BufferExhausted {
                needed: total,
                available: MAX_ROW_SIZE,
            });
        }

        let mut buf = Vec::new();
        buf.try_reserve_exact(total)
            .map_err(|_| CodecError::BufferExhausted {
                needed: total,
                available: 0,
            })?;
        buf.resize(total, 0);
        RowHeader::new(self.schema.version(), total as u32).write_to(&mut buf);

        debug!(
            columns = self.schema.column_count(),
            var_budget,
            default_budget = self.defaults.string_budget(),
            total,
            "row buffer allocated"
        );

        self.buf = Some(buf);
        self.var_cursor = self.schema.var_data_offset();

        if let Err(e) = self.fill_defaults() {
            self.rollback(Checkpoint {
                cursor: 0,
                var_cursor: self.schema.var_data_offset(),
                timestamps: 0,
            });
            self.buf = None;
            return Err(e);
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.buf.is_some()
    }

    /// Position of the next column to be written.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_complete(&self) -> bool {
        self.cursor == self.schema.column_count()
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Timestamp values recorded so far, in append order.
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Bytes written so far, header included.
    pub fn used_len(&self) -> usize {
        if self.buf.is_some() {
            self.var_cursor
        } else {
            0
        }
    }

    /// Bytes of variable-length budget still free.
    pub fn remaining_var_budget(&self) -> usize {
        self.buf
            .as_ref()
            .map(|buf| buf.len() - self.var_cursor)
            .unwrap_or(0)
    }

    /// Appends `value` to the column under the cursor, then backfills any
    /// defaulted columns that follow.
    pub fn append_value(&mut self, value: &Value<'_>) -> Result<()> {
        if self.buf.is_none() {
            return Err(CodecError::NotInitialized);
        }
        let checkpoint = self.checkpoint();
        let result = self.write_value(value).and_then(|()| self.fill_defaults());
        if result.is_err() {
            self.rollback(checkpoint);
        }
        result
    }

    /// Appends `value` to column `position`, which must be the cursor.
    pub fn append_at(&mut self, position: usize, value: &Value<'_>) -> Result<()> {
        if self.buf.is_none() {
            return Err(CodecError::NotInitialized);
        }
        if position != self.cursor {
            if self.is_complete() {
                return Err(CodecError::CursorAtEnd {
                    column_count: self.schema.column_count(),
                });
            }
            return Err(CodecError::OutOfOrder {
                expected: self.cursor,
                actual: position,
            });
        }
        self.append_value(value)
    }

    pub fn append_null(&mut self) -> Result<()> {
        self.append_value(&Value::Null)
    }

    pub fn append_bool(&mut self, value: bool) -> Result<()> {
        self.append_value(&Value::Bool(value))
    }

    pub fn append_int16(&mut self, value: i16) -> Result<()> {
        self.append_value(&Value::Int16(value))
    }

    pub fn append_int32(&mut self, value: i32) -> Result<()> {
        self.append_value(&Value::Int32(value))
    }

    pub fn append_int64(&mut self, value: i64) -> Result<()> {
        self.append_value(&Value::Int64(value))
    }

    pub fn append_float(&mut self, value: f32) -> Result<()> {
        self.append_value(&Value::Float(value))
    }

    pub fn append_double(&mut self, value: f64) -> Result<()> {
        self.append_value(&Value::Double(value))
    }

    /// Appends an already packed date.
    pub fn append_date(&mut self, packed: u32) -> Result<()> {
        self.append_value(&Value::Date(packed))
    }

    pub fn append_date_ymd(&mut self, year: u32, month: u32, day: u32) -> Result<()> {
        if self.buf.is_none() {
            return Err(CodecError::NotInitialized);
        }
        let packed = pack_date(year, month, day)?;
        self.append_value(&Value::Date(packed))
    }

    pub fn append_timestamp(&mut self, micros: i64) -> Result<()> {
        self.append_value(&Value::Timestamp(micros))
    }

    pub fn append_string(&mut self, value: &str) -> Result<()> {
        self.append_value(&Value::String(Cow::Borrowed(value)))
    }

    pub fn append_varchar(&mut self, value: &str) -> Result<()> {
        self.append_string(value)
    }

    /// Composite keys for every index definition, in definition order.
    ///
    /// Computed from the recorded key values on the first call and cached
    /// afterwards. Columns without a recorded value (NULL, or not yet
    /// appended) contribute an empty segment.
    pub fn dimensions(&mut self) -> &[Dimension] {
        if self.dimensions.is_none() {
            self.dimensions = Some(self.derive_dimensions());
        }
        self.dimensions.as_deref().unwrap_or(&[])
    }

    /// Finishes the row: trims the buffer, writes the final size and hands
    /// the bytes over to a `Slice`.
    pub fn build(mut self) -> Result<BuiltRow> {
        if self.buf.is_none() {
            return Err(CodecError::NotInitialized);
        }
        if !self.is_complete() {
            return Err(CodecError::RowIncomplete {
                cursor: self.cursor,
                column_count: self.schema.column_count(),
            });
        }
        let dimensions = match self.dimensions.take() {
            Some(dims) => dims,
            None => self.derive_dimensions(),
        };
        let Some(mut buf) = self.buf.take() else {
            return Err(CodecError::NotInitialized);
        };
        buf.truncate(self.var_cursor);
        RowHeader::from_bytes_mut(&mut buf)?.set_size(self.var_cursor as u32);

        trace!(size = buf.len(), dimensions = dimensions.len(), "row built");

        Ok(BuiltRow {
            slice: Slice::managed(buf),
            dimensions,
            timestamps: std::mem::take(&mut self.timestamps),
        })
    }

    fn derive_dimensions(&self) -> Vec<Dimension> {
        let mut sep_buf = [0u8; 4];
        let separator: &str = KEY_SEPARATOR.encode_utf8(&mut sep_buf);
        self.schema
            .indexes()
            .iter()
            .enumerate()
            .map(|(ordinal, def)| {
                let key = def
                    .columns()
                    .iter()
                    .map(|&col| self.raw_dimensions[col].as_deref().unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join(separator);
                Dimension::new(key, ordinal as u32)
            })
            .collect()
    }

    fn fill_defaults(&mut self) -> Result<()> {
        let defaults = self.defaults;
        while self.cursor < self.schema.column_count() {
            let Some(default) = defaults.get(self.cursor) else {
                break;
            };
            trace!(column = self.cursor, "backfilling default");
            self.write_value(default)?;
        }
        Ok(())
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            cursor: self.cursor,
            var_cursor: self.var_cursor,
            timestamps: self.timestamps.len(),
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        let schema = self.schema;
        let Some(buf) = self.buf.as_mut() else {
            return;
        };
        for col in checkpoint.cursor..self.cursor {
            buf[schema.bitmap_offset() + col / 8] &= !(1 << (col % 8));
            if let Some(size) = schema.columns[col].fixed_size() {
                let start = schema.fixed_region_offset() + schema.fixed_offset(col);
                buf[start..start + size].fill(0);
            } else if let Some(slot) = schema.var_column_index(col) {
                let start = schema.var_table_offset() + slot * VAR_OFFSET_SIZE;
                buf[start..start + VAR_OFFSET_SIZE].fill(0);
            }
            self.raw_dimensions[col] = None;
        }
        buf[checkpoint.var_cursor..self.var_cursor].fill(0);
        self.cursor = checkpoint.cursor;
        self.var_cursor = checkpoint.var_cursor;
        self.timestamps.truncate(checkpoint.timestamps);
    }

    fn coerce<'v>(&self, column: &ColumnDef, value: &Value<'v>) -> Result<Value<'v>> {
        let expected = column.data_type();
        let Some(actual) = value.data_type() else {
            return Ok(Value::Null);
        };
        if expected.is_exact_match(actual) {
            return Ok(value.clone());
        }
        let mismatch = CodecError::TypeMismatch {
            column: self.cursor,
            expected,
            actual,
        };
        if self.options.is_strict() {
            return Err(mismatch);
        }
        value.cast_to(expected).ok_or(mismatch)
    }

    fn write_value(&mut self, value: &Value<'_>) -> Result<()> {
        let schema = self.schema;
        let column_count = schema.column_count();
        if self.cursor >= column_count {
            return Err(CodecError::CursorAtEnd { column_count });
        }
        let col = self.cursor;
        let column = &schema.columns[col];
        let stored = self.coerce(column, value)?;

        let var_cursor = self.var_cursor;
        let buf = self.buf.as_mut().ok_or(CodecError::NotInitialized)?;

        match schema.var_column_index(col) {
            None => {
                let start = schema.fixed_region_offset() + schema.fixed_offset(col);
                encode_fixed(&stored, &mut buf[start..])?;
            }
            Some(slot) => {
                let bytes = stored.as_str().map(str::as_bytes).unwrap_or_default();
                let end = var_cursor + bytes.len();
                if end > buf.len() {
                    return Err(CodecError::BufferExhausted {
                        needed: bytes.len(),
                        available: buf.len() - var_cursor,
                    });
                }
                let entry = schema.var_table_offset() + slot * VAR_OFFSET_SIZE;
                buf[entry..entry + VAR_OFFSET_SIZE]
                    .copy_from_slice(&(var_cursor as u32).to_le_bytes());
                buf[var_cursor..end].copy_from_slice(bytes);
                self.var_cursor = end;
            }
        }

        if stored.is_null() {
            buf[schema.bitmap_offset() + col / 8] |= 1 << (col % 8);
        }

        if schema.is_indexed_column(col) {
            self.raw_dimensions[col] = stored.key_string();
        }
        if column.is_timestamp() {
            if let Value::Int64(ts) | Value::Timestamp(ts) = stored {
                self.timestamps.push(ts);
            }
        }

        self.cursor += 1;
        Ok(())
    }
}

/// Writes the little-endian bytes of a fixed-width value. NULL writes zeros.
pub(crate) fn encode_fixed(value: &Value<'_>, dst: &mut [u8]) -> Result<()> {
    match value {
        Value::Null => {}
        Value::Bool(v) => dst[0] = *v as u8,
        Value::Int16(v) => dst[..2].copy_from_slice(&v.to_le_bytes()),
        Value::Int32(v) => dst[..4].copy_from_slice(&v.to_le_bytes()),
        Value::Int64(v) | Value::Timestamp(v) => dst[..8].copy_from_slice(&v.to_le_bytes()),
        Value::Float(v) => dst[..4].copy_from_slice(&v.to_le_bytes()),
        Value::Double(v) => dst[..8].copy_from_slice(&v.to_le_bytes()),
        Value::Date(v) => dst[..4].copy_from_slice(&v.to_le_bytes()),
        Value::String(_) => {
            return Err(CodecError::SchemaMismatch(
                "text value in a fixed-width column".to_string(),
            ))
        }
    }
    Ok(())
}
