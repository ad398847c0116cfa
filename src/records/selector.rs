//! # ColumnSelector - Row Projection
//!
//! `ColumnSelector` extracts a subset of columns from a packed row into a new,
//! self-contained packed row whose layout is exactly what a `RowBuilder` over
//! the projected sub-schema would have produced for the same values.
//!
//! ## Projection
//!
//! ```text
//! source (full schema)                      output (sub-schema)
//! +------+--------+---------+-----+------+  +------+------+-------+----+-----+
//! | hdr  | bitmap | fixed   | off | var  |  | hdr  | bmp  | fixed |off | var |
//! +------+--------+---------+-----+------+  +------+------+-------+----+-----+
//!            │         │       │    │          ▲      ▲       ▲     ▲
//!            └─ bits ──┼───────┼────┼──────────┘──────┘       │     │
//!                      └─ copied verbatim ────────────────────┘     │
//!                              └─ offsets recomputed, payload copied┘
//! ```
//!
//! Selected positions are kept in ascending order regardless of the order
//! they were supplied in. The selector holds no mutable state; `select` may
//! run concurrently over different buffers.

use std::collections::BTreeSet;

use tracing::trace;

use crate::config::VAR_OFFSET_SIZE;
use crate::error::{CodecError, Result};
use crate::records::header::RowHeader;
use crate::records::schema::Schema;
use crate::records::slice::Slice;
use crate::records::view::RowView;

#[derive(Debug, Clone)]
pub struct ColumnSelector<'a> {
    schema: &'a Schema,
    positions: Vec<usize>,
    projected: Schema,
}

impl<'a> ColumnSelector<'a> {
    pub fn new(schema: &'a Schema, positions: impl IntoIterator<Item = usize>) -> Result<Self> {
        let positions: BTreeSet<usize> = positions.into_iter().collect();
        if let Some(&last) = positions.last() {
            if last >= schema.column_count() {
                return Err(CodecError::ColumnOutOfRange {
                    column: last,
                    column_count: schema.column_count(),
                });
            }
        }
        let positions: Vec<usize> = positions.into_iter().collect();
        let projected = schema.project(&positions)?;
        Ok(Self {
            schema,
            positions,
            projected,
        })
    }

    /// Selector over every column this one leaves out.
    pub fn complement(&self) -> Result<ColumnSelector<'a>> {
        let rest = (0..self.schema.column_count())
            .filter(|c| self.positions.binary_search(c).is_err());
        ColumnSelector::new(self.schema, rest)
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn projected_schema(&self) -> &Schema {
        &self.projected
    }

    /// Projects `source`, laid out under the full schema, into a freshly
    /// allocated row for the selected columns.
    pub fn select(&self, source: &[u8]) -> Result<Vec<u8>> {
        let view = RowView::new(source, self.schema)?;
        let projected = &self.projected;

        let mut size = projected.min_row_size();
        for &col in &self.positions {
            if self.schema.var_column_index(col).is_some() {
                let (start, end) = view.var_bounds(col)?;
                size += end - start;
            }
        }

        let mut out = vec![0u8; size];
        RowHeader::new(projected.version(), size as u32).write_to(&mut out);

        let mut var_cursor = projected.var_data_offset();
        for (local, &col) in self.positions.iter().enumerate() {
            if view.is_null(col)? {
                out[projected.bitmap_offset() + local / 8] |= 1 << (local % 8);
            }
            let bytes = view.column_bytes(col)?;
            match projected.var_column_index(local) {
                None => {
                    let start = projected.fixed_region_offset() + projected.fixed_offset(local);
                    out[start..start + bytes.len()].copy_from_slice(bytes);
                }
                Some(slot) => {
                    let entry = projected.var_table_offset() + slot * VAR_OFFSET_SIZE;
                    out[entry..entry + VAR_OFFSET_SIZE]
                        .copy_from_slice(&(var_cursor as u32).to_le_bytes());
                    out[var_cursor..var_cursor + bytes.len()].copy_from_slice(bytes);
                    var_cursor += bytes.len();
                }
            }
        }

        trace!(
            source_len = view.size(),
            selected = self.positions.len(),
            size,
            "row projected"
        );
        Ok(out)
    }

    pub fn select_slice(&self, source: &Slice) -> Result<Slice> {
        self.select(source.as_bytes()).map(Slice::managed)
    }
}
