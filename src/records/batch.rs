//! # Batches of Rows
//!
//! Two batch-level helpers sit on top of the single-row codec:
//!
//! - `InsertRows` drives one `RowBuilder` per row for an insert batch that
//!   shares a schema and default map, and hands the finished rows to storage.
//! - `BatchRequestSplitter` implements the common-column optimization for
//!   batch requests: columns known to hold the same value in every row are
//!   selected once into a shared `Slice`, and each row keeps only its varying
//!   columns.
//!
//! ## Common-Column Split
//!
//! ```text
//! rows[0] ──select(common)──> shared ─┬──────────────┬─────────── ...
//!                                     │              │
//! rows[0] ──select(varying)─> v0 ─> CompositeRow  rows[1] ─> v1 ─> CompositeRow
//! ```
//!
//! When the common set is empty or covers every column there is nothing to
//! share, and each row becomes a single-segment `CompositeRow` over its
//! original slice.

use std::collections::BTreeSet;

use eyre::{Result, WrapErr};
use tracing::debug;

use crate::config::BuilderOptions;
use crate::error::CodecError;
use crate::records::builder::{BuiltRow, RowBuilder};
use crate::records::composite::{CompositeRow, SegmentLayout};
use crate::records::defaults::DefaultValueMap;
use crate::records::schema::Schema;
use crate::records::slice::Slice;

pub struct InsertRows<'a> {
    schema: &'a Schema,
    defaults: &'a DefaultValueMap,
    options: BuilderOptions,
    rows: Vec<RowBuilder<'a>>,
}

impl<'a> InsertRows<'a> {
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
            rows: Vec::new(),
        }
    }

    /// Starts a new row. Returns `None` while the previous row is still
    /// incomplete. The returned builder still needs `init`.
    pub fn new_row(&mut self) -> Option<&mut RowBuilder<'a>> {
        if self.rows.last().is_some_and(|row| !row.is_complete()) {
            return None;
        }
        self.rows
            .push(RowBuilder::with_options(self.schema, self.defaults, self.options));
        self.rows.last_mut()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, idx: usize) -> Option<&RowBuilder<'a>> {
        self.rows.get(idx)
    }

    pub fn row_mut(&mut self, idx: usize) -> Option<&mut RowBuilder<'a>> {
        self.rows.get_mut(idx)
    }

    pub fn is_complete(&self) -> bool {
        self.rows.iter().all(RowBuilder::is_complete)
    }

    /// Builds every row, in insertion order.
    pub fn finish(self) -> Result<Vec<BuiltRow>> {
        let count = self.rows.len();
        let built = self
            .rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| {
                row.build()
                    .wrap_err_with(|| format!("failed to build row {} of {}", idx, count))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(rows = count, "insert batch finished");
        Ok(built)
    }
}

const COMMON_SEGMENT: usize = 0;
const VARYING_SEGMENT: usize = 1;

pub struct BatchRequestSplitter {
    layout: SegmentLayout,
    split: bool,
}

impl BatchRequestSplitter {
    pub fn new(schema: &Schema, common: impl IntoIterator<Item = usize>) -> Result<Self> {
        let column_count = schema.column_count();
        let common: BTreeSet<usize> = common.into_iter().collect();
        if let Some(&column) = common.iter().find(|&&c| c >= column_count) {
            return Err(CodecError::ColumnOutOfRange {
                column,
                column_count,
            })
            .wrap_err("invalid common column set");
        }

        if common.is_empty() || common.len() == column_count {
            debug!(
                common = common.len(),
                columns = column_count,
                "common-column split disabled"
            );
            return Ok(Self {
                layout: SegmentLayout::whole(schema.clone()),
                split: false,
            });
        }

        let varying: Vec<usize> = (0..column_count).filter(|c| !common.contains(c)).collect();
        let layout =
            SegmentLayout::new(schema.clone(), vec![common.into_iter().collect(), varying])?;
        Ok(Self {
            layout,
            split: true,
        })
    }

    pub fn is_split(&self) -> bool {
        self.split
    }

    pub fn layout(&self) -> &SegmentLayout {
        &self.layout
    }

    /// Turns full-schema rows into composite rows. The common slice is
    /// selected from the first row only and shared by every output row.
    pub fn split(&self, rows: &[Slice]) -> Result<Vec<CompositeRow<'_>>> {
        if !self.split {
            return rows
                .iter()
                .enumerate()
                .map(|(idx, row)| {
                    CompositeRow::whole(&self.layout, row.clone())
                        .wrap_err_with(|| format!("invalid request row {}", idx))
                })
                .collect();
        }

        let common = self.layout.selector(COMMON_SEGMENT)?;
        let varying = self.layout.selector(VARYING_SEGMENT)?;

        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };
        let shared = common
            .select_slice(first)
            .wrap_err("failed to select common columns")?;

        let mut out = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            let own = varying
                .select_slice(row)
                .wrap_err_with(|| format!("failed to select varying columns of row {}", idx))?;
            out.push(CompositeRow::compose(
                &self.layout,
                [(shared.clone(), COMMON_SEGMENT), (own, VARYING_SEGMENT)],
            )?);
        }

        debug!(
            rows = rows.len(),
            common = common.positions().len(),
            varying = varying.positions().len(),
            "batch request split"
        );
        Ok(out)
    }
}
