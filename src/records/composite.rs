//! # CompositeRow - One Logical Row over Several Slices
//!
//! A `CompositeRow` presents one row-shaped accessor over one or more
//! physical `Slice`s. Each slice is laid out under the sub-schema of one
//! segment of a `SegmentLayout`; together the chosen segments must cover
//! every column of the full schema exactly once.
//!
//! ## Column Resolution
//!
//! ```text
//! full schema:   c0  c1  c2  c3  c4
//! segment 0:     c0      c2           <- shared "common" slice
//! segment 1:         c1      c3  c4   <- per-row "varying" slice
//!
//! get(3) -> segment 1, local column 1
//! ```
//!
//! ## Shared Slices
//!
//! A slice paired into many composite rows is reference counted, not copied.
//! Dropping one composite row releases only its own handles; the others keep
//! reading the shared bytes.

use smallvec::SmallVec;

use crate::error::{CodecError, Result};
use crate::records::schema::Schema;
use crate::records::selector::ColumnSelector;
use crate::records::slice::Slice;
use crate::records::view::RowView;
use crate::records::RowAccess;
use crate::types::Value;

/// One group of columns of the full schema and the sub-schema its slices
/// are laid out under.
#[derive(Debug, Clone)]
pub struct Segment {
    columns: Vec<usize>,
    schema: Schema,
}

impl Segment {
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// The full logical schema plus the column groups that slices may carry.
/// Segment ids are positions in the group list.
#[derive(Debug, Clone)]
pub struct SegmentLayout {
    full: Schema,
    segments: Vec<Segment>,
}

impl SegmentLayout {
    /// Each group is normalized to ascending, duplicate-free positions.
    /// Groups may overlap; coverage is checked per row by `CompositeRow`.
    pub fn new(full: Schema, groups: Vec<Vec<usize>>) -> Result<Self> {
        let mut segments = Vec::with_capacity(groups.len());
        for mut columns in groups {
            columns.sort_unstable();
            columns.dedup();
            let schema = full.project(&columns)?;
            segments.push(Segment { columns, schema });
        }
        Ok(Self { full, segments })
    }

    /// Layout with a single segment holding every column.
    pub fn whole(full: Schema) -> Self {
        let columns: Vec<usize> = (0..full.column_count()).collect();
        let segment = Segment {
            columns,
            schema: full.clone(),
        };
        Self {
            full,
            segments: vec![segment],
        }
    }

    pub fn full_schema(&self) -> &Schema {
        &self.full
    }

    pub fn segment(&self, id: usize) -> Option<&Segment> {
        self.segments.get(id)
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Selector that cuts segment `id` out of a full-schema row.
    pub fn selector(&self, id: usize) -> Result<ColumnSelector<'_>> {
        let segment = self.segments.get(id).ok_or_else(|| {
            CodecError::SchemaMismatch(format!("unknown segment id {}", id))
        })?;
        ColumnSelector::new(&self.full, segment.columns.iter().copied())
    }
}

#[derive(Debug, Clone)]
pub struct CompositeRow<'a> {
    layout: &'a SegmentLayout,
    parts: SmallVec<[(Slice, usize); 2]>,
    locator: Vec<(usize, usize)>,
}

impl<'a> CompositeRow<'a> {
    /// Stitches `parts` (slice, segment id) into one row. Fails unless the
    /// segments cover every column of the full schema exactly once and each
    /// slice is a valid row for its segment.
    pub fn compose<I>(layout: &'a SegmentLayout, parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Slice, usize)>,
    {
        let parts: SmallVec<[(Slice, usize); 2]> = parts.into_iter().collect();
        let column_count = layout.full.column_count();
        let mut locator: Vec<Option<(usize, usize)>> = vec![None; column_count];

        for (part_idx, (slice, segment_id)) in parts.iter().enumerate() {
            let segment = layout.segment(*segment_id).ok_or_else(|| {
                CodecError::SchemaMismatch(format!("unknown segment id {}", segment_id))
            })?;
            RowView::new(slice.as_bytes(), &segment.schema)?;
            for (local, &global) in segment.columns.iter().enumerate() {
                if locator[global].replace((part_idx, local)).is_some() {
                    return Err(CodecError::SchemaMismatch(format!(
                        "column {} is covered by more than one segment",
                        global
                    )));
                }
            }
        }

        let locator = locator
            .into_iter()
            .enumerate()
            .map(|(col, slot)| {
                slot.ok_or_else(|| {
                    CodecError::SchemaMismatch(format!("column {} is not covered by any segment", col))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            layout,
            parts,
            locator,
        })
    }

    /// Single-slice row over a layout whose segment 0 spans every column.
    pub fn whole(layout: &'a SegmentLayout, slice: Slice) -> Result<Self> {
        Self::compose(layout, [(slice, 0)])
    }

    pub fn layout(&self) -> &'a SegmentLayout {
        self.layout
    }

    pub fn segment_count(&self) -> usize {
        self.parts.len()
    }

    pub fn slices(&self) -> impl Iterator<Item = &Slice> {
        self.parts.iter().map(|(slice, _)| slice)
    }

    /// Segment-local position of a full-schema column: (part index, column).
    pub fn locate(&self, col_idx: usize) -> Result<(usize, usize)> {
        self.locator
            .get(col_idx)
            .copied()
            .ok_or(CodecError::ColumnOutOfRange {
                column: col_idx,
                column_count: self.locator.len(),
            })
    }

    /// View over one backing slice.
    pub fn part_view(&self, part_idx: usize) -> Result<RowView<'_>> {
        let (slice, segment_id) = self.parts.get(part_idx).ok_or_else(|| {
            CodecError::SchemaMismatch(format!("composite row has no part {}", part_idx))
        })?;
        let segment = self.layout.segment(*segment_id).ok_or_else(|| {
            CodecError::SchemaMismatch(format!("unknown segment id {}", segment_id))
        })?;
        RowView::new(slice.as_bytes(), &segment.schema)
    }

    pub fn get(&self, col_idx: usize) -> Result<Value<'_>> {
        let (part, local) = self.locate(col_idx)?;
        self.part_view(part)?.get_value(local)
    }

    pub fn is_null(&self, col_idx: usize) -> Result<bool> {
        let (part, local) = self.locate(col_idx)?;
        self.part_view(part)?.is_null(local)
    }

    /// Decodes every column of the full schema in order.
    pub fn values(&self) -> Result<Vec<Value<'_>>> {
        (0..self.locator.len()).map(|col| self.get(col)).collect()
    }
}

impl RowAccess for CompositeRow<'_> {
    fn column_count(&self) -> usize {
        self.locator.len()
    }

    fn is_null(&self, col_idx: usize) -> Result<bool> {
        CompositeRow::is_null(self, col_idx)
    }

    fn get(&self, col_idx: usize) -> Result<Value<'_>> {
        CompositeRow::get(self, col_idx)
    }
}
