//! # Schema Definition
//!
//! `Schema` describes one packed row: its ordered columns, the precomputed
//! offsets of every section of the layout, and the resolved list of index
//! definitions used to derive composite keys.
//!
//! ## Schema Internals
//!
//! - `columns`: ordered column definitions, names unique
//! - `fixed_offsets`: byte offset of each column inside the fixed region
//! - `var_slots`: column position -> slot in the var offset table
//! - `indexes`: resolved index definitions (legacy or composite, never both)
//! - `indexed`: per-column flag, true when any index definition uses it
//!
//! ## Index Resolution
//!
//! Index definitions are resolved once, here, so the append path never has to
//! choose between the two sources:
//!
//! 1. **Composite**: when `with_column_keys` receives a non-empty key list,
//!    each key's column names are resolved to positions and become one
//!    definition, in key order. A key without columns is kept and always
//!    yields the empty key.
//! 2. **Legacy**: otherwise every column flagged `is_indexed` (and not
//!    flagged `is_timestamp`) becomes its own single-column definition, in
//!    column order.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::config::{DEFAULT_SCHEMA_VERSION, HEADER_SIZE, VAR_OFFSET_SIZE};
use crate::error::{CodecError, Result};
use crate::types::ColumnDef;

/// A named group of columns forming one composite key, as supplied by the
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnKey {
    pub name: String,
    pub columns: Vec<String>,
}

impl ColumnKey {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// One resolved index: the column positions whose values form its key, in
/// key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    name: String,
    columns: SmallVec<[usize; 4]>,
}

impl IndexDefinition {
    pub fn new(name: impl Into<String>, columns: impl IntoIterator<Item = usize>) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[usize] {
        &self.columns
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) columns: Vec<ColumnDef>,
    pub(crate) version: u8,
    pub(crate) fixed_offsets: Vec<usize>,
    pub(crate) var_column_indices: Vec<usize>,
    pub(crate) var_slots: Vec<Option<usize>>,
    pub(crate) total_fixed_size: usize,
    pub(crate) indexes: Vec<IndexDefinition>,
    pub(crate) indexed: Vec<bool>,
}

impl Schema {
    /// Builds a schema whose indexes come from the legacy per-column flags.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self> {
        Self::with_column_keys(columns, Vec::new())
    }

    /// Builds a schema with composite key groups. A non-empty `keys` list
    /// replaces the legacy per-column indexes entirely.
    pub fn with_column_keys(columns: Vec<ColumnDef>, keys: Vec<ColumnKey>) -> Result<Self> {
        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(columns.len());
        for (idx, col) in columns.iter().enumerate() {
            if positions.insert(col.name(), idx).is_some() {
                return Err(CodecError::MalformedSchemaDefinition(format!(
                    "duplicate column name '{}'",
                    col.name()
                )));
            }
        }

        let indexes = if keys.is_empty() {
            columns
                .iter()
                .enumerate()
                .filter(|(_, col)| col.is_indexed() && !col.is_timestamp())
                .map(|(idx, col)| IndexDefinition::new(col.name(), [idx]))
                .collect()
        } else {
            let mut resolved = Vec::with_capacity(keys.len());
            for key in &keys {
                let mut cols = SmallVec::new();
                for name in &key.columns {
                    let idx = positions.get(name.as_str()).copied().ok_or_else(|| {
                        CodecError::MalformedSchemaDefinition(format!(
                            "index '{}' references unknown column '{}'",
                            key.name, name
                        ))
                    })?;
                    cols.push(idx);
                }
                resolved.push(IndexDefinition {
                    name: key.name.clone(),
                    columns: cols,
                });
            }
            resolved
        };
        drop(positions);

        Ok(Self::from_parts(columns, indexes, DEFAULT_SCHEMA_VERSION))
    }

    pub(crate) fn from_parts(
        columns: Vec<ColumnDef>,
        indexes: Vec<IndexDefinition>,
        version: u8,
    ) -> Self {
        let mut fixed_offsets = Vec::with_capacity(columns.len());
        let mut var_column_indices = Vec::new();
        let mut var_slots = Vec::with_capacity(columns.len());
        let mut offset = 0;

        for (idx, col) in columns.iter().enumerate() {
            fixed_offsets.push(offset);
            if let Some(size) = col.fixed_size() {
                offset += size;
                var_slots.push(None);
            } else {
                var_slots.push(Some(var_column_indices.len()));
                var_column_indices.push(idx);
            }
        }

        let mut indexed = vec![false; columns.len()];
        for def in &indexes {
            for &col in def.columns() {
                indexed[col] = true;
            }
        }

        Self {
            columns,
            version,
            fixed_offsets,
            var_column_indices,
            var_slots,
            total_fixed_size: offset,
            indexes,
            indexed,
        }
    }

    /// Sets the schema version byte written into every row header.
    pub fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn var_column_count(&self) -> usize {
        self.var_column_indices.len()
    }

    pub fn column(&self, idx: usize) -> Option<&ColumnDef> {
        self.columns.get(idx)
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn var_column_index(&self, col_idx: usize) -> Option<usize> {
        self.var_slots.get(col_idx).copied().flatten()
    }

    pub fn fixed_offset(&self, col_idx: usize) -> usize {
        self.fixed_offsets[col_idx]
    }

    pub fn total_fixed_size(&self) -> usize {
        self.total_fixed_size
    }

    pub fn null_bitmap_size(column_count: usize) -> usize {
        column_count.div_ceil(8)
    }

    pub fn indexes(&self) -> &[IndexDefinition] {
        &self.indexes
    }

    pub fn is_indexed_column(&self, col_idx: usize) -> bool {
        self.indexed.get(col_idx).copied().unwrap_or(false)
    }

    pub fn bitmap_offset(&self) -> usize {
        HEADER_SIZE
    }

    pub fn fixed_region_offset(&self) -> usize {
        HEADER_SIZE + Self::null_bitmap_size(self.column_count())
    }

    pub fn var_table_offset(&self) -> usize {
        self.fixed_region_offset() + self.total_fixed_size
    }

    pub fn var_data_offset(&self) -> usize {
        self.var_table_offset() + self.var_column_count() * VAR_OFFSET_SIZE
    }

    /// Size of a row in this schema whose variable-length columns are all
    /// empty.
    pub fn min_row_size(&self) -> usize {
        self.var_data_offset()
    }

    /// Sub-schema restricted to `positions`, which must be strictly
    /// ascending. Index definitions survive only when every column they use
    /// is kept, remapped to the new positions.
    pub fn project(&self, positions: &[usize]) -> Result<Schema> {
        let mut local = vec![None; self.column_count()];
        let mut prev = None;
        for (new_idx, &col) in positions.iter().enumerate() {
            if col >= self.column_count() {
                return Err(CodecError::ColumnOutOfRange {
                    column: col,
                    column_count: self.column_count(),
                });
            }
            if prev.is_some_and(|p| p >= col) {
                return Err(CodecError::SchemaMismatch(format!(
                    "projection positions must be strictly ascending, got {:?}",
                    positions
                )));
            }
            prev = Some(col);
            local[col] = Some(new_idx);
        }

        let columns = positions.iter().map(|&c| self.columns[c].clone()).collect();
        let indexes = self
            .indexes
            .iter()
            .filter_map(|def| {
                let cols: Option<SmallVec<[usize; 4]>> =
                    def.columns().iter().map(|&c| local[c]).collect();
                cols.map(|columns| IndexDefinition {
                    name: def.name.clone(),
                    columns,
                })
            })
            .collect();

        Ok(Schema::from_parts(columns, indexes, self.version))
    }
}
