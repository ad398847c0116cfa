//! Fuzz testing for the row builder.
//!
//! Drives a `RowBuilder` with arbitrary positional appends and checks that
//! failed appends never move the cursor and that every completed row decodes
//! and projects cleanly.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use rowpack::records::{ColumnSelector, DefaultValueMap, RowBuilder, RowView, Schema};
use rowpack::types::{ColumnDef, DataType, Value};

#[derive(Debug, Arbitrary)]
struct RowBuilderInput {
    schema: Vec<FuzzColumnDef>,
    defaults: Vec<(u8, FuzzValue)>,
    budget: u16,
    operations: Vec<(u8, FuzzValue)>,
    selection: Vec<u8>,
}

#[derive(Debug, Arbitrary)]
struct FuzzColumnDef {
    data_type: FuzzDataType,
    indexed: bool,
    timestamp: bool,
}

#[derive(Debug, Arbitrary, Clone, Copy)]
enum FuzzDataType {
    Bool,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    Date,
    Timestamp,
    String,
    Varchar,
}

#[derive(Debug, Arbitrary, Clone)]
enum FuzzValue {
    Null,
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Date(u32),
    Timestamp(i64),
    Text(String),
}

impl From<FuzzDataType> for DataType {
    fn from(fdt: FuzzDataType) -> Self {
        match fdt {
            FuzzDataType::Bool => DataType::Bool,
            FuzzDataType::Int16 => DataType::Int16,
            FuzzDataType::Int32 => DataType::Int32,
            FuzzDataType::Int64 => DataType::Int64,
            FuzzDataType::Float => DataType::Float,
            FuzzDataType::Double => DataType::Double,
            FuzzDataType::Date => DataType::Date,
            FuzzDataType::Timestamp => DataType::Timestamp,
            FuzzDataType::String => DataType::String,
            FuzzDataType::Varchar => DataType::Varchar,
        }
    }
}

impl From<FuzzValue> for Value<'static> {
    fn from(fv: FuzzValue) -> Self {
        match fv {
            FuzzValue::Null => Value::Null,
            FuzzValue::Bool(v) => Value::Bool(v),
            FuzzValue::Int16(v) => Value::Int16(v),
            FuzzValue::Int32(v) => Value::Int32(v),
            FuzzValue::Int64(v) => Value::Int64(v),
            FuzzValue::Float(v) => Value::Float(v),
            FuzzValue::Double(v) => Value::Double(v),
            FuzzValue::Date(v) => Value::Date(v),
            FuzzValue::Timestamp(v) => Value::Timestamp(v),
            FuzzValue::Text(v) => Value::from(v),
        }
    }
}

fuzz_target!(|input: RowBuilderInput| {
    if input.schema.is_empty() || input.schema.len() > 32 {
        return;
    }
    let col_count = input.schema.len();

    let column_defs: Vec<ColumnDef> = input
        .schema
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let mut def = ColumnDef::new(format!("col{}", i), col.data_type.into());
            if col.indexed {
                def = def.indexed();
            }
            if col.timestamp {
                def = def.timestamp();
            }
            def
        })
        .collect();
    let Ok(schema) = Schema::new(column_defs) else {
        return;
    };

    let defaults = DefaultValueMap::from_values(
        input
            .defaults
            .into_iter()
            .filter(|(_, v)| !matches!(v, FuzzValue::Text(s) if s.len() > 256))
            .map(|(idx, v)| ((idx as usize) % col_count, v.into())),
    );

    let mut builder = RowBuilder::new(&schema, &defaults);
    if builder.init(input.budget as usize).is_err() {
        return;
    }

    for (idx, value) in input.operations {
        let value: Value<'static> = value.into();
        let before = builder.cursor();
        let used = builder.used_len();
        match builder.append_at((idx as usize) % (col_count + 1), &value) {
            Ok(()) => assert!(builder.cursor() > before),
            Err(_) => {
                assert_eq!(builder.cursor(), before);
                assert_eq!(builder.used_len(), used);
            }
        }
    }

    let keys = builder.dimensions().len();
    assert_eq!(keys, schema.indexes().len());

    if let Ok(row) = builder.build() {
        let view = RowView::new(&row.slice, &schema).expect("built row must decode");
        view.values().expect("built row columns must decode");

        let selector =
            ColumnSelector::new(&schema, input.selection.iter().map(|&c| c as usize % col_count))
                .expect("positions are in range");
        let projected = selector.select(&row.slice).expect("built row must project");
        RowView::new(&projected, selector.projected_schema())
            .and_then(|v| v.values().map(|_| ()))
            .expect("projected row must decode");
    }
});
