//! Fuzz testing for the row view.
//!
//! Feeds arbitrary bytes to `RowView` and `ColumnSelector` under an arbitrary
//! schema. Malformed rows must be rejected with an error, never a panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use rowpack::records::{ColumnSelector, RowView, Schema};
use rowpack::types::{ColumnDef, DataType};

#[derive(Debug, Arbitrary)]
struct RowViewInput {
    column_types: Vec<u8>,
    selection: Vec<u8>,
    data: Vec<u8>,
}

fuzz_target!(|input: RowViewInput| {
    let columns: Vec<ColumnDef> = input
        .column_types
        .iter()
        .take(32)
        .enumerate()
        .filter_map(|(i, &t)| DataType::from_u8(t).map(|dt| ColumnDef::new(format!("c{}", i), dt)))
        .collect();
    if columns.is_empty() {
        return;
    }
    let col_count = columns.len();
    let Ok(schema) = Schema::new(columns) else {
        return;
    };

    if let Ok(view) = RowView::new(&input.data, &schema) {
        for col in 0..col_count {
            let _ = view.is_null(col);
            let _ = view.get_value(col);
        }
    }

    if let Ok(selector) =
        ColumnSelector::new(&schema, input.selection.iter().map(|&c| c as usize % col_count))
    {
        if let Ok(projected) = selector.select(&input.data) {
            let view = RowView::new(&projected, selector.projected_schema())
                .expect("projected row must carry a valid header");
            assert_eq!(view.size(), projected.len());
        }
    }
});
