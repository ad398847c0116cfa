//! # Batch Request Tests
//!
//! Covers the batch-level paths:
//!
//! - Insert batches built with `InsertRows`
//! - The common-column split of request batches
//! - Concurrent readers of shared row slices

use std::sync::{Arc, Barrier};
use std::thread;

use rowpack::{
    BatchRequestSplitter, ColumnDef, DataType, DefaultValueMap, InsertRows, RowBuilder, RowView,
    Schema, Slice, Value,
};

fn request_schema() -> Schema {
    Schema::new(vec![
        ColumnDef::new("tenant", DataType::String).indexed(),
        ColumnDef::new("event_time", DataType::Int64).timestamp(),
        ColumnDef::new("payload", DataType::Varchar),
        ColumnDef::new("source", DataType::String),
        ColumnDef::new("attempt", DataType::Int16),
    ])
    .unwrap()
}

fn request_row(schema: &Schema, time: i64, payload: &str, attempt: i16) -> Slice {
    let defaults = DefaultValueMap::new();
    let mut builder = RowBuilder::new(schema, &defaults);
    builder.init(16 + payload.len()).unwrap();
    builder.append_string("tenant-a").unwrap();
    builder.append_int64(time).unwrap();
    builder.append_varchar(payload).unwrap();
    builder.append_string("api").unwrap();
    builder.append_int16(attempt).unwrap();
    builder.build().unwrap().slice
}

mod insert_tests {
    use super::*;

    #[test]
    fn insert_batch_collects_keys_per_row() {
        let schema = request_schema();
        let defaults =
            DefaultValueMap::from_literals(&schema, [(3, "'batch'"), (4, "0")]).unwrap();
        let mut batch = InsertRows::new(&schema, &defaults);

        for (idx, tenant) in ["t1", "t2", "t3"].iter().enumerate() {
            let row = batch.new_row().unwrap();
            row.init(tenant.len() + 4).unwrap();
            row.append_string(tenant).unwrap();
            row.append_int64(idx as i64 * 10).unwrap();
            row.append_varchar("data").unwrap();
            assert!(row.is_complete());
        }

        let rows = batch.finish().unwrap();
        assert_eq!(rows.len(), 3);
        for (idx, row) in rows.iter().enumerate() {
            assert_eq!(row.dimensions[0].key, format!("t{}", idx + 1));
            assert_eq!(row.timestamps, vec![idx as i64 * 10]);
            let view = RowView::new(&row.slice, &schema).unwrap();
            assert_eq!(view.get_string(3).unwrap(), "batch");
            assert_eq!(view.get_int16(4).unwrap(), 0);
        }
    }

    #[test]
    fn empty_insert_batch_finishes_empty() {
        let schema = request_schema();
        let defaults = DefaultValueMap::new();
        let batch = InsertRows::new(&schema, &defaults);
        assert!(batch.is_empty());
        assert!(batch.finish().unwrap().is_empty());
    }
}

mod split_tests {
    use super::*;

    #[test]
    fn common_columns_are_stored_once() {
        let schema = request_schema();
        let rows: Vec<Slice> = (0..4)
            .map(|i| request_row(&schema, 100 + i, &"x".repeat(i as usize + 1), i as i16))
            .collect();

        let splitter = BatchRequestSplitter::new(&schema, [0, 3]).unwrap();
        let composites = splitter.split(&rows).unwrap();

        let common = composites[0].slices().next().unwrap().clone();
        assert_eq!(common.ref_count(), 5);
        for (i, composite) in composites.iter().enumerate() {
            assert!(composite.slices().next().unwrap().shares_buffer(&common));
            assert_eq!(composite.get(0).unwrap(), Value::text("tenant-a"));
            assert_eq!(composite.get(1).unwrap(), Value::Int64(100 + i as i64));
            assert_eq!(composite.get(2).unwrap(), Value::text("x".repeat(i + 1)));
            assert_eq!(composite.get(3).unwrap(), Value::text("api"));
            assert_eq!(composite.get(4).unwrap(), Value::Int16(i as i16));
        }

        drop(composites);
        assert_eq!(common.ref_count(), 1);
    }

    #[test]
    fn empty_batch_splits_to_nothing() {
        let schema = request_schema();
        let splitter = BatchRequestSplitter::new(&schema, [0]).unwrap();
        assert!(splitter.split(&[]).unwrap().is_empty());
    }

    #[test]
    fn malformed_request_row_is_reported_with_its_position() {
        let schema = request_schema();
        let good = request_row(&schema, 1, "ok", 0);
        let bad = good.sub_slice(0..good.len() - 1).unwrap();

        let splitter = BatchRequestSplitter::new(&schema, [0, 3]).unwrap();
        let err = splitter.split(&[good, bad]).err().unwrap();
        assert!(err.to_string().contains("row 1"), "{}", err);
    }
}

mod concurrency_tests {
    use super::*;

    #[test]
    fn many_threads_read_one_shared_row() {
        let schema = Arc::new(request_schema());
        let row = request_row(&schema, 42, "shared", 3);
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let schema = Arc::clone(&schema);
                let row = row.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let view = RowView::new(&row, &schema).unwrap();
                    (
                        view.get_int64(1).unwrap(),
                        view.get_string(2).unwrap().to_string(),
                    )
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), (42, "shared".to_string()));
        }
        assert_eq!(row.ref_count(), 1);
    }

    #[test]
    fn composite_rows_are_read_and_dropped_across_threads() {
        let schema = request_schema();
        let rows: Vec<Slice> = (0..6)
            .map(|i| request_row(&schema, i, "p", 1))
            .collect();
        let splitter = BatchRequestSplitter::new(&schema, [0, 3, 4]).unwrap();
        let composites = splitter.split(&rows).unwrap();
        let common = composites[0].slices().next().unwrap().clone();

        thread::scope(|scope| {
            for composite in composites {
                scope.spawn(move || {
                    assert_eq!(composite.get(0).unwrap(), Value::text("tenant-a"));
                    assert_eq!(composite.get(4).unwrap(), Value::Int16(1));
                });
            }
        });

        assert_eq!(common.ref_count(), 1);
    }
}
