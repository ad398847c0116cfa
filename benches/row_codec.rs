//! Row codec benchmarks
//!
//! These benchmarks measure row encoding with default backfill, zero-copy
//! decoding, projection into sub-schema rows, and the common-column split of
//! request batches.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box as hint_black_box;

use rowpack::records::ColumnKey;
use rowpack::{
    BatchRequestSplitter, ColumnDef, ColumnSelector, DataType, DefaultValueMap, RowBuilder,
    RowView, Schema, Slice, Value,
};

fn wide_schema(columns: usize) -> Schema {
    let defs = (0..columns)
        .map(|i| {
            let data_type = match i % 4 {
                0 => DataType::Int64,
                1 => DataType::String,
                2 => DataType::Double,
                _ => DataType::Int32,
            };
            ColumnDef::new(format!("c{}", i), data_type)
        })
        .collect();
    Schema::with_column_keys(defs, vec![ColumnKey::new("k", ["c0", "c1"])]).unwrap()
}

fn value_for(data_type: DataType, i: usize) -> Value<'static> {
    match data_type {
        DataType::Int64 => Value::Int64(i as i64),
        DataType::String => Value::from(format!("value-{}", i)),
        DataType::Double => Value::Double(i as f64 * 0.5),
        _ => Value::Int32(i as i32),
    }
}

fn row_values(schema: &Schema) -> Vec<Value<'static>> {
    schema
        .columns()
        .iter()
        .enumerate()
        .map(|(i, col)| value_for(col.data_type(), i))
        .collect()
}

fn encode(schema: &Schema, defaults: &DefaultValueMap, values: &[Value<'_>]) -> Slice {
    let budget = values.iter().filter_map(|v| v.as_str().map(str::len)).sum();
    let mut builder = RowBuilder::new(schema, defaults);
    builder.init(budget).unwrap();
    for value in values {
        builder.append_value(value).unwrap();
    }
    builder.build().unwrap().slice
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_encode");

    for columns in [4, 16, 64] {
        let schema = wide_schema(columns);
        let values = row_values(&schema);
        let defaults = DefaultValueMap::new();

        group.bench_with_input(BenchmarkId::new("explicit", columns), &columns, |b, _| {
            b.iter(|| hint_black_box(encode(&schema, &defaults, black_box(&values))));
        });
    }

    let schema = wide_schema(16);
    let values = row_values(&schema);
    let defaults = DefaultValueMap::from_values(
        values
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 2 == 1)
            .map(|(i, v)| (i, v.clone())),
    );
    group.bench_function("half_defaulted_16", |b| {
        b.iter(|| {
            let mut builder = RowBuilder::new(&schema, &defaults);
            builder.init(0).unwrap();
            while !builder.is_complete() {
                let col = builder.cursor();
                builder.append_value(black_box(&values[col])).unwrap();
            }
            hint_black_box(builder.build().unwrap())
        });
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_decode");
    let schema = wide_schema(64);
    let row = encode(&schema, &DefaultValueMap::new(), &row_values(&schema));

    group.bench_function("single_fixed", |b| {
        b.iter(|| {
            let view = RowView::new(black_box(&row), &schema).unwrap();
            hint_black_box(view.get_int32(63).unwrap())
        });
    });

    group.bench_function("single_text", |b| {
        b.iter(|| {
            let view = RowView::new(black_box(&row), &schema).unwrap();
            hint_black_box(view.get_string(61).unwrap())
        });
    });

    group.bench_function("all_values", |b| {
        b.iter(|| {
            let view = RowView::new(black_box(&row), &schema).unwrap();
            hint_black_box(view.values().unwrap())
        });
    });

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_select");
    let schema = wide_schema(64);
    let row = encode(&schema, &DefaultValueMap::new(), &row_values(&schema));

    for width in [1, 8, 32] {
        let selector = ColumnSelector::new(&schema, (0..64).step_by(64 / width)).unwrap();
        group.bench_with_input(BenchmarkId::new("columns", width), &width, |b, _| {
            b.iter(|| hint_black_box(selector.select(black_box(&row)).unwrap()));
        });
    }

    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_split");
    let schema = wide_schema(16);
    let rows: Vec<Slice> = (0..64)
        .map(|_| encode(&schema, &DefaultValueMap::new(), &row_values(&schema)))
        .collect();
    let splitter = BatchRequestSplitter::new(&schema, 0..12).unwrap();

    group.bench_function("64_rows_12_common", |b| {
        b.iter(|| hint_black_box(splitter.split(black_box(&rows)).unwrap().len()));
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_select, bench_split);
criterion_main!(benches);
