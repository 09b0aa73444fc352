use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use csv_typed::cli::{FilterArgs, SortArgs};
use csv_typed::columns::ColumnRef;
use csv_typed::config::Config;
use csv_typed::inference::{Classifier, infer_column_types};
use csv_typed::{filter, sort};
use tempfile::TempDir;

fn order_rows(rows: usize) -> Vec<Vec<String>> {
    (0..rows)
        .map(|i| {
            let status = match i % 3 {
                0 => "shipped",
                1 => "pending",
                _ => "processing",
            };
            vec![
                i.to_string(),
                format!("2024-{:02}-{:02}", (i % 12) + 1, (i % 28) + 1),
                (i % 2 == 0).to_string(),
                format!("{}.{:02}", (i * 7919) % 1000, i % 100),
                status.to_string(),
            ]
        })
        .collect()
}

fn generate_orders(rows: usize) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let csv_path = temp_dir.path().join("orders.csv");
    let mut file = BufWriter::new(File::create(&csv_path).expect("create csv"));
    writeln!(file, "id,ordered_at,shipped,amount,status").expect("header");
    for row in order_rows(rows) {
        writeln!(file, "{}", row.join(",")).expect("row");
    }
    file.flush().expect("flush csv");
    (temp_dir, csv_path)
}

fn bench_inference(c: &mut Criterion) {
    let rows = order_rows(50_000);
    let classifier = Classifier::default();
    let columns = [1, 2, 3, 4, 5];

    c.bench_function("infer_column_types", |b| {
        b.iter(|| infer_column_types(&classifier, &rows, &columns));
    });
}

fn bench_commands(c: &mut Criterion) {
    let (temp_dir, csv_path) = generate_orders(50_000);
    let config = Config {
        output: Some(temp_dir.path().join("out.csv")),
        ..Config::default()
    };

    let sort_args = SortArgs {
        input: Some(csv_path.clone()),
        columns: vec![ColumnRef::Single(2), ColumnRef::Single(4)],
        reversed: false,
    };
    let filter_args = FilterArgs {
        input: Some(csv_path.clone()),
        column: 4,
        eq: None,
        ne: None,
        gt: Some("500".to_string()),
        gte: None,
        lt: None,
        lte: None,
        re: None,
        ignore_case: false,
        exclude: false,
        no_infer: false,
    };

    let mut group = c.benchmark_group("commands");
    group.bench_function("sort_date_then_amount", |b| {
        b.iter_batched(
            || (),
            |_| sort::execute(&sort_args, &config).expect("sort"),
            BatchSize::SmallInput,
        );
    });
    group.bench_function("filter_amount_gt", |b| {
        b.iter_batched(
            || (),
            |_| filter::execute(&filter_args, &config).expect("filter"),
            BatchSize::SmallInput,
        );
    });
    group.finish();
    drop(temp_dir);
}

criterion_group!(benches, bench_inference, bench_commands);
criterion_main!(benches);
