use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use data_driven_input::ingestion::delimited::{DelimitedOptions, DelimitedReader};
use data_driven_input::ingestion::table::{TableOptions, TableReader};
use data_driven_input::DataLookup;

fn pipe_input(rows: usize) -> String {
    (0..rows)
        .map(|i| format!("case_{i}|user_{i}|secret_{i}|expected_{i}\n"))
        .collect()
}

fn bench_delimited(c: &mut Criterion) {
    let mut group = c.benchmark_group("delimited");
    for rows in [100usize, 10_000] {
        let input = pipe_input(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &input, |b, input| {
            b.iter(|| {
                let r = DelimitedReader::from_reader(input.as_bytes(), "bench", &DelimitedOptions::pipe()).unwrap();
                black_box(r.find_value("case_0", 2));
            })
        });
    }
    group.finish();
}

fn bench_table(c: &mut Criterion) {
    let mut table: Vec<Vec<String>> = vec![vec!["id".into(), "user".into(), "alias".into()]];
    table.extend((0..10_000).map(|i| vec![format!("{i}"), format!("user_{i}"), format!("alias_{i}")]));

    c.bench_function("table/10000", |b| {
        b.iter(|| {
            let r = TableReader::from_table(&table, "alias", &TableOptions::default()).unwrap();
            black_box(r.has_data_id("alias_9999"));
        })
    });
}

criterion_group!(benches, bench_delimited, bench_table);
criterion_main!(benches);
