//! Walk throughput for `TabularReader`.
//!
//! Generates a temporary CSV per row count and measures a full forward walk, a reset followed by
//! a walk (which includes the pre-scan), and the `rows()` iterator.

use std::fs::File;
use std::hint::black_box;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tabular_reader::TabularReader;

fn write_fixture(rows: usize) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tabular-reader-bench-{rows}.csv"));
    let mut out = BufWriter::new(File::create(&path).unwrap());
    writeln!(out, "id,name,score,note").unwrap();
    for i in 0..rows {
        writeln!(out, "{i},user_{i},{}.5,\"quoted, note {i}\"", i % 100).unwrap();
    }
    out.flush().unwrap();
    path
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");
    for rows in [1_000usize, 10_000, 100_000] {
        let path = write_fixture(rows);
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("open_and_walk", rows), &path, |b, path| {
            b.iter(|| {
                let mut reader = TabularReader::new(path, ",", true).unwrap();
                let mut seen = 0usize;
                while reader.is_valid() {
                    seen += reader.get("name").map_or(0, str::len);
                    reader.advance().unwrap();
                }
                black_box(seen)
            })
        });

        let mut reader = TabularReader::new(&path, ",", true).unwrap();
        group.bench_with_input(BenchmarkId::new("reset_and_walk", rows), &rows, |b, _| {
            b.iter(|| {
                reader.reset().unwrap();
                while reader.is_valid() {
                    black_box(reader.current());
                    reader.advance().unwrap();
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("rows_iter", rows), &rows, |b, _| {
            b.iter(|| black_box(reader.rows().unwrap().filter_map(Result::ok).count()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_walk);
criterion_main!(benches);
