use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quoted_csv::{escape_field, parse, to_line, CsvOptions, OpenMode, Reader, Record, Writer};

fn sample_record(i: usize, options: &CsvOptions) -> Record {
    Record::from(vec![
        format!("A{:04}", i),
        escape_field(&format!("Item \"{}\", special", i), options),
        (i % 50).to_string(),
        if i % 2 == 0 { "Yes" } else { "No" }.to_string(),
    ])
}

fn benchmark_parse_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_line");

    let plain = "A0001,Train with 0 Carriage,12,No";
    let escaped = "\"A0001\",\"Item \"\"A\"\", special\",5,No";

    group.bench_function("plain", |b| b.iter(|| parse(black_box(plain), true)));
    group.bench_function("escaped_unescape", |b| {
        b.iter(|| parse(black_box(escaped), true))
    });
    group.bench_function("escaped_raw", |b| b.iter(|| parse(black_box(escaped), false)));

    group.finish();
}

fn benchmark_wide_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_line");
    let options = CsvOptions::default();

    for width in [10, 100, 1000].iter() {
        let record: Record = (0..*width)
            .map(|i| escape_field(&format!("value, {}", i), &options))
            .collect();
        let line = to_line(&record, &options);

        group.bench_with_input(BenchmarkId::from_parameter(width), &line, |b, line| {
            b.iter(|| parse(black_box(line), true))
        });
    }

    group.finish();
}

fn benchmark_read_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_file");
    let options = CsvOptions::default();

    for size in [100, 1000].iter() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut writer = Writer::new(file.path(), OpenMode::Create).unwrap();
        writer
            .write_records((0..*size).map(|i| sample_record(i, &options)))
            .unwrap();
        writer.close().unwrap();

        group.bench_with_input(BenchmarkId::new("count", size), size, |b, _| {
            b.iter(|| Reader::new(black_box(file.path()), OpenMode::Open, false).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("iterate", size), size, |b, _| {
            let mut reader = Reader::new(file.path(), OpenMode::Open, false).unwrap();
            b.iter(|| reader.data_records(true).filter(Result::is_ok).count())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parse_line,
    benchmark_wide_line,
    benchmark_read_file
);
criterion_main!(benches);
