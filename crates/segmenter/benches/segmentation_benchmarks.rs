//! Segmentation performance benchmarks.
//!
//! Measures rule evaluation across dataset sizes and rule counts, plus
//! workbook export.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use segmenter::{Dataset, Rule, RuleRegistry, SegmentationEngine, Value, WorkbookExporter};

const DEPARTMENTS: [&str; 5] = ["Sales", "Eng", "HR", "Ops", "Legal"];

/// Generate a synthetic dataset with score, age and department columns.
fn generate_dataset(rows: usize) -> Dataset {
    let data = (0..rows)
        .map(|row| {
            vec![
                Value::Number((row % 100) as f64),
                Value::Number(20.0 + (row % 45) as f64),
                Value::from(DEPARTMENTS[row % DEPARTMENTS.len()]),
            ]
        })
        .collect();

    Dataset::new(
        vec!["score".to_string(), "age".to_string(), "dept".to_string()],
        data,
    )
    .unwrap()
}

/// Generate rules mixing numeric and categorical constraints.
fn generate_rules(count: usize) -> RuleRegistry {
    (0..count)
        .map(|i| {
            let lo = (i * 7 % 80) as f64;
            Rule::builder(format!("Rule {}", i + 1))
                .range("score", lo, lo + 20.0)
                .range("age", 25.0, 55.0)
                .include("dept", [DEPARTMENTS[i % DEPARTMENTS.len()], "Ops"])
                .build()
                .unwrap()
        })
        .collect()
}

/// Benchmark segmentation for growing datasets.
fn bench_segment_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_rows");
    let rules = generate_rules(5);
    let engine = SegmentationEngine::new();

    for rows in [1_000, 10_000, 100_000].iter() {
        let dataset = generate_dataset(*rows);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &dataset, |b, dataset| {
            b.iter(|| black_box(engine.segment(dataset, &rules).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark segmentation for growing rule counts.
fn bench_segment_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_rules");
    let dataset = generate_dataset(10_000);
    let engine = SegmentationEngine::new();

    for count in [1, 10, 50].iter() {
        let rules = generate_rules(*count);

        group.bench_with_input(BenchmarkId::new("rules", count), &rules, |b, rules| {
            b.iter(|| black_box(engine.segment(&dataset, rules).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark writing the segmented workbook to memory.
fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_workbook");
    group.sample_size(10);

    let dataset = generate_dataset(10_000);
    let rules = generate_rules(5);
    let run = SegmentationEngine::new().segment(&dataset, &rules).unwrap();
    let exporter = WorkbookExporter::new();

    group.bench_function("rows_10000", |b| {
        b.iter(|| black_box(exporter.to_bytes(&dataset, &run).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_segment_rows, bench_segment_rules, bench_export);
criterion_main!(benches);
