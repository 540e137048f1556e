//! Session operation benchmarks.
//!
//! Measures the row-level operations and the analysis operations over
//! synthetic datasets of growing size.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tablewright::{
    AggregateFunction, Dataset, FilterOperator, Formula, NumericFormula, NumericFunction, Record, Session,
};

const REGIONS: &[&str] = &["North", "South", "East", "West", ""];
const PRODUCTS: &[&str] = &["Widget", "Gadget", "gizmo", "Doohickey"];

/// Generate a sales-like dataset with repeated keys and some blank cells.
fn generate_dataset(rows: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(42);
    (0..rows)
        .map(|i| {
            let amount = if rng.gen_bool(0.05) {
                String::new()
            } else {
                format!("{:.2}", rng.gen_range(0.0..500.0))
            };
            Record::new()
                .with("id", i)
                .with("region", REGIONS[rng.gen_range(0..REGIONS.len())])
                .with("product", PRODUCTS[rng.gen_range(0..PRODUCTS.len())])
                .with("amount", tablewright::Value::infer(&amount))
                .with("qty", rng.gen_range(1i64..20))
        })
        .collect()
}

fn loaded(data: &Dataset) -> Session {
    let mut session = Session::new();
    session.load(data.clone());
    session
}

fn bench_row_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_operations");

    for rows in [1_000, 10_000].iter() {
        let data = generate_dataset(*rows);
        group.throughput(Throughput::Elements(*rows as u64));

        group.bench_with_input(BenchmarkId::new("filter", rows), &data, |b, data| {
            b.iter_with_setup(
                || loaded(data),
                |mut session| {
                    black_box(session.filter("product", &FilterOperator::Contains, "g").unwrap())
                },
            )
        });

        group.bench_with_input(BenchmarkId::new("sort", rows), &data, |b, data| {
            b.iter_with_setup(
                || loaded(data),
                |mut session| black_box(session.sort("amount").unwrap()),
            )
        });

        group.bench_with_input(BenchmarkId::new("dedupe", rows), &data, |b, data| {
            b.iter_with_setup(
                || loaded(data),
                |mut session| black_box(session.dedupe().unwrap()),
            )
        });

        group.bench_with_input(BenchmarkId::new("hierarchy", rows), &data, |b, data| {
            let columns = vec!["region".to_string(), "product".to_string()];
            b.iter_with_setup(
                || loaded(data),
                |mut session| black_box(session.assign_hierarchy(&columns).unwrap()),
            )
        });

        group.bench_with_input(BenchmarkId::new("formula", rows), &data, |b, data| {
            let formula: Formula = NumericFormula::new(NumericFunction::Mult, "amount")
                .with_column("qty")
                .into();
            b.iter_with_setup(
                || loaded(data),
                |mut session| black_box(session.apply_formula(&formula, "total").unwrap()),
            )
        });
    }

    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");

    for rows in [1_000, 10_000].iter() {
        let data = generate_dataset(*rows);
        group.throughput(Throughput::Elements(*rows as u64));

        group.bench_with_input(BenchmarkId::new("aggregate_sum", rows), &data, |b, data| {
            b.iter_with_setup(
                || loaded(data),
                |mut session| {
                    black_box(
                        session
                            .aggregate("region", "amount", AggregateFunction::Sum)
                            .unwrap(),
                    )
                },
            )
        });

        group.bench_with_input(BenchmarkId::new("unique", rows), &data, |b, data| {
            b.iter_with_setup(
                || loaded(data),
                |mut session| black_box(session.extract_unique("amount").unwrap()),
            )
        });

        group.bench_with_input(BenchmarkId::new("transpose", rows), &data, |b, data| {
            b.iter_with_setup(
                || loaded(data),
                |mut session| black_box(session.transpose().unwrap()),
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_row_operations, bench_analysis);
criterion_main!(benches);
