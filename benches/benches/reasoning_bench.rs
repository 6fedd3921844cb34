//! # Reasoning Benchmarks
//!
//! Measures interference ranking as the option count grows.
//!
//! Run: `cargo bench --bench reasoning_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qnh_quantum::{Constraint, OptionRef, ReasoningEngine, ReasoningProblem};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn problem(options: usize, constraints: usize, rng: &mut StdRng) -> ReasoningProblem {
    (0..constraints).fold(ReasoningProblem::new("bench"), |p, i| {
        let option = rng.gen_range(0..options);
        let constraint = if i % 2 == 0 {
            Constraint::Penalize {
                option: OptionRef::Index(option),
                penalty: rng.gen_range(0.1..3.0),
            }
        } else {
            Constraint::Exclusive {
                a: OptionRef::Index(option),
                b: OptionRef::Index((option + 1) % options),
                penalty: rng.gen_range(0.1..3.0),
            }
        };
        p.with_constraint(constraint)
    })
}

/// Benchmark ranking by option count
fn bench_reasoning(c: &mut Criterion) {
    let mut group = c.benchmark_group("reasoning");
    let engine = ReasoningEngine::default();
    let mut rng = StdRng::seed_from_u64(42);

    for k in [2usize, 8, 64, 1024] {
        let options: Vec<String> = (0..k).map(|i| format!("option-{}", i)).collect();
        let weights: Vec<f64> = (0..k).map(|_| rng.gen_range(0.1..1.0)).collect();

        let plain = ReasoningProblem::new("bench");
        group.bench_with_input(BenchmarkId::new("unconstrained", k), &options, |b, o| {
            b.iter(|| black_box(engine.reason(&plain, o, Some(&weights)).unwrap()))
        });

        let constrained = problem(k, k / 2 + 1, &mut rng);
        group.bench_with_input(BenchmarkId::new("constrained", k), &options, |b, o| {
            b.iter(|| black_box(engine.reason(&constrained, o, Some(&weights)).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reasoning);

criterion_main!(benches);
