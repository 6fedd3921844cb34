//! # Circuit Benchmarks
//!
//! Measures gate application, full circuit simulation and measurement sampling
//! as the register grows. Gate cost is O(2^n) per gate.
//!
//! Run: `cargo bench --bench circuit_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qnh_quantum::{CircuitExecutor, Gate, GateSpec, QuantumEngine, Sampler, StateVector};

fn layered_circuit(num_qubits: usize, layers: usize) -> Vec<Gate> {
    let mut gates = Vec::with_capacity(layers * num_qubits * 2);
    for layer in 0..layers {
        for q in 0..num_qubits {
            gates.push(Gate::ry(q, 0.1 * (layer + q + 1) as f64));
        }
        for q in 0..num_qubits.saturating_sub(1) {
            gates.push(Gate::cnot(q, q + 1));
        }
    }
    gates
}

/// Benchmark single gate application
fn bench_gate_application(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_application");
    let exec = CircuitExecutor::default();

    for n in [4usize, 8, 12, 16] {
        let state = StateVector::new(n, 20).unwrap();
        group.throughput(Throughput::Elements(1 << n));

        group.bench_with_input(BenchmarkId::new("hadamard", n), &state, |b, s| {
            b.iter(|| {
                let mut state = s.clone();
                exec.apply(&mut state, &Gate::h(n / 2)).unwrap();
                black_box(state)
            })
        });

        group.bench_with_input(BenchmarkId::new("cnot", n), &state, |b, s| {
            b.iter(|| {
                let mut state = s.clone();
                exec.apply(&mut state, &Gate::cnot(0, n - 1)).unwrap();
                black_box(state)
            })
        });
    }

    group.finish();
}

/// Benchmark full circuit simulation
fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation");
    let exec = CircuitExecutor::default();

    for n in [4usize, 8, 12] {
        let gates = layered_circuit(n, 4);
        group.bench_with_input(BenchmarkId::new("layered", n), &gates, |b, g| {
            b.iter(|| black_box(exec.simulate(n, g).unwrap()))
        });
    }

    let engine = QuantumEngine::new();
    let specs: Vec<GateSpec> = layered_circuit(8, 4).iter().map(Gate::to_spec).collect();
    group.bench_function("engine_report_8q", |b| {
        b.iter(|| black_box(engine.simulate_circuit(8, &specs).unwrap()))
    });

    group.finish();
}

/// Benchmark measurement sampling
fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    let exec = CircuitExecutor::default();

    for n in [4usize, 10, 16] {
        let state = exec.simulate(n, &layered_circuit(n, 2)).unwrap().state;

        group.bench_with_input(BenchmarkId::new("single", n), &state, |b, s| {
            let mut sampler = Sampler::from_seed(7);
            b.iter(|| black_box(sampler.measure(s).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("counts_1000", n), &state, |b, s| {
            let mut sampler = Sampler::from_seed(7);
            b.iter(|| black_box(sampler.counts(s, 1000).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gate_application, bench_simulation, bench_sampling);

criterion_main!(benches);
