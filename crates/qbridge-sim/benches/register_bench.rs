//! Benchmarks for the simulation engine
//!
//! Run with: cargo bench -p qbridge-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qbridge_sim::{Operation, Program, RegisterKind};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Layered circuit: Hadamards, a CNOT ladder and a rotation per qubit.
fn layered_program(num_qubits: usize, layers: usize) -> Program {
    let mut program = Program::new(num_qubits);
    for layer in 0..layers {
        for q in 0..num_qubits {
            program.push(Operation::hadamard(q)).unwrap();
        }
        for q in 1..num_qubits {
            program.push(Operation::controlled_not(q - 1, q)).unwrap();
        }
        for q in 0..num_qubits {
            program.push(Operation::rotate_z(q, 0.1 * (layer + q) as f64).unwrap()).unwrap();
        }
    }
    program
}

fn bench_state_vector(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_vector");

    for num_qubits in &[4, 8, 12, 16] {
        let program = layered_program(*num_qubits, 4);
        group.bench_with_input(BenchmarkId::new("layered", num_qubits), &program, |b, program| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| program.execute(black_box(RegisterKind::StateVector), &mut rng).unwrap());
        });
    }

    group.finish();
}

fn bench_density_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("density_matrix");

    for num_qubits in &[2, 4, 6, 8] {
        let program = layered_program(*num_qubits, 4);
        group.bench_with_input(BenchmarkId::new("layered", num_qubits), &program, |b, program| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| program.execute(black_box(RegisterKind::DensityMatrix), &mut rng).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_state_vector, bench_density_matrix);
criterion_main!(benches);
