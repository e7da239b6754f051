//! Property tests tying the two register kinds together.
//!
//! Running the same unitary program on a density matrix must give
//! `|ψ⟩⟨ψ|` for the state vector `|ψ⟩` it produces.

use num_complex::Complex64;
use proptest::prelude::*;
use qbridge_sim::{Operation, Program, RegisterKind};
use rand::SeedableRng;
use rand::rngs::StdRng;

const N: usize = 3;

fn arb_operation() -> impl Strategy<Value = Operation> {
    let qubit = 0..N;
    let pair = (0..N, 1..N).prop_map(|(a, d)| (a, (a + d) % N));
    let angle = -6.0..6.0f64;
    prop_oneof![
        qubit.clone().prop_map(Operation::hadamard),
        qubit.clone().prop_map(Operation::pauli_y),
        qubit.clone().prop_map(Operation::t_gate),
        (qubit.clone(), angle.clone()).prop_map(|(q, t)| Operation::rotate_x(q, t).unwrap()),
        (qubit, angle.clone()).prop_map(|(q, t)| Operation::rotate_z(q, t).unwrap()),
        pair.clone().prop_map(|(c, t)| Operation::controlled_not(c, t)),
        pair.clone().prop_map(|(c, t)| Operation::controlled_pauli_y(c, t)),
        (pair.clone(), angle).prop_map(|((c, t), a)| Operation::controlled_rotate_y(c, t, a).unwrap()),
        pair.prop_map(|(a, b)| Operation::swap(a, b)),
    ]
}

fn arb_program() -> impl Strategy<Value = Program> {
    prop::collection::vec(arb_operation(), 0..24).prop_map(|ops| {
        let mut program = Program::new(N);
        for op in ops {
            program.push(op).unwrap();
        }
        program
    })
}

proptest! {
    #[test]
    fn prop_density_matrix_matches_pure_state(program in arb_program()) {
        let mut rng = StdRng::seed_from_u64(0);
        let (pure, _) = program.execute(RegisterKind::StateVector, &mut rng).unwrap();
        let (mixed, _) = program.execute(RegisterKind::DensityMatrix, &mut rng).unwrap();

        let psi = pure.amplitudes().unwrap();
        let rho = mixed.density().unwrap();
        for i in 0..psi.len() {
            for j in 0..psi.len() {
                let expected: Complex64 = psi[i] * psi[j].conj();
                prop_assert!((rho[[i, j]] - expected).norm() < 1e-9);
            }
        }
    }

    #[test]
    fn prop_unitaries_preserve_norm(program in arb_program()) {
        let mut rng = StdRng::seed_from_u64(0);
        for kind in [RegisterKind::StateVector, RegisterKind::DensityMatrix] {
            let (register, _) = program.execute(kind, &mut rng).unwrap();
            prop_assert!((register.total_probability() - 1.0).abs() < 1e-9);
        }
    }
}
