//! Quantum registers: a pure state vector or a density matrix.
//!
//! Basis states are indexed little-endian: qubit `k` is bit `k` of the
//! index, so qubit 0 is the least significant bit.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut1};
use num_complex::Complex64;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::operation::{Matrix2, Operation};

/// Largest state-vector register (16 bytes × 2^26 = 1 GiB).
pub const MAX_STATE_VECTOR_QUBITS: usize = 26;

/// Largest density-matrix register (16 bytes × 4^13 = 1 GiB).
pub const MAX_DENSITY_MATRIX_QUBITS: usize = 13;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// How a register stores its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterKind {
    /// `2^n` amplitudes.
    StateVector,
    /// `2^n × 2^n` density matrix.
    DensityMatrix,
}

impl RegisterKind {
    /// Largest register of this kind.
    pub fn max_qubits(self) -> usize {
        match self {
            RegisterKind::StateVector => MAX_STATE_VECTOR_QUBITS,
            RegisterKind::DensityMatrix => MAX_DENSITY_MATRIX_QUBITS,
        }
    }

    fn label(self) -> &'static str {
        match self {
            RegisterKind::StateVector => "state-vector",
            RegisterKind::DensityMatrix => "density-matrix",
        }
    }
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The contents of a register.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterState {
    /// Pure state amplitudes.
    StateVector(Array1<Complex64>),
    /// Mixed state.
    DensityMatrix(Array2<Complex64>),
}

/// A simulated quantum register.
#[derive(Debug, Clone)]
pub struct Register {
    num_qubits: usize,
    state: RegisterState,
}

impl Register {
    /// Allocate a register in `|0…0⟩`.
    pub fn new(kind: RegisterKind, num_qubits: usize) -> SimResult<Self> {
        if num_qubits > kind.max_qubits() {
            return Err(SimError::TooManyQubits {
                kind: kind.label(),
                requested: num_qubits,
                max: kind.max_qubits(),
            });
        }
        let dim = 1usize << num_qubits;
        let state = match kind {
            RegisterKind::StateVector => {
                let mut amps = Array1::from_elem(dim, ZERO);
                amps[0] = ONE;
                RegisterState::StateVector(amps)
            }
            RegisterKind::DensityMatrix => {
                let mut rho = Array2::from_elem((dim, dim), ZERO);
                rho[[0, 0]] = ONE;
                RegisterState::DensityMatrix(rho)
            }
        };
        debug!("Allocated {kind} register with {num_qubits} qubits");
        Ok(Self { num_qubits, state })
    }

    /// Shorthand for a state-vector register.
    pub fn state_vector(num_qubits: usize) -> SimResult<Self> {
        Self::new(RegisterKind::StateVector, num_qubits)
    }

    /// Shorthand for a density-matrix register.
    pub fn density_matrix(num_qubits: usize) -> SimResult<Self> {
        Self::new(RegisterKind::DensityMatrix, num_qubits)
    }

    /// Storage kind.
    pub fn kind(&self) -> RegisterKind {
        match self.state {
            RegisterState::StateVector(_) => RegisterKind::StateVector,
            RegisterState::DensityMatrix(_) => RegisterKind::DensityMatrix,
        }
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The register contents.
    pub fn state(&self) -> &RegisterState {
        &self.state
    }

    /// Take the contents out of the register.
    pub fn into_state(self) -> RegisterState {
        self.state
    }

    /// Amplitudes, if this is a state-vector register.
    pub fn amplitudes(&self) -> Option<ArrayView1<'_, Complex64>> {
        match &self.state {
            RegisterState::StateVector(amps) => Some(amps.view()),
            RegisterState::DensityMatrix(_) => None,
        }
    }

    /// Density matrix, if this is a density-matrix register.
    pub fn density(&self) -> Option<ArrayView2<'_, Complex64>> {
        match &self.state {
            RegisterState::StateVector(_) => None,
            RegisterState::DensityMatrix(rho) => Some(rho.view()),
        }
    }

    /// Probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        match &self.state {
            RegisterState::StateVector(amps) => amps.iter().map(Complex64::norm_sqr).collect(),
            RegisterState::DensityMatrix(rho) => rho.diag().iter().map(|z| z.re).collect(),
        }
    }

    /// Norm squared of the state vector, or trace of the density matrix.
    pub fn total_probability(&self) -> f64 {
        self.probabilities().iter().sum()
    }

    /// Probability that measuring `qubit` yields `outcome`.
    pub fn prob_of_outcome(&self, qubit: usize, outcome: bool) -> SimResult<f64> {
        Operation::measure(qubit).check(self.num_qubits)?;
        let mask = 1usize << qubit;
        Ok(self
            .probabilities()
            .iter()
            .enumerate()
            .filter(|(i, _)| (i & mask != 0) == outcome)
            .map(|(_, p)| p)
            .sum())
    }

    /// Multiply the state by `e^{iφ}`. A density matrix is unchanged.
    pub fn apply_global_phase(&mut self, phi: f64) {
        if let RegisterState::StateVector(amps) = &mut self.state {
            let phase = Complex64::from_polar(1.0, phi);
            amps.mapv_inplace(|a| a * phase);
        }
    }

    /// Apply one operation. Returns the outcome for a measurement.
    pub fn apply<R: Rng + ?Sized>(&mut self, op: &Operation, rng: &mut R) -> SimResult<Option<bool>> {
        op.check(self.num_qubits)?;
        match op {
            Operation::Unitary {
                target,
                controls,
                matrix,
                ..
            } => {
                let control_mask = controls.iter().fold(0usize, |m, c| m | (1 << c));
                self.apply_unitary(*target, control_mask, matrix);
                Ok(None)
            }
            Operation::Swap { qubits: [a, b] } => {
                self.apply_swap(*a, *b);
                Ok(None)
            }
            Operation::Measure { qubit } => Ok(Some(self.measure(*qubit, rng))),
        }
    }

    fn apply_unitary(&mut self, target: usize, control_mask: usize, m: &Matrix2) {
        match &mut self.state {
            RegisterState::StateVector(amps) => apply_2x2(amps.view_mut(), target, control_mask, m),
            RegisterState::DensityMatrix(rho) => {
                // ρ → U ρ U†: U on every column, conj(U) on every row.
                for column in rho.columns_mut() {
                    apply_2x2(column, target, control_mask, m);
                }
                let conj = [[m[0][0].conj(), m[0][1].conj()], [m[1][0].conj(), m[1][1].conj()]];
                for row in rho.rows_mut() {
                    apply_2x2(row, target, control_mask, &conj);
                }
            }
        }
    }

    fn apply_swap(&mut self, a: usize, b: usize) {
        match &mut self.state {
            RegisterState::StateVector(amps) => swap_bits(amps.view_mut(), a, b),
            RegisterState::DensityMatrix(rho) => {
                for column in rho.columns_mut() {
                    swap_bits(column, a, b);
                }
                for row in rho.rows_mut() {
                    swap_bits(row, a, b);
                }
            }
        }
    }

    /// Sample `qubit`, collapse the register onto the outcome and renormalise.
    fn measure<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> bool {
        let mask = 1usize << qubit;
        let p_one: f64 = self
            .probabilities()
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, p)| p)
            .sum();
        let r: f64 = rng.r#gen();
        let outcome = r < p_one;
        let p = if outcome { p_one } else { 1.0 - p_one };
        let keep = |i: usize| (i & mask != 0) == outcome;

        match &mut self.state {
            RegisterState::StateVector(amps) => {
                let norm = p.sqrt();
                for (i, a) in amps.iter_mut().enumerate() {
                    *a = if keep(i) { *a / norm } else { ZERO };
                }
            }
            RegisterState::DensityMatrix(rho) => {
                for ((i, j), z) in rho.indexed_iter_mut() {
                    *z = if keep(i) && keep(j) { *z / p } else { ZERO };
                }
            }
        }
        debug!("Measured qubit {qubit}: {} (p = {p:.6})", u8::from(outcome));
        outcome
    }
}

/// Apply `m` to bit `target` of every index whose control bits are all set.
fn apply_2x2(mut amps: ArrayViewMut1<'_, Complex64>, target: usize, control_mask: usize, m: &Matrix2) {
    let target_mask = 1usize << target;
    for i in 0..amps.len() {
        if i & target_mask == 0 && i & control_mask == control_mask {
            let j = i | target_mask;
            let a = amps[i];
            let b = amps[j];
            amps[i] = m[0][0] * a + m[0][1] * b;
            amps[j] = m[1][0] * a + m[1][1] * b;
        }
    }
}

fn swap_bits(mut amps: ArrayViewMut1<'_, Complex64>, a: usize, b: usize) {
    let mask_a = 1usize << a;
    let mask_b = 1usize << b;
    for i in 0..amps.len() {
        if i & mask_a != 0 && i & mask_b == 0 {
            let j = (i & !mask_a) | mask_b;
            amps.swap(i, j);
        }
    }
}
