//! Native operations understood by the engine.

use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

use crate::error::{SimError, SimResult};

/// A 2×2 complex matrix in row-major order.
pub type Matrix2 = [[Complex64; 2]; 2];

/// Tolerance for the unitarity check on user-supplied matrices.
pub const UNITARITY_TOLERANCE: f64 = 1e-9;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// One step of a [`Program`](crate::Program).
///
/// Operations are built with the constructors below; angles are checked
/// for finiteness at construction, qubit indices when the operation is
/// added to a program or applied to a register.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// A 2×2 unitary on `target`, applied only where every control is `|1⟩`.
    Unitary {
        /// Name for diagnostics.
        name: &'static str,
        /// Target qubit.
        target: usize,
        /// Control qubits.
        controls: Vec<usize>,
        /// The matrix applied to the target.
        matrix: Matrix2,
    },
    /// Exchange two qubits.
    Swap {
        /// The exchanged qubits.
        qubits: [usize; 2],
    },
    /// Projective Z-basis measurement.
    Measure {
        /// Measured qubit.
        qubit: usize,
    },
}

fn finite(op: &'static str, angle: f64) -> SimResult<f64> {
    if angle.is_finite() {
        Ok(angle)
    } else {
        Err(SimError::NonFiniteAngle { op, angle })
    }
}

fn gate(name: &'static str, target: usize, matrix: Matrix2) -> Operation {
    Operation::Unitary {
        name,
        target,
        controls: vec![],
        matrix,
    }
}

fn controlled(name: &'static str, control: usize, target: usize, matrix: Matrix2) -> Operation {
    Operation::Unitary {
        name,
        target,
        controls: vec![control],
        matrix,
    }
}

fn phase_matrix(theta: f64) -> Matrix2 {
    [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, theta)]]
}

fn rx_matrix(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [[Complex64::new(c, 0.0), Complex64::new(0.0, -s)], [Complex64::new(0.0, -s), Complex64::new(c, 0.0)]]
}

fn ry_matrix(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [[Complex64::new(c, 0.0), Complex64::new(-s, 0.0)], [Complex64::new(s, 0.0), Complex64::new(c, 0.0)]]
}

fn rz_matrix(theta: f64) -> Matrix2 {
    [
        [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
        [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
    ]
}

/// Largest entry of `U·U† - I`.
fn unitarity_deviation(m: &Matrix2) -> f64 {
    let mut worst: f64 = 0.0;
    for i in 0..2 {
        for j in 0..2 {
            let dot = m[i][0] * m[j][0].conj() + m[i][1] * m[j][1].conj();
            let expected = if i == j { ONE } else { ZERO };
            let d = (dot - expected).norm();
            if !d.is_finite() {
                return f64::INFINITY;
            }
            worst = worst.max(d);
        }
    }
    worst
}

fn checked_unitary(matrix: Matrix2) -> SimResult<Matrix2> {
    let deviation = unitarity_deviation(&matrix);
    if deviation < UNITARITY_TOLERANCE {
        Ok(matrix)
    } else {
        Err(SimError::NotUnitary(deviation))
    }
}

impl Operation {
    /// Hadamard.
    pub fn hadamard(target: usize) -> Self {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        gate("hadamard", target, [[h, h], [h, -h]])
    }

    /// Pauli X.
    pub fn pauli_x(target: usize) -> Self {
        gate("pauli_x", target, [[ZERO, ONE], [ONE, ZERO]])
    }

    /// Pauli Y.
    pub fn pauli_y(target: usize) -> Self {
        gate("pauli_y", target, [[ZERO, -I], [I, ZERO]])
    }

    /// Pauli Z.
    pub fn pauli_z(target: usize) -> Self {
        gate("pauli_z", target, [[ONE, ZERO], [ZERO, -ONE]])
    }

    /// `diag(1, i)`.
    pub fn s_gate(target: usize) -> Self {
        gate("s_gate", target, phase_matrix(FRAC_PI_2))
    }

    /// `diag(1, e^{iπ/4})`.
    pub fn t_gate(target: usize) -> Self {
        gate("t_gate", target, phase_matrix(FRAC_PI_4))
    }

    /// `diag(1, e^{iθ})`.
    pub fn phase_shift(target: usize, theta: f64) -> SimResult<Self> {
        Ok(gate("phase_shift", target, phase_matrix(finite("phase_shift", theta)?)))
    }

    /// `exp(-iθX/2)`.
    pub fn rotate_x(target: usize, theta: f64) -> SimResult<Self> {
        Ok(gate("rotate_x", target, rx_matrix(finite("rotate_x", theta)?)))
    }

    /// `exp(-iθY/2)`.
    pub fn rotate_y(target: usize, theta: f64) -> SimResult<Self> {
        Ok(gate("rotate_y", target, ry_matrix(finite("rotate_y", theta)?)))
    }

    /// `exp(-iθZ/2)`.
    pub fn rotate_z(target: usize, theta: f64) -> SimResult<Self> {
        Ok(gate("rotate_z", target, rz_matrix(finite("rotate_z", theta)?)))
    }

    /// `[[α, -β*], [β, α*]]` with `|α|² + |β|² = 1`.
    pub fn compact_unitary(target: usize, alpha: Complex64, beta: Complex64) -> SimResult<Self> {
        let deviation = (alpha.norm_sqr() + beta.norm_sqr() - 1.0).abs();
        if !(deviation < UNITARITY_TOLERANCE) {
            return Err(SimError::NotUnitary(deviation));
        }
        Ok(gate("compact_unitary", target, [[alpha, -beta.conj()], [beta, alpha.conj()]]))
    }

    /// An arbitrary single-qubit unitary.
    pub fn unitary(target: usize, matrix: Matrix2) -> SimResult<Self> {
        Ok(gate("unitary", target, checked_unitary(matrix)?))
    }

    /// CNOT.
    pub fn controlled_not(control: usize, target: usize) -> Self {
        controlled("controlled_not", control, target, [[ZERO, ONE], [ONE, ZERO]])
    }

    /// Controlled Pauli Y.
    pub fn controlled_pauli_y(control: usize, target: usize) -> Self {
        controlled("controlled_pauli_y", control, target, [[ZERO, -I], [I, ZERO]])
    }

    /// Controlled Z.
    pub fn controlled_phase_flip(control: usize, target: usize) -> Self {
        controlled("controlled_phase_flip", control, target, [[ONE, ZERO], [ZERO, -ONE]])
    }

    /// Controlled `diag(1, e^{iθ})`.
    pub fn controlled_phase_shift(control: usize, target: usize, theta: f64) -> SimResult<Self> {
        let theta = finite("controlled_phase_shift", theta)?;
        Ok(controlled("controlled_phase_shift", control, target, phase_matrix(theta)))
    }

    /// Controlled `exp(-iθX/2)`.
    pub fn controlled_rotate_x(control: usize, target: usize, theta: f64) -> SimResult<Self> {
        let theta = finite("controlled_rotate_x", theta)?;
        Ok(controlled("controlled_rotate_x", control, target, rx_matrix(theta)))
    }

    /// Controlled `exp(-iθY/2)`.
    pub fn controlled_rotate_y(control: usize, target: usize, theta: f64) -> SimResult<Self> {
        let theta = finite("controlled_rotate_y", theta)?;
        Ok(controlled("controlled_rotate_y", control, target, ry_matrix(theta)))
    }

    /// Controlled `exp(-iθZ/2)`.
    pub fn controlled_rotate_z(control: usize, target: usize, theta: f64) -> SimResult<Self> {
        let theta = finite("controlled_rotate_z", theta)?;
        Ok(controlled("controlled_rotate_z", control, target, rz_matrix(theta)))
    }

    /// Controlled arbitrary single-qubit unitary.
    pub fn controlled_unitary(control: usize, target: usize, matrix: Matrix2) -> SimResult<Self> {
        Ok(controlled("controlled_unitary", control, target, checked_unitary(matrix)?))
    }

    /// SWAP.
    pub fn swap(a: usize, b: usize) -> Self {
        Operation::Swap { qubits: [a, b] }
    }

    /// Z-basis measurement.
    pub fn measure(qubit: usize) -> Self {
        Operation::Measure { qubit }
    }

    /// Name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Unitary { name, .. } => *name,
            Operation::Swap { .. } => "swap",
            Operation::Measure { .. } => "measure",
        }
    }

    /// Every qubit the operation touches, controls first.
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Operation::Unitary { target, controls, .. } => {
                controls.iter().copied().chain(std::iter::once(*target)).collect()
            }
            Operation::Swap { qubits } => qubits.to_vec(),
            Operation::Measure { qubit } => vec![*qubit],
        }
    }

    /// True for [`Operation::Measure`].
    pub fn is_measurement(&self) -> bool {
        matches!(self, Operation::Measure { .. })
    }

    /// Check indices against a register of `n_qubits`.
    pub fn check(&self, n_qubits: usize) -> SimResult<()> {
        let qubits = self.qubits();
        for (i, &qubit) in qubits.iter().enumerate() {
            if qubit >= n_qubits {
                return Err(SimError::QubitOutOfRange {
                    op: self.name(),
                    qubit,
                    n_qubits,
                });
            }
            if qubits[..i].contains(&qubit) {
                return Err(SimError::DuplicateQubit { op: self.name(), qubit });
            }
        }
        Ok(())
    }
}
