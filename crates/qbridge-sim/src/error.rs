//! Error types for the simulation engine.

use thiserror::Error;

/// Errors raised while building or running a program.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// An operation references a qubit outside the register.
    #[error("Operation '{op}' references qubit {qubit} but the register has {n_qubits} qubits")]
    QubitOutOfRange {
        /// Operation name.
        op: &'static str,
        /// The offending qubit index.
        qubit: usize,
        /// Register size.
        n_qubits: usize,
    },

    /// An operation uses the same qubit twice.
    #[error("Operation '{op}' uses qubit {qubit} more than once")]
    DuplicateQubit {
        /// Operation name.
        op: &'static str,
        /// The repeated qubit index.
        qubit: usize,
    },

    /// The register would not fit in memory.
    #[error("{kind} register of {requested} qubits exceeds the limit of {max}")]
    TooManyQubits {
        /// Register kind.
        kind: &'static str,
        /// Requested size.
        requested: usize,
        /// Largest supported size.
        max: usize,
    },

    /// A rotation angle is NaN or infinite.
    #[error("Operation '{op}' has non-finite angle {angle}")]
    NonFiniteAngle {
        /// Operation name.
        op: &'static str,
        /// The offending angle.
        angle: f64,
    },

    /// A matrix passed as a unitary is not unitary.
    #[error("Matrix is not unitary (deviation {0:e})")]
    NotUnitary(f64),

    /// A program was run on a register of a different size.
    #[error("Program declares {program} qubits but the register has {register}")]
    QubitCountMismatch {
        /// Qubits declared by the program.
        program: usize,
        /// Qubits in the register.
        register: usize,
    },
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
