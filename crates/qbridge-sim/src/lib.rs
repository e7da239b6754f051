//! qbridge simulation engine
//!
//! An exact simulator for small registers. A [`Program`] of native
//! [`Operation`]s is applied to a [`Register`] holding either a pure state
//! vector or a density matrix.
//!
//! # Memory
//!
//! | Qubits | State vector | Density matrix |
//! |--------|--------------|----------------|
//! | 10 | 16 KiB | 16 MiB |
//! | 13 | 128 KiB | 1 GiB |
//! | 20 | 16 MiB | - |
//! | 26 | 1 GiB | - |
//!
//! # Example
//!
//! ```rust
//! use qbridge_sim::{Operation, Program, RegisterKind};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut program = Program::new(2);
//! program.push(Operation::hadamard(0)).unwrap();
//! program.push(Operation::controlled_not(0, 1)).unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let (register, _) = program.execute(RegisterKind::StateVector, &mut rng).unwrap();
//! let probs = register.probabilities();
//! assert!((probs[0b00] - 0.5).abs() < 1e-12);
//! assert!((probs[0b11] - 0.5).abs() < 1e-12);
//! ```

pub mod error;
pub mod operation;
pub mod program;
pub mod register;

pub use error::{SimError, SimResult};
pub use operation::{Matrix2, Operation};
pub use program::{MeasurementOutcome, Program};
pub use register::{
    MAX_DENSITY_MATRIX_QUBITS, MAX_STATE_VECTOR_QUBITS, Register, RegisterKind, RegisterState,
};
