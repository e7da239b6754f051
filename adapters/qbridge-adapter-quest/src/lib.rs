//! qbridge backend for the QuEST-style simulator.
//!
//! This crate lets circuits built with `qbridge-ir` run on the exact
//! simulator in `qbridge-sim`, through the [`Backend`] trait.
//!
//! ```text
//!   Circuit ──→ valid_check ──→ circuit_to_program ──→ Program::execute ──→ BackendResult
//!               (predicates)     (gate tables)          (state or ρ)         (stored by handle)
//! ```
//!
//! # Result types
//!
//! | `result_type` | Output | Max qubits |
//! |---------------|--------|------------|
//! | `state_vector` (default) | `2^n` amplitudes | 26 |
//! | `density_matrix` | `2^n × 2^n` matrix | 13 |
//!
//! # Example
//!
//! ```rust
//! use qbridge_adapter_quest::QuestBackend;
//! use qbridge_hal::{Backend, BasisOrder, StatusKind, SubmitOptions};
//! use qbridge_ir::Circuit;
//!
//! let backend = QuestBackend::new();
//! let circuit = backend.get_compiled_circuit(&Circuit::bell().unwrap(), 1).unwrap();
//!
//! let handle = backend.process_circuit(&circuit, &SubmitOptions::new()).unwrap();
//! assert_eq!(backend.circuit_status(&handle).unwrap().status, StatusKind::Completed);
//!
//! let probs = backend.get_result(&handle).unwrap().probabilities(BasisOrder::Ilo).unwrap();
//! assert!((probs[0b00] - 0.5).abs() < 1e-9);
//! assert!((probs[0b11] - 0.5).abs() < 1e-9);
//! ```

pub mod backend;
pub mod convert;
pub mod error;

pub use backend::{DEFAULT_NAME, MAX_OPTIMISATION_LEVEL, QuestBackend};
pub use error::{QuestError, QuestResult};

// Re-export key HAL types for convenience.
pub use qbridge_hal::{Backend, BackendConfig, BackendFactory};
