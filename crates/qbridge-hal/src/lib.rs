//! qbridge Hardware Abstraction Layer
//!
//! This crate provides the interface between the qbridge compiler crates and
//! the engines that execute circuits.
//!
//! # Overview
//!
//! The HAL abstracts away backend-specific details, providing:
//! - A common [`Backend`] trait for validation, compilation, submission and
//!   result retrieval
//! - [`BackendInfo`] to describe the gate set, result kinds and predicates a
//!   backend accepts
//! - Unified result handling via [`BackendResult`] and [`BasisOrder`]
//!
//! # Supported Backends
//!
//! | Backend | Crate | Result kinds |
//! |---------|-------|--------------|
//! | QuEST-style simulator | `qbridge-adapter-quest` | state vector, density matrix |
//!
//! # Example: Running a Circuit
//!
//! ```ignore
//! use qbridge_adapter_quest::QuestBackend;
//! use qbridge_hal::{Backend, BasisOrder, SubmitOptions};
//! use qbridge_ir::Circuit;
//!
//! fn main() -> anyhow::Result<()> {
//!     let backend = QuestBackend::new();
//!     let compiled = backend.get_compiled_circuit(&Circuit::bell()?, 2)?;
//!
//!     let handle = backend.process_circuit(&compiled, &SubmitOptions::new())?;
//!     let result = backend.get_result(&handle)?;
//!     println!("{:?}", result.get_state(BasisOrder::Ilo)?);
//!     Ok(())
//! }
//! ```
//!
//! # Implementing a Custom Backend
//!
//! Implement the required methods of [`Backend`]; validation, single-circuit
//! submission and `run_circuit` come for free. `process_circuits` must
//! either store a result for every circuit or none of them.

pub mod backend;
pub mod capability;
pub mod error;
pub mod handle;
pub mod options;
pub mod result;

pub use backend::{Backend, BackendConfig, BackendFactory};
pub use capability::{BackendFeatures, BackendInfo, ResultKind};
pub use error::{HalError, HalResult};
pub use handle::{CircuitStatus, ResultHandle, StatusKind};
pub use options::SubmitOptions;
pub use result::{BackendResult, BasisOrder};
