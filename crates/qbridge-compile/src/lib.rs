//! qbridge compilation framework
//!
//! This crate rewrites [`qbridge_ir::Circuit`]s so that a backend can run
//! them. It provides a small pass-based pipeline in the style of LLVM.
//!
//! # Overview
//!
//! A backend describes what it accepts with a list of [`Predicate`]s and
//! offers passes that make a circuit satisfy them:
//!
//! ```text
//! Input Circuit
//!       │
//!       ▼
//! SequencePass
//!       ├── DecomposeBoxes
//!       ├── FlattenRegisters
//!       ├── SynthesiseTket / FullPeepholeOptimise
//!       └── AutoRebase (target gate set)
//!       │
//!       ▼
//! Output Circuit (satisfies the backend predicates)
//! ```
//!
//! # Example
//!
//! ```rust
//! use qbridge_compile::passes::{AutoRebase, DecomposeBoxes};
//! use qbridge_compile::{GateSet, Pass, Predicate, SequencePass};
//! use qbridge_ir::{Circuit, OpType, QubitId};
//!
//! let mut circuit = Circuit::with_size("swap", 2, 0);
//! circuit.swap(QubitId(0), QubitId(1)).unwrap();
//!
//! let target: GateSet = [OpType::CX, OpType::U3].into_iter().collect();
//! let pass = SequencePass::new()
//!     .then(DecomposeBoxes)
//!     .then(AutoRebase::new(target.clone()));
//! pass.run(&mut circuit).unwrap();
//!
//! assert_eq!(circuit.commands().len(), 3);
//! assert!(Predicate::GateSet(target).verify(&circuit).is_ok());
//! ```
//!
//! # Custom Passes
//!
//! ```rust
//! use qbridge_compile::{CompileResult, Pass};
//! use qbridge_ir::Circuit;
//!
//! struct MyCustomPass;
//!
//! impl Pass for MyCustomPass {
//!     fn name(&self) -> &str { "my_custom_pass" }
//!
//!     fn run(&self, circuit: &mut Circuit) -> CompileResult<bool> {
//!         Ok(false)
//!     }
//! }
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod predicate;
pub mod unitary;

// Built-in passes
pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::SequencePass;
pub use pass::Pass;
pub use predicate::{GateSet, Predicate, PredicateViolation};
pub use unitary::Unitary2x2;
