//! qbridge circuit representation
//!
//! This crate provides the circuit model the rest of the workspace
//! compiles and simulates.
//!
//! # Core Components
//!
//! - **Units**: [`Qubit`] and [`Clbit`] names, addressed by dense
//!   [`QubitId`] / [`ClbitId`] positions
//! - **Operation kinds**: [`OpType`], the vocabulary of gate sets and predicates
//! - **Operations**: [`Op`] values such as [`Gate`], [`CircBox`] and [`Unitary1qBox`]
//! - **Parameters**: [`ParameterExpression`] for numeric or symbolic angles
//! - **Commands**: [`Command`], an operation bound to units with an optional [`Condition`]
//! - **Circuit**: [`Circuit`], the validated builder
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qbridge_ir::{Circuit, OpType, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.count_ops()[&OpType::Measure], 2);
//! ```
//!
//! # Example: Parameterized Circuit
//!
//! ```rust
//! use qbridge_ir::{Circuit, ParameterExpression, QubitId};
//! use rustc_hash::FxHashMap;
//! use std::f64::consts::PI;
//!
//! let mut circuit = Circuit::with_size("variational", 1, 0);
//! circuit.rx(ParameterExpression::symbol("theta"), QubitId(0)).unwrap();
//! assert!(circuit.free_symbols().contains("theta"));
//!
//! let mut values = FxHashMap::default();
//! values.insert("theta".to_string(), PI / 4.0);
//! circuit.bind(&values);
//! assert!(circuit.free_symbols().is_empty());
//! ```

pub mod circuit;
pub mod command;
pub mod error;
pub mod op;
pub mod optype;
pub mod parameter;
pub mod qubit;

pub use circuit::Circuit;
pub use command::{Command, Condition};
pub use error::{IrError, IrResult};
pub use op::{CircBox, Gate, Op, UNITARY_TOLERANCE, Unitary1qBox};
pub use optype::OpType;
pub use parameter::ParameterExpression;
pub use qubit::{
    Clbit, ClbitId, DEFAULT_CLBIT_REGISTER, DEFAULT_QUBIT_REGISTER, Qubit, QubitId,
};
