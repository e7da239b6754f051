//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur while building or editing a circuit.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not declared in the circuit.
    #[error("Qubit {qubit} not found in circuit{}", op_context(.op))]
    QubitNotFound {
        /// The missing qubit.
        qubit: QubitId,
        /// Name of the operation that referenced it.
        op: Option<String>,
    },

    /// Classical bit not declared in the circuit.
    #[error("Classical bit {clbit} not found in circuit{}", op_context(.op))]
    ClbitNotFound {
        /// The missing bit.
        clbit: ClbitId,
        /// Name of the operation that referenced it.
        op: Option<String>,
    },

    /// Operation applied to the wrong number of units.
    #[error("Operation '{op}' acts on {expected} {unit}s, got {got}")]
    ArityMismatch {
        /// Operation name.
        op: String,
        /// "qubit" or "bit".
        unit: &'static str,
        /// Expected count.
        expected: usize,
        /// Provided count.
        got: usize,
    },

    /// Gate given the wrong number of angle parameters.
    #[error("Gate '{op}' takes {expected} parameters, got {got}")]
    ParameterCountMismatch {
        /// Gate name.
        op: String,
        /// Expected count.
        expected: usize,
        /// Provided count.
        got: usize,
    },

    /// The same qubit appears twice in one command.
    #[error("Duplicate qubit {qubit} in operation{}", op_context(.op))]
    DuplicateQubit {
        /// The repeated qubit.
        qubit: QubitId,
        /// Operation name.
        op: Option<String>,
    },

    /// The same classical bit appears twice in one command.
    #[error("Duplicate classical bit {clbit} in operation{}", op_context(.op))]
    DuplicateClbit {
        /// The repeated bit.
        clbit: ClbitId,
        /// Operation name.
        op: Option<String>,
    },

    /// Operation kind cannot be used as a gate.
    #[error("'{0}' is not a unitary gate")]
    NotAGate(String),

    /// A unit with this name already exists.
    #[error("Unit '{0}' already exists in circuit")]
    DuplicateUnit(String),

    /// Matrix handed to a unitary box is not unitary.
    #[error("Matrix is not unitary (deviation {0:.3e})")]
    NotUnitary(f64),

    /// Parameter has no numeric value.
    #[error("Parameter '{0}' is unbound")]
    UnboundParameter(String),
}

#[allow(clippy::ref_option)]
fn op_context(op: &Option<String>) -> String {
    match op {
        Some(name) => format!(" (op: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
