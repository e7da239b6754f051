//! Error types for the compilation crate.

use thiserror::Error;

/// Errors that can occur while rewriting a circuit.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] qbridge_ir::IrError),

    /// Gate cannot be expressed in the target gate set.
    #[error("Gate '{op}' cannot be rebased into the target gate set {target}")]
    GateNotInBasis {
        /// Offending gate.
        op: String,
        /// Target gate set, for diagnostics.
        target: String,
    },

    /// Pass execution failed.
    #[error("Pass '{name}' failed: {reason}")]
    PassFailed {
        /// Pass name.
        name: String,
        /// Reason.
        reason: String,
    },
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
