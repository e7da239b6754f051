//! Error types for the HAL crate.

use thiserror::Error;

/// Errors that can occur in HAL operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Backend configuration or a request parameter is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A submitted circuit does not satisfy the backend's requirements.
    #[error("Circuit {index} is not supported: {reason}")]
    UnsupportedCircuit {
        /// Position of the circuit in the submitted batch.
        index: usize,
        /// Failing predicate or offending gate.
        reason: String,
    },

    /// No result is stored under the handle.
    #[error("Result handle not found: {0}")]
    HandleNotFound(String),

    /// The backend does not offer this operation.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// The result does not hold the requested data.
    #[error("Result unavailable: {0}")]
    ResultUnavailable(String),

    /// Compilation failed.
    #[error("Compilation error: {0}")]
    Compile(#[from] qbridge_compile::CompileError),

    /// The simulation engine failed.
    #[error("Simulation error: {0}")]
    Simulation(#[from] qbridge_sim::SimError),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
