//! Error types for the QuEST adapter.

use qbridge_hal::HalError;
use qbridge_ir::OpType;
use qbridge_sim::SimError;
use thiserror::Error;

pub type QuestResult<T> = Result<T, QuestError>;

#[derive(Debug, Error)]
pub enum QuestError {
    #[error("command {command}: gate '{op}' has no simulator equivalent")]
    UnsupportedGate { command: usize, op: OpType },

    #[error("command {command}: gate '{op}' parameters do not evaluate to numbers")]
    SymbolicParameter { command: usize, op: OpType },

    #[error("command {command}: classically controlled '{op}' cannot be simulated")]
    ClassicalControl { command: usize, op: OpType },

    #[error("Engine error: {0}")]
    Engine(#[from] SimError),
}

impl QuestError {
    /// Attribute the error to circuit `index` of a batch.
    pub fn at_circuit(self, index: usize) -> HalError {
        match self {
            QuestError::Engine(e) => HalError::Simulation(e),
            other => HalError::UnsupportedCircuit {
                index,
                reason: other.to_string(),
            },
        }
    }
}

impl From<QuestError> for HalError {
    fn from(e: QuestError) -> Self {
        match e {
            QuestError::Engine(e) => HalError::Simulation(e),
            other => HalError::Backend(other.to_string()),
        }
    }
}
