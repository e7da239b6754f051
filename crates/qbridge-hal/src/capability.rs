//! Backend capability descriptors.

use std::fmt;
use std::str::FromStr;

use qbridge_compile::{GateSet, Predicate};
use serde::{Deserialize, Serialize};

use crate::error::HalError;

/// Kind of data a backend returns for a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// Pure state amplitudes.
    StateVector,
    /// Density matrix.
    DensityMatrix,
}

impl ResultKind {
    /// Configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            ResultKind::StateVector => "state_vector",
            ResultKind::DensityMatrix => "density_matrix",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultKind {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "state_vector" => Ok(ResultKind::StateVector),
            "density_matrix" => Ok(ResultKind::DensityMatrix),
            other => Err(HalError::InvalidConfiguration(format!(
                "unknown result type '{other}', expected 'state_vector' or 'density_matrix'"
            ))),
        }
    }
}

/// What a backend can return and remember.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendFeatures {
    /// Results carry sampled shots.
    pub supports_shots: bool,
    /// Results carry outcome counts.
    pub supports_counts: bool,
    /// Results carry a state vector.
    pub supports_state: bool,
    /// Results carry a density matrix.
    pub supports_density_matrix: bool,
    /// Handles survive a process restart.
    pub persistent_handles: bool,
}

impl BackendFeatures {
    /// Features of an exact simulator producing `kind`.
    pub fn exact(kind: ResultKind) -> Self {
        Self {
            supports_shots: false,
            supports_counts: false,
            supports_state: kind == ResultKind::StateVector,
            supports_density_matrix: kind == ResultKind::DensityMatrix,
            persistent_handles: false,
        }
    }
}

/// Immutable description of a backend, built once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Backend name.
    pub name: String,
    /// Backend version.
    pub version: String,
    /// Operation kinds the backend executes.
    pub gate_set: GateSet,
    /// Kinds of result the backend can produce.
    pub result_kinds: Vec<ResultKind>,
    /// Predicates every submitted circuit must satisfy, in check order.
    pub predicates: Vec<Predicate>,
    /// Largest circuit, in qubits.
    pub max_qubits: usize,
    /// Feature flags.
    pub features: BackendFeatures,
}

impl BackendInfo {
    /// True if the backend can produce `kind`.
    pub fn supports_result(&self, kind: ResultKind) -> bool {
        self.result_kinds.contains(&kind)
    }
}
