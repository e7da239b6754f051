//! Backend trait and configuration.
//!
//! The [`Backend`] trait defines the lifecycle of a circuit:
//!
//! ```text
//!   default_compilation_pass() ──→ valid_check() ──→ process_circuits()
//!        (rewrite a copy)            (predicates)       (run, store)
//!                                                            │
//!                    pop_result() ◄── get_result() ◄── circuit_status()
//! ```
//!
//! | Method | Required | Returns |
//! |--------|----------|---------|
//! | `name()` | yes | `&str` |
//! | `backend_info()` | yes | `&BackendInfo` |
//! | `required_predicates()` | yes | `&[Predicate]` |
//! | `rebase_pass()` | yes | `Box<dyn Pass>` |
//! | `default_compilation_pass()` | yes | `HalResult<SequencePass>` |
//! | `get_compiled_circuit()` | provided | `HalResult<Circuit>` |
//! | `valid_check()` | provided | `HalResult<()>` |
//! | `process_circuits()` | yes | `HalResult<Vec<ResultHandle>>` |
//! | `process_circuit()` | provided | `HalResult<ResultHandle>` |
//! | `circuit_status()` | yes | `HalResult<CircuitStatus>` |
//! | `get_result()` | yes | `HalResult<BackendResult>` |
//! | `get_results()` | provided | `HalResult<Vec<BackendResult>>` |
//! | `run_circuit()` | provided | `HalResult<BackendResult>` |
//! | `pop_result()` | yes | `HalResult<BackendResult>` |
//! | `cancel()` | provided | `HalResult<()>` |

use qbridge_compile::{Pass, Predicate, SequencePass};
use qbridge_ir::Circuit;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::capability::BackendInfo;
use crate::error::{HalError, HalResult};
use crate::handle::{CircuitStatus, ResultHandle};
use crate::options::SubmitOptions;
use crate::result::BackendResult;

/// Configuration for a backend instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// A string option, if present.
    ///
    /// Fails with `InvalidConfiguration` if the key holds a non-string.
    pub fn get_str(&self, key: &str) -> HalResult<Option<&str>> {
        match self.extra.get(key) {
            None => Ok(None),
            Some(serde_json::Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(HalError::InvalidConfiguration(format!(
                "option '{key}' must be a string, got {other}"
            ))),
        }
    }
}

/// Trait for circuit-execution backends.
///
/// # Contract
///
/// - `backend_info()` is infallible and cached at construction.
/// - Every pipeline returned by `default_compilation_pass()` ends with
///   `rebase_pass()`.
/// - `process_circuits()` either produces a handle for every circuit or
///   fails without storing any result.
/// - Unknown handles fail with [`HalError::HandleNotFound`].
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Capability descriptor.
    fn backend_info(&self) -> &BackendInfo;

    /// Predicates every circuit must satisfy before it runs.
    fn required_predicates(&self) -> &[Predicate];

    /// Pass rewriting any circuit into the backend gate set.
    fn rebase_pass(&self) -> Box<dyn Pass>;

    /// Compilation pipeline for `optimisation_level`.
    fn default_compilation_pass(&self, optimisation_level: u8) -> HalResult<SequencePass>;

    /// Compile a copy of `circuit` with the default pipeline.
    fn get_compiled_circuit(&self, circuit: &Circuit, optimisation_level: u8) -> HalResult<Circuit> {
        let pass = self.default_compilation_pass(optimisation_level)?;
        Ok(pass.apply(circuit)?)
    }

    /// Check `circuit` against every required predicate.
    ///
    /// `index` is the circuit's position in its batch, for the error.
    fn valid_check(&self, circuit: &Circuit, index: usize) -> HalResult<()> {
        for predicate in self.required_predicates() {
            if let Err(violation) = predicate.verify(circuit) {
                warn!("Circuit {index} ('{}') rejected: {violation}", circuit.name());
                return Err(HalError::UnsupportedCircuit {
                    index,
                    reason: violation.to_string(),
                });
            }
        }
        debug!("Circuit {index} ('{}') satisfies every predicate", circuit.name());
        Ok(())
    }

    /// Run `circuits` and store their results.
    fn process_circuits(&self, circuits: &[Circuit], options: &SubmitOptions) -> HalResult<Vec<ResultHandle>>;

    /// Run one circuit.
    fn process_circuit(&self, circuit: &Circuit, options: &SubmitOptions) -> HalResult<ResultHandle> {
        self.process_circuits(std::slice::from_ref(circuit), options)?
            .pop()
            .ok_or_else(|| HalError::Backend("no handle returned for submitted circuit".into()))
    }

    /// Status of a submitted circuit.
    fn circuit_status(&self, handle: &ResultHandle) -> HalResult<CircuitStatus>;

    /// Result of a submitted circuit.
    fn get_result(&self, handle: &ResultHandle) -> HalResult<BackendResult>;

    /// Results of several circuits, in handle order.
    fn get_results(&self, handles: &[ResultHandle]) -> HalResult<Vec<BackendResult>> {
        handles.iter().map(|h| self.get_result(h)).collect()
    }

    /// Submit one circuit and fetch its result.
    fn run_circuit(&self, circuit: &Circuit, options: &SubmitOptions) -> HalResult<BackendResult> {
        let handle = self.process_circuit(circuit, options)?;
        self.get_result(&handle)
    }

    /// Remove a stored result and return it.
    fn pop_result(&self, handle: &ResultHandle) -> HalResult<BackendResult>;

    /// Cancel a submitted circuit.
    fn cancel(&self, handle: &ResultHandle) -> HalResult<()> {
        Err(HalError::NotImplemented(format!("{} cannot cancel circuit {handle}", self.name())))
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_compile::passes::AutoRebase;
    use qbridge_ir::{ClbitId, OpType, QubitId};

    use crate::capability::{BackendFeatures, ResultKind};
    use crate::handle::StatusKind;

    #[test]
    fn test_backend_config() {
        let config = BackendConfig::new("test")
            .with_extra("result_type", serde_json::json!("density_matrix"))
            .with_extra("timeout", serde_json::json!(30));

        assert_eq!(config.name, "test");
        assert_eq!(config.get_str("result_type").unwrap(), Some("density_matrix"));
        assert_eq!(config.get_str("missing").unwrap(), None);
        assert!(matches!(config.get_str("timeout"), Err(HalError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_backend_config_flattens_extra() {
        let config: BackendConfig =
            serde_json::from_str(r#"{ "name": "quest", "result_type": "state_vector" }"#).unwrap();
        assert_eq!(config.get_str("result_type").unwrap(), Some("state_vector"));
    }

    struct Recorder {
        info: BackendInfo,
        results: std::sync::Mutex<std::collections::HashMap<ResultHandle, BackendResult>>,
    }

    impl Recorder {
        fn new() -> Self {
            let gate_set: qbridge_compile::GateSet =
                [OpType::H, OpType::CX, OpType::Measure].into_iter().collect();
            Self {
                info: BackendInfo {
                    name: "recorder".into(),
                    version: "0".into(),
                    gate_set: gate_set.clone(),
                    result_kinds: vec![ResultKind::StateVector],
                    predicates: vec![Predicate::NoMidMeasure, Predicate::GateSet(gate_set)],
                    max_qubits: 4,
                    features: BackendFeatures::exact(ResultKind::StateVector),
                },
                results: std::sync::Mutex::default(),
            }
        }
    }

    impl Backend for Recorder {
        fn name(&self) -> &str {
            &self.info.name
        }

        fn backend_info(&self) -> &BackendInfo {
            &self.info
        }

        fn required_predicates(&self) -> &[Predicate] {
            &self.info.predicates
        }

        fn rebase_pass(&self) -> Box<dyn Pass> {
            Box::new(AutoRebase::new(self.info.gate_set.clone()))
        }

        fn default_compilation_pass(&self, optimisation_level: u8) -> HalResult<SequencePass> {
            match optimisation_level {
                0 => Ok(SequencePass::new().then_boxed(self.rebase_pass())),
                other => Err(HalError::InvalidConfiguration(format!("level {other}"))),
            }
        }

        fn process_circuits(
            &self,
            circuits: &[Circuit],
            options: &SubmitOptions,
        ) -> HalResult<Vec<ResultHandle>> {
            if options.valid_check {
                for (i, circuit) in circuits.iter().enumerate() {
                    self.valid_check(circuit, i)?;
                }
            }
            let mut results = self.results.lock().unwrap();
            Ok(circuits
                .iter()
                .map(|c| {
                    let handle = ResultHandle::new();
                    let qubits = c.qubits().to_vec();
                    let mut state = ndarray::Array1::zeros(1 << qubits.len());
                    state[0] = num_complex::Complex64::new(1.0, 0.0);
                    results.insert(handle.clone(), BackendResult::from_state(qubits, state));
                    handle
                })
                .collect())
        }

        fn circuit_status(&self, handle: &ResultHandle) -> HalResult<CircuitStatus> {
            if self.results.lock().unwrap().contains_key(handle) {
                Ok(CircuitStatus::completed())
            } else {
                Err(HalError::HandleNotFound(handle.to_string()))
            }
        }

        fn get_result(&self, handle: &ResultHandle) -> HalResult<BackendResult> {
            self.results
                .lock()
                .unwrap()
                .get(handle)
                .cloned()
                .ok_or_else(|| HalError::HandleNotFound(handle.to_string()))
        }

        fn pop_result(&self, handle: &ResultHandle) -> HalResult<BackendResult> {
            self.results
                .lock()
                .unwrap()
                .remove(handle)
                .ok_or_else(|| HalError::HandleNotFound(handle.to_string()))
        }
    }

    #[test]
    fn test_valid_check_reports_index_and_predicate() {
        let backend = Recorder::new();
        let mut circuit = Circuit::with_size("mid", 1, 1);
        circuit.h(QubitId(0)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();

        let err = backend.valid_check(&circuit, 3).unwrap_err();
        match err {
            HalError::UnsupportedCircuit { index, reason } => {
                assert_eq!(index, 3);
                assert!(reason.contains("NoMidMeasure"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_batch_rejected_without_handles() {
        let backend = Recorder::new();
        let good = Circuit::bell().unwrap();
        let mut bad = Circuit::with_size("swap", 2, 0);
        bad.swap(QubitId(0), QubitId(1)).unwrap();

        let err = backend
            .process_circuits(&[good.clone(), bad.clone()], &SubmitOptions::new())
            .unwrap_err();
        assert!(matches!(err, HalError::UnsupportedCircuit { index: 1, .. }));
        assert!(backend.results.lock().unwrap().is_empty());

        let unchecked = SubmitOptions::new().with_valid_check(false);
        let handles = backend.process_circuits(&[good, bad], &unchecked).unwrap();
        assert_eq!(handles.len(), 2);
        assert_eq!(backend.get_results(&handles).unwrap().len(), 2);
    }

    #[test]
    fn test_provided_methods() {
        let backend = Recorder::new();
        let mut circuit = Circuit::with_size("swap", 2, 0);
        circuit.swap(QubitId(0), QubitId(1)).unwrap();

        let compiled = backend.get_compiled_circuit(&circuit, 0).unwrap();
        assert_eq!(circuit.commands().len(), 1);
        assert!(compiled.commands().iter().all(|c| c.op_type() == OpType::CX));
        assert!(matches!(
            backend.get_compiled_circuit(&circuit, 5),
            Err(HalError::InvalidConfiguration(_))
        ));

        let result = backend.run_circuit(&compiled, &SubmitOptions::new()).unwrap();
        assert_eq!(result.num_qubits(), 2);

        let handle = backend.process_circuit(&compiled, &SubmitOptions::new()).unwrap();
        assert_eq!(backend.circuit_status(&handle).unwrap().status, StatusKind::Completed);
        assert!(matches!(backend.cancel(&handle), Err(HalError::NotImplemented(_))));
        backend.pop_result(&handle).unwrap();
        assert!(matches!(backend.get_result(&handle), Err(HalError::HandleNotFound(_))));
    }
}
