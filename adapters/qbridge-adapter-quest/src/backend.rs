//! QuEST simulator backend implementation.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use tracing::{debug, info, instrument};

use qbridge_compile::passes::{
    AutoRebase, DecomposeBoxes, FlattenRegisters, FullPeepholeOptimise, SynthesiseTket,
};
use qbridge_compile::{Pass, Predicate, SequencePass};
use qbridge_hal::{
    Backend, BackendConfig, BackendFactory, BackendFeatures, BackendInfo, BackendResult,
    CircuitStatus, HalError, HalResult, ResultHandle, ResultKind, SubmitOptions,
};
use qbridge_ir::Circuit;
use qbridge_sim::{RegisterKind, RegisterState};

use crate::convert::{circuit_to_program, gate_set, rebase_gate_set};
use crate::error::QuestResult;

/// Default backend name.
pub const DEFAULT_NAME: &str = "quest";

/// Highest supported optimisation level.
pub const MAX_OPTIMISATION_LEVEL: u8 = 2;

/// A stored simulation output.
struct StoredResult {
    result: BackendResult,
    status: CircuitStatus,
}

/// Exact simulator backend.
///
/// Every circuit runs to completion inside
/// [`process_circuits`](Backend::process_circuits); handles are only
/// returned once the whole batch has been simulated.
pub struct QuestBackend {
    info: BackendInfo,
    result_kind: ResultKind,
    results: Mutex<FxHashMap<ResultHandle, StoredResult>>,
}

impl QuestBackend {
    /// A state-vector backend.
    pub fn new() -> Self {
        Self::with_result_kind(ResultKind::StateVector)
    }

    /// A backend returning `kind`.
    pub fn with_result_kind(kind: ResultKind) -> Self {
        Self::build(DEFAULT_NAME.into(), kind)
    }

    /// A backend for a result type given by name.
    ///
    /// Accepts `"state_vector"` and `"density_matrix"`.
    pub fn with_result_type(result_type: &str) -> HalResult<Self> {
        Ok(Self::with_result_kind(result_type.parse()?))
    }

    fn build(name: String, kind: ResultKind) -> Self {
        let gate_set = gate_set();
        let predicates = vec![
            Predicate::NoClassicalControl,
            Predicate::NoFastFeedforward,
            Predicate::NoMidMeasure,
            Predicate::NoSymbols,
            Predicate::GateSet(gate_set.clone()),
            Predicate::DefaultRegister,
        ];
        let info = BackendInfo {
            name,
            version: env!("CARGO_PKG_VERSION").into(),
            gate_set,
            result_kinds: vec![kind],
            predicates,
            max_qubits: register_kind(kind).max_qubits(),
            features: BackendFeatures::exact(kind),
        };
        debug!("Created {} backend returning {kind}", info.name);
        Self {
            info,
            result_kind: kind,
            results: Mutex::new(FxHashMap::default()),
        }
    }

    /// Kind of result this backend produces.
    pub fn result_kind(&self) -> ResultKind {
        self.result_kind
    }

    /// Number of results currently stored.
    pub fn stored_results(&self) -> usize {
        self.results().len()
    }

    fn results(&self) -> MutexGuard<'_, FxHashMap<ResultHandle, StoredResult>> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Translate, simulate and convert one circuit.
    fn simulate(&self, circuit: &Circuit, rng: &mut StdRng) -> QuestResult<BackendResult> {
        let translation = circuit_to_program(circuit)?;
        debug!(
            "Circuit '{}' lowered to {} operations",
            circuit.name(),
            translation.program.len()
        );

        let (mut register, outcomes) =
            translation.program.execute(register_kind(self.result_kind), rng)?;
        register.apply_global_phase(translation.global_phase);

        let mut bits = vec![None; circuit.num_clbits()];
        for (outcome, bit) in outcomes.iter().zip(&translation.measured_bits) {
            bits[bit.0 as usize] = Some(outcome.value);
        }

        let qubits = circuit.qubits().to_vec();
        let result = match register.into_state() {
            RegisterState::StateVector(amplitudes) => BackendResult::from_state(qubits, amplitudes),
            RegisterState::DensityMatrix(rho) => BackendResult::from_density_matrix(qubits, rho),
        };
        Ok(result.with_bits(circuit.clbits().to_vec(), bits))
    }
}

fn register_kind(kind: ResultKind) -> RegisterKind {
    match kind {
        ResultKind::StateVector => RegisterKind::StateVector,
        ResultKind::DensityMatrix => RegisterKind::DensityMatrix,
    }
}

impl Default for QuestBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for QuestBackend {
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
        Box::new(AutoRebase::new(rebase_gate_set()))
    }

    fn default_compilation_pass(&self, optimisation_level: u8) -> HalResult<SequencePass> {
        let sequence = SequencePass::new()
            .named(format!("{}-level{optimisation_level}", self.info.name))
            .then(DecomposeBoxes)
            .then(FlattenRegisters);
        let sequence = match optimisation_level {
            0 => sequence,
            1 => sequence.then(SynthesiseTket),
            2 => sequence.then(FullPeepholeOptimise),
            other => {
                return Err(HalError::InvalidConfiguration(format!(
                    "optimisation level {other} is not supported, expected 0..={MAX_OPTIMISATION_LEVEL}"
                )));
            }
        };
        Ok(sequence.then_boxed(self.rebase_pass()))
    }

    #[instrument(skip_all, fields(backend = %self.info.name, n_circuits = circuits.len()))]
    fn process_circuits(
        &self,
        circuits: &[Circuit],
        options: &SubmitOptions,
    ) -> HalResult<Vec<ResultHandle>> {
        if let Some(shots) = options.n_shots {
            debug!("Ignoring n_shots = {shots}: simulation is exact");
        }
        if options.valid_check {
            for (index, circuit) in circuits.iter().enumerate() {
                self.valid_check(circuit, index)?;
            }
        }

        let seed = options.seed.unwrap_or_else(rand::random);
        debug!("Seeding measurement sampling with {seed}");
        let mut rng = StdRng::seed_from_u64(seed);

        let mut batch = Vec::with_capacity(circuits.len());
        for (index, circuit) in circuits.iter().enumerate() {
            let result = self
                .simulate(circuit, &mut rng)
                .map_err(|e| e.at_circuit(index))?;
            batch.push((ResultHandle::new(), result));
        }

        let mut results = self.results();
        let handles = batch
            .into_iter()
            .map(|(handle, result)| {
                let stored = StoredResult {
                    result,
                    status: CircuitStatus::completed(),
                };
                results.insert(handle.clone(), stored);
                handle
            })
            .collect::<Vec<_>>();

        info!("Completed {} circuits", handles.len());
        Ok(handles)
    }

    fn circuit_status(&self, handle: &ResultHandle) -> HalResult<CircuitStatus> {
        self.results()
            .get(handle)
            .map(|stored| stored.status.clone())
            .ok_or_else(|| HalError::HandleNotFound(handle.to_string()))
    }

    fn get_result(&self, handle: &ResultHandle) -> HalResult<BackendResult> {
        self.results()
            .get(handle)
            .map(|stored| stored.result.clone())
            .ok_or_else(|| HalError::HandleNotFound(handle.to_string()))
    }

    fn pop_result(&self, handle: &ResultHandle) -> HalResult<BackendResult> {
        self.results()
            .remove(handle)
            .map(|stored| stored.result)
            .ok_or_else(|| HalError::HandleNotFound(handle.to_string()))
    }
}

impl BackendFactory for QuestBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let kind = match config.get_str("result_type")? {
            Some(name) => name.parse()?,
            None => ResultKind::StateVector,
        };
        Ok(Self::build(config.name, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_ir::{ClbitId, QubitId};

    #[test]
    fn test_backend_info() {
        let backend = QuestBackend::new();
        let info = backend.backend_info();
        assert_eq!(info.name, "quest");
        assert!(info.supports_result(ResultKind::StateVector));
        assert!(!info.supports_result(ResultKind::DensityMatrix));
        assert!(info.features.supports_state);
        assert!(!info.features.supports_shots);
        assert_eq!(info.max_qubits, qbridge_sim::MAX_STATE_VECTOR_QUBITS);
    }

    #[test]
    fn test_density_matrix_clears_state_support() {
        let backend = QuestBackend::with_result_type("density_matrix").unwrap();
        let features = backend.backend_info().features;
        assert!(!features.supports_state);
        assert!(features.supports_density_matrix);
        assert_eq!(backend.result_kind(), ResultKind::DensityMatrix);
    }

    #[test]
    fn test_predicate_order() {
        let backend = QuestBackend::new();
        let names: Vec<_> = backend.required_predicates().iter().map(Predicate::name).collect();
        assert_eq!(
            names,
            [
                "NoClassicalControl",
                "NoFastFeedforward",
                "NoMidMeasure",
                "NoSymbols",
                "GateSet",
                "DefaultRegister"
            ]
        );
    }

    #[test]
    fn test_pipelines() {
        let backend = QuestBackend::new();
        let expected = [
            vec!["DecomposeBoxes", "FlattenRegisters", "AutoRebase"],
            vec!["DecomposeBoxes", "FlattenRegisters", "SynthesiseTket", "AutoRebase"],
            vec!["DecomposeBoxes", "FlattenRegisters", "FullPeepholeOptimise", "AutoRebase"],
        ];
        for (level, names) in expected.iter().enumerate() {
            let pass = backend.default_compilation_pass(level as u8).unwrap();
            assert_eq!(&pass.pass_names(), names);
        }
        assert!(matches!(
            backend.default_compilation_pass(3),
            Err(HalError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_measured_bits_recorded() {
        let backend = QuestBackend::new();
        let mut circuit = Circuit::with_size("x", 2, 2);
        circuit.x(QubitId(1)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.measure(QubitId(1), ClbitId(1)).unwrap();

        let result = backend.run_circuit(&circuit, &SubmitOptions::new()).unwrap();
        assert_eq!(result.bits(), &[Some(false), Some(true)]);
        assert_eq!(result.clbits().len(), 2);
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("dm").with_extra("result_type", serde_json::json!("density_matrix"));
        let backend = QuestBackend::from_config(config).unwrap();
        assert_eq!(backend.name(), "dm");
        assert_eq!(backend.result_kind(), ResultKind::DensityMatrix);

        let default = QuestBackend::from_config(BackendConfig::new("sv")).unwrap();
        assert_eq!(default.result_kind(), ResultKind::StateVector);

        let bad = BackendConfig::new("bad").with_extra("result_type", serde_json::json!("bloch_vector"));
        assert!(matches!(QuestBackend::from_config(bad), Err(HalError::InvalidConfiguration(_))));
    }
}
