//! Light synthesis: single-qubit squashing and pair cancellation.

use qbridge_ir::Circuit;

use super::rewrite::{cancel_inverse_pairs, squash_single_qubit_runs};
use crate::error::CompileResult;
use crate::pass::Pass;

/// Squashes runs of single-qubit gates into U3 and cancels adjacent
/// inverse pairs.
pub struct SynthesiseTket;

impl Pass for SynthesiseTket {
    fn name(&self) -> &'static str {
        "SynthesiseTket"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<bool> {
        let (commands, cancelled) = cancel_inverse_pairs(circuit.commands().to_vec());
        let (commands, phase, squashed) = squash_single_qubit_runs(commands, circuit.num_qubits())?;
        // Squashing can leave new inverse pairs next to each other.
        let (commands, recancelled) = cancel_inverse_pairs(commands);
        let changed = cancelled || squashed || recancelled;
        if changed {
            circuit.replace_commands(commands)?;
            circuit.add_phase(phase);
        }
        Ok(changed)
    }
}
