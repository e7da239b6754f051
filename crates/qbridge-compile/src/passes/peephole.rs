//! Fixed-point peephole optimisation.

use qbridge_ir::Circuit;
use tracing::debug;

use super::rewrite::{cancel_inverse_pairs, merge_rotations, squash_single_qubit_runs};
use crate::error::CompileResult;
use crate::pass::Pass;

/// Upper bound on rewrite rounds. Every productive round removes at least
/// one command, so this only matters for very long circuits.
const MAX_ROUNDS: usize = 64;

/// Repeats rotation merging (with diagonal gates commuted through
/// controls), inverse-pair cancellation and single-qubit squashing until
/// nothing changes.
pub struct FullPeepholeOptimise;

impl Pass for FullPeepholeOptimise {
    fn name(&self) -> &'static str {
        "FullPeepholeOptimise"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<bool> {
        let mut commands = circuit.commands().to_vec();
        let mut phase = 0.0;
        let mut changed = false;

        for round in 0..MAX_ROUNDS {
            let (merged, merge_phase, m) = merge_rotations(commands)?;
            let (cancelled, c) = cancel_inverse_pairs(merged);
            let (squashed, squash_phase, s) = squash_single_qubit_runs(cancelled, circuit.num_qubits())?;
            commands = squashed;
            phase += merge_phase + squash_phase;
            if !(m || c || s) {
                debug!("Peephole reached a fixed point after {round} rounds");
                break;
            }
            changed = true;
        }

        if changed {
            circuit.replace_commands(commands)?;
            circuit.add_phase(phase);
        }
        Ok(changed)
    }
}
