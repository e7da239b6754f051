//! Box decomposition.

use qbridge_ir::{Circuit, Op};

use super::rewrite::{inline_box, u3_from_unitary};
use crate::error::CompileResult;
use crate::pass::Pass;
use crate::unitary::Unitary2x2;

/// Replaces every [`CircBox`](qbridge_ir::CircBox) with its contents,
/// recursively, and every [`Unitary1qBox`](qbridge_ir::Unitary1qBox) with
/// an equivalent U3 gate.
pub struct DecomposeBoxes;

impl Pass for DecomposeBoxes {
    fn name(&self) -> &'static str {
        "DecomposeBoxes"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<bool> {
        let has_boxes = circuit
            .commands()
            .iter()
            .any(|c| matches!(c.op, Op::CircBox(_) | Op::Unitary1qBox(_)));
        if !has_boxes {
            return Ok(false);
        }

        let mut out = Vec::with_capacity(circuit.commands().len());
        let mut phase = 0.0;
        for cmd in circuit.commands() {
            match &cmd.op {
                Op::CircBox(_) => {
                    let (inlined, box_phase) = inline_box(cmd)?;
                    phase += box_phase;
                    for inner in inlined {
                        out.push(inner);
                    }
                }
                Op::Unitary1qBox(u) => {
                    let (mut gate, gate_phase) = u3_from_unitary(&Unitary2x2(u.matrix()), cmd.qubits[0])?;
                    if cmd.condition.is_none() {
                        phase += gate_phase;
                    }
                    gate.condition.clone_from(&cmd.condition);
                    out.push(gate);
                }
                _ => out.push(cmd.clone()),
            }
        }

        // Inlined boxes can themselves carry unitary boxes.
        let nested = out.iter().any(|c| matches!(c.op, Op::Unitary1qBox(_)));
        circuit.replace_commands(out)?;
        circuit.add_phase(phase);
        if nested {
            self.run(circuit)?;
        }
        Ok(true)
    }
}
