//! Register flattening.

use qbridge_ir::{Circuit, Clbit, Qubit};
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::Pass;

/// Renames every qubit to `q[i]` and every bit to `c[i]` by position.
pub struct FlattenRegisters;

impl Pass for FlattenRegisters {
    fn name(&self) -> &'static str {
        "FlattenRegisters"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<bool> {
        let qubits: Vec<Qubit> = (0..circuit.num_qubits() as u32).map(Qubit::new).collect();
        let clbits: Vec<Clbit> = (0..circuit.num_clbits() as u32).map(Clbit::new).collect();
        if circuit.qubits() == qubits.as_slice() && circuit.clbits() == clbits.as_slice() {
            return Ok(false);
        }
        debug!("Flattening {} qubits and {} bits", qubits.len(), clbits.len());
        circuit.rename_units(qubits, clbits)?;
        Ok(true)
    }
}
