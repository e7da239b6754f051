//! Sequencing of compilation passes.

use tracing::{debug, info, instrument};

use qbridge_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::Pass;

/// Runs passes one after another.
///
/// A `SequencePass` is itself a [`Pass`], so sequences nest.
pub struct SequencePass {
    name: String,
    passes: Vec<Box<dyn Pass>>,
}

impl SequencePass {
    /// Create a new empty sequence.
    pub fn new() -> Self {
        Self {
            name: "SequencePass".into(),
            passes: vec![],
        }
    }

    /// Give the sequence a name for logs.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append a pass.
    #[must_use]
    pub fn then(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Append an already boxed pass.
    #[must_use]
    pub fn then_boxed(mut self, pass: Box<dyn Pass>) -> Self {
        self.passes.push(pass);
        self
    }

    /// The passes, in execution order.
    pub fn passes(&self) -> &[Box<dyn Pass>] {
        &self.passes
    }

    /// Names of the passes, in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the sequence has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for SequencePass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for SequencePass {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(sequence = %self.name, circuit = %circuit.name()))]
    fn run(&self, circuit: &mut Circuit) -> CompileResult<bool> {
        info!(
            "Running {} passes on circuit with {} qubits, {} commands",
            self.passes.len(),
            circuit.num_qubits(),
            circuit.commands().len()
        );

        let mut changed = false;
        for pass in &self.passes {
            let pass_changed = pass.run(circuit)?;
            debug!(
                "Pass {} completed, changed: {}, commands: {}",
                pass.name(),
                pass_changed,
                circuit.commands().len()
            );
            changed |= pass_changed;
        }

        info!(
            "Sequence completed, depth: {}, commands: {}",
            circuit.depth(),
            circuit.commands().len()
        );
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::{DecomposeBoxes, FlattenRegisters};
    use qbridge_ir::QubitId;

    #[test]
    fn test_empty_sequence() {
        let seq = SequencePass::new();
        assert!(seq.is_empty());
        let mut circuit = Circuit::bell().unwrap();
        assert!(!seq.run(&mut circuit).unwrap());
        assert_eq!(circuit.commands().len(), 2);
    }

    #[test]
    fn test_sequence_order_and_change_tracking() {
        let seq = SequencePass::new().then(DecomposeBoxes).then(FlattenRegisters);
        assert_eq!(seq.pass_names(), vec!["DecomposeBoxes", "FlattenRegisters"]);

        let mut circuit = Circuit::new("anc");
        circuit.add_qreg("anc", 1).unwrap();
        circuit.h(QubitId(0)).unwrap();
        assert!(seq.run(&mut circuit).unwrap());
        assert!(circuit.is_default_register());
        assert!(!seq.run(&mut circuit).unwrap());
    }
}
