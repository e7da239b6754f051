//! Pass trait for circuit rewriting.

use qbridge_ir::Circuit;

use crate::error::CompileResult;

/// A circuit rewriting pass.
///
/// Passes are the unit of compilation in qbridge. Each pass rewrites a
/// circuit in place and reports whether anything changed.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Rewrite the circuit in place. Returns `true` if it changed.
    ///
    /// On error the circuit may be partially rewritten; callers that need
    /// the input preserved use [`Pass::apply`].
    fn run(&self, circuit: &mut Circuit) -> CompileResult<bool>;

    /// Rewrite a copy of the circuit, leaving the input untouched.
    fn apply(&self, circuit: &Circuit) -> CompileResult<Circuit> {
        let mut out = circuit.clone();
        self.run(&mut out)?;
        Ok(out)
    }
}

impl<P: Pass + ?Sized> Pass for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<bool> {
        (**self).run(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_ir::QubitId;

    struct AppendX;

    impl Pass for AppendX {
        fn name(&self) -> &'static str {
            "append_x"
        }

        fn run(&self, circuit: &mut Circuit) -> CompileResult<bool> {
            circuit.x(QubitId(0))?;
            Ok(true)
        }
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let circuit = Circuit::with_size("c", 1, 0);
        let out = AppendX.apply(&circuit).unwrap();
        assert!(circuit.commands().is_empty());
        assert_eq!(out.commands().len(), 1);
    }

    #[test]
    fn test_boxed_pass_delegates() {
        let pass: Box<dyn Pass> = Box::new(AppendX);
        assert_eq!(pass.name(), "append_x");
        let mut circuit = Circuit::with_size("c", 1, 0);
        assert!(pass.run(&mut circuit).unwrap());
    }
}
