//! Operation sequences.

use rand::Rng;
use tracing::{debug, instrument};

use crate::error::{SimError, SimResult};
use crate::operation::Operation;
use crate::register::{Register, RegisterKind};

/// Outcome of one measurement during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementOutcome {
    /// Measured qubit.
    pub qubit: usize,
    /// `true` for `|1⟩`.
    pub value: bool,
}

/// An ordered list of operations over a fixed number of qubits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    num_qubits: usize,
    operations: Vec<Operation>,
}

impl Program {
    /// Empty program over `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            operations: vec![],
        }
    }

    /// Append an operation, checking its qubit indices.
    pub fn push(&mut self, op: Operation) -> SimResult<&mut Self> {
        op.check(self.num_qubits)?;
        self.operations.push(op);
        Ok(self)
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The operations, in order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// True if there are no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Apply every operation to `register` in order.
    #[instrument(skip_all, fields(n_qubits = self.num_qubits, n_ops = self.operations.len()))]
    pub fn run<R: Rng + ?Sized>(&self, register: &mut Register, rng: &mut R) -> SimResult<Vec<MeasurementOutcome>> {
        if register.num_qubits() != self.num_qubits {
            return Err(SimError::QubitCountMismatch {
                program: self.num_qubits,
                register: register.num_qubits(),
            });
        }
        let mut outcomes = vec![];
        for op in &self.operations {
            if let (Operation::Measure { qubit }, Some(value)) = (op, register.apply(op, rng)?) {
                outcomes.push(MeasurementOutcome { qubit: *qubit, value });
            }
        }
        debug!("Program finished with {} measurements", outcomes.len());
        Ok(outcomes)
    }

    /// Allocate a fresh register of `kind` and run the program on it.
    pub fn execute<R: Rng + ?Sized>(
        &self,
        kind: RegisterKind,
        rng: &mut R,
    ) -> SimResult<(Register, Vec<MeasurementOutcome>)> {
        let mut register = Register::new(kind, self.num_qubits)?;
        let outcomes = self.run(&mut register, rng)?;
        Ok((register, outcomes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ghz(n: usize) -> Program {
        let mut program = Program::new(n);
        program.push(Operation::hadamard(0)).unwrap();
        for q in 1..n {
            program.push(Operation::controlled_not(q - 1, q)).unwrap();
        }
        program
    }

    #[test]
    fn test_push_checks_indices() {
        let mut program = Program::new(2);
        assert!(program.push(Operation::controlled_not(0, 2)).is_err());
        assert!(program.is_empty());
    }

    #[test]
    fn test_ghz_probabilities() {
        let mut rng = StdRng::seed_from_u64(1);
        let (register, outcomes) = ghz(3).execute(RegisterKind::StateVector, &mut rng).unwrap();
        let probs = register.probabilities();
        assert!(outcomes.is_empty());
        assert!((probs[0] - 0.5).abs() < 1e-12);
        assert!((probs[7] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_measurements_are_correlated_and_seeded() {
        let mut program = ghz(3);
        for q in 0..3 {
            program.push(Operation::measure(q)).unwrap();
        }

        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            program.execute(RegisterKind::DensityMatrix, &mut rng).unwrap().1
        };
        let outcomes = run(42);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.value == outcomes[0].value));
        assert_eq!(run(42), outcomes);
    }

    #[test]
    fn test_register_size_mismatch() {
        let mut register = Register::state_vector(3).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let err = ghz(2).run(&mut register, &mut rng).unwrap_err();
        assert!(matches!(err, SimError::QubitCountMismatch { program: 2, register: 3 }));
    }
}
