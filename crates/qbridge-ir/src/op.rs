//! Operation values.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::optype::OpType;
use crate::parameter::ParameterExpression;

/// Tolerance used when checking that a boxed matrix is unitary.
pub const UNITARY_TOLERANCE: f64 = 1e-9;

/// A unitary gate with its angle parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    kind: OpType,
    params: Vec<ParameterExpression>,
}

impl Gate {
    /// Create a gate, checking that `kind` is a gate and the parameter count matches.
    pub fn new(kind: OpType, params: Vec<ParameterExpression>) -> IrResult<Self> {
        if !kind.is_gate() {
            return Err(IrError::NotAGate(kind.name().to_string()));
        }
        if params.len() != kind.n_params() {
            return Err(IrError::ParameterCountMismatch {
                op: kind.name().to_string(),
                expected: kind.n_params(),
                got: params.len(),
            });
        }
        Ok(Self { kind, params })
    }

    /// Parameterless gate.
    pub fn fixed(kind: OpType) -> IrResult<Self> {
        Self::new(kind, vec![])
    }

    /// Gate kind.
    pub fn kind(&self) -> OpType {
        self.kind
    }

    /// Angle parameters, in radians.
    pub fn params(&self) -> &[ParameterExpression] {
        &self.params
    }

    /// Numeric parameter values, or `None` if any parameter is symbolic.
    pub fn param_values(&self) -> Option<Vec<f64>> {
        self.params.iter().map(ParameterExpression::evaluate).collect()
    }

    pub(crate) fn params_mut(&mut self) -> &mut [ParameterExpression] {
        &mut self.params
    }
}

/// A sub-circuit used as a single operation.
///
/// The box's own qubits and bits are mapped positionally onto the
/// arguments of the command that holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircBox {
    circuit: Box<Circuit>,
}

impl CircBox {
    /// Wrap a circuit.
    pub fn new(circuit: Circuit) -> Self {
        Self {
            circuit: Box::new(circuit),
        }
    }

    /// The boxed circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub(crate) fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }
}

/// A 2×2 unitary matrix used as a single-qubit operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unitary1qBox {
    matrix: [[Complex64; 2]; 2],
}

impl Unitary1qBox {
    /// Wrap a matrix, rejecting it if `U·U†` deviates from identity.
    pub fn new(matrix: [[Complex64; 2]; 2]) -> IrResult<Self> {
        let mut deviation: f64 = 0.0;
        for i in 0..2 {
            for j in 0..2 {
                let mut entry = Complex64::new(0.0, 0.0);
                for k in 0..2 {
                    entry += matrix[i][k] * matrix[j][k].conj();
                }
                let expected = if i == j { 1.0 } else { 0.0 };
                deviation = deviation.max((entry - Complex64::new(expected, 0.0)).norm());
            }
        }
        if !deviation.is_finite() || deviation > UNITARY_TOLERANCE {
            return Err(IrError::NotUnitary(deviation));
        }
        Ok(Self { matrix })
    }

    /// Row-major matrix.
    pub fn matrix(&self) -> [[Complex64; 2]; 2] {
        self.matrix
    }
}

/// An operation that a command applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Op {
    /// Unitary gate.
    Gate(Gate),
    /// Measurement of one qubit into one bit.
    Measure,
    /// Reset to |0⟩.
    Reset,
    /// Barrier over any number of units.
    Barrier,
    /// Boxed sub-circuit.
    CircBox(CircBox),
    /// Boxed single-qubit unitary.
    Unitary1qBox(Unitary1qBox),
}

impl Op {
    /// Kind of this operation.
    pub fn op_type(&self) -> OpType {
        match self {
            Op::Gate(g) => g.kind(),
            Op::Measure => OpType::Measure,
            Op::Reset => OpType::Reset,
            Op::Barrier => OpType::Barrier,
            Op::CircBox(_) => OpType::CircBox,
            Op::Unitary1qBox(_) => OpType::Unitary1qBox,
        }
    }

    /// Mnemonic used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.op_type().name()
    }

    /// Angle parameters; empty for non-gates.
    pub fn params(&self) -> &[ParameterExpression] {
        match self {
            Op::Gate(g) => g.params(),
            _ => &[],
        }
    }

    /// True if any parameter, including inside boxes, is symbolic.
    pub fn is_symbolic(&self) -> bool {
        match self {
            Op::Gate(g) => g.params().iter().any(ParameterExpression::is_symbolic),
            Op::CircBox(b) => !b.circuit().free_symbols().is_empty(),
            _ => false,
        }
    }
}

impl From<Gate> for Op {
    fn from(gate: Gate) -> Self {
        Op::Gate(gate)
    }
}
