//! Commands: an operation applied to concrete units.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::op::Op;
use crate::optype::OpType;
use crate::qubit::{ClbitId, QubitId};

/// Classical guard on a command: the command runs only when `bits`,
/// read little-endian, equal `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Bits that are read.
    pub bits: Vec<ClbitId>,
    /// Value the bits must hold.
    pub value: u64,
}

impl Condition {
    /// Guard on a single bit being set.
    pub fn bit(bit: ClbitId) -> Self {
        Self {
            bits: vec![bit],
            value: 1,
        }
    }
}

/// A complete command with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// The operation.
    pub op: Op,
    /// Qubit arguments.
    pub qubits: Vec<QubitId>,
    /// Classical bit arguments (measurement targets, box bits).
    pub bits: Vec<ClbitId>,
    /// Optional classical guard.
    pub condition: Option<Condition>,
}

impl Command {
    /// Unconditional command on qubits only.
    pub fn new(op: impl Into<Op>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            op: op.into(),
            qubits: qubits.into_iter().collect(),
            bits: vec![],
            condition: None,
        }
    }

    /// Measurement of `qubit` into `bit`.
    pub fn measure(qubit: QubitId, bit: ClbitId) -> Self {
        Self {
            op: Op::Measure,
            qubits: vec![qubit],
            bits: vec![bit],
            condition: None,
        }
    }

    /// Attach bit arguments.
    #[must_use]
    pub fn with_bits(mut self, bits: impl IntoIterator<Item = ClbitId>) -> Self {
        self.bits = bits.into_iter().collect();
        self
    }

    /// Attach a classical guard.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Kind of the command; guarded commands report [`OpType::Conditional`].
    pub fn op_type(&self) -> OpType {
        if self.condition.is_some() {
            OpType::Conditional
        } else {
            self.op.op_type()
        }
    }

    /// True if this is a measurement.
    pub fn is_measure(&self) -> bool {
        self.condition.is_none() && matches!(self.op, Op::Measure)
    }

    /// All classical bits the command touches, including its guard.
    pub fn all_bits(&self) -> impl Iterator<Item = ClbitId> + '_ {
        self.bits
            .iter()
            .copied()
            .chain(self.condition.iter().flat_map(|c| c.bits.iter().copied()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(cond) = &self.condition {
            write!(f, "if (")?;
            for (i, b) in cond.bits.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{b}")?;
            }
            write!(f, ") == {} ", cond.value)?;
        }
        write!(f, "{}", self.op.name())?;
        let params = self.op.params();
        if !params.is_empty() {
            write!(f, "(")?;
            for (i, p) in params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{p}")?;
            }
            write!(f, ")")?;
        }
        let mut first = true;
        for q in &self.qubits {
            write!(f, "{}{q}", if first { " " } else { ", " })?;
            first = false;
        }
        for b in &self.bits {
            write!(f, "{}{b}", if first { " " } else { ", " })?;
            first = false;
        }
        Ok(())
    }
}
