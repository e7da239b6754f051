//! Circuit predicates.
//!
//! A predicate is a structural property a backend requires of every
//! circuit it runs. [`Predicate::verify`] reports the first command that
//! breaks it.

use std::collections::BTreeSet;
use std::fmt;

use qbridge_ir::{Circuit, ClbitId, Op, OpType, QubitId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A set of operation kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSet(BTreeSet<OpType>);

impl GateSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `kind` is a member.
    pub fn contains(&self, kind: OpType) -> bool {
        self.0.contains(&kind)
    }

    /// Add a kind.
    pub fn insert(&mut self, kind: OpType) -> bool {
        self.0.insert(kind)
    }

    /// Members in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = OpType> + '_ {
        self.0.iter().copied()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Union of two sets.
    #[must_use]
    pub fn union(&self, other: &GateSet) -> GateSet {
        GateSet(self.0.union(&other.0).copied().collect())
    }
}

impl FromIterator<OpType> for GateSet {
    fn from_iter<I: IntoIterator<Item = OpType>>(iter: I) -> Self {
        GateSet(iter.into_iter().collect())
    }
}

impl fmt::Display for GateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, kind) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{kind}")?;
        }
        write!(f, "}}")
    }
}

/// A property a circuit must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    /// No command is guarded by classical bits.
    NoClassicalControl,
    /// No command is guarded by a bit written by an earlier measurement.
    NoFastFeedforward,
    /// Measurements are terminal: nothing acts on a measured qubit or bit afterwards.
    NoMidMeasure,
    /// No gate parameter is symbolic.
    NoSymbols,
    /// Every command kind is in the set.
    GateSet(GateSet),
    /// Every unit is `q[i]` or `c[i]`.
    DefaultRegister,
}

/// A predicate that a circuit fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{predicate} violated{}: {detail}", command_context(.command))]
pub struct PredicateViolation {
    /// Name of the failed predicate.
    pub predicate: &'static str,
    /// Index of the offending command, if one is to blame.
    pub command: Option<usize>,
    /// Human-readable description.
    pub detail: String,
}

#[allow(clippy::ref_option)]
fn command_context(command: &Option<usize>) -> String {
    match command {
        Some(i) => format!(" at command {i}"),
        None => String::new(),
    }
}

impl Predicate {
    /// Predicate name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Predicate::NoClassicalControl => "NoClassicalControl",
            Predicate::NoFastFeedforward => "NoFastFeedforward",
            Predicate::NoMidMeasure => "NoMidMeasure",
            Predicate::NoSymbols => "NoSymbols",
            Predicate::GateSet(_) => "GateSet",
            Predicate::DefaultRegister => "DefaultRegister",
        }
    }

    /// Check the circuit, returning the first violation.
    pub fn verify(&self, circuit: &Circuit) -> Result<(), PredicateViolation> {
        let fail = |command: Option<usize>, detail: String| PredicateViolation {
            predicate: self.name(),
            command,
            detail,
        };
        match self {
            Predicate::NoClassicalControl => {
                for (i, cmd) in circuit.commands().iter().enumerate() {
                    if cmd.condition.is_some() {
                        return Err(fail(Some(i), format!("conditional command '{cmd}'")));
                    }
                }
            }
            Predicate::NoFastFeedforward => {
                let mut measured: FxHashSet<ClbitId> = FxHashSet::default();
                for (i, cmd) in circuit.commands().iter().enumerate() {
                    if let Some(cond) = &cmd.condition {
                        if let Some(bit) = cond.bits.iter().find(|b| measured.contains(*b)) {
                            return Err(fail(
                                Some(i),
                                format!("'{cmd}' is conditioned on measured bit {bit}"),
                            ));
                        }
                    }
                    if matches!(cmd.op, Op::Measure) {
                        measured.extend(cmd.bits.iter().copied());
                    }
                }
            }
            Predicate::NoMidMeasure => {
                let mut measured_qubits: FxHashSet<QubitId> = FxHashSet::default();
                let mut measured_bits: FxHashSet<ClbitId> = FxHashSet::default();
                for (i, cmd) in circuit.commands().iter().enumerate() {
                    let barrier = matches!(cmd.op, Op::Barrier) && cmd.condition.is_none();
                    if !barrier {
                        if let Some(q) = cmd.qubits.iter().find(|q| measured_qubits.contains(*q)) {
                            return Err(fail(
                                Some(i),
                                format!("'{cmd}' acts on {q} after it was measured"),
                            ));
                        }
                        if let Some(b) = cmd.all_bits().find(|b| measured_bits.contains(b)) {
                            return Err(fail(
                                Some(i),
                                format!("'{cmd}' uses {b} after a measurement wrote it"),
                            ));
                        }
                    }
                    if cmd.is_measure() {
                        measured_qubits.extend(cmd.qubits.iter().copied());
                        measured_bits.extend(cmd.bits.iter().copied());
                    }
                }
            }
            Predicate::NoSymbols => {
                for (i, cmd) in circuit.commands().iter().enumerate() {
                    if cmd.op.is_symbolic() {
                        return Err(fail(Some(i), format!("'{cmd}' has symbolic parameters")));
                    }
                }
            }
            Predicate::GateSet(set) => {
                for (i, cmd) in circuit.commands().iter().enumerate() {
                    let kind = cmd.op_type();
                    if !set.contains(kind) {
                        return Err(fail(Some(i), format!("gate '{kind}' is not in {set}")));
                    }
                }
            }
            Predicate::DefaultRegister => {
                if let Some(q) = circuit.qubits().iter().find(|q| !q.is_default()) {
                    return Err(fail(None, format!("qubit {q} is outside the default register")));
                }
                if let Some(c) = circuit.clbits().iter().find(|c| !c.is_default()) {
                    return Err(fail(None, format!("bit {c} is outside the default register")));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::GateSet(set) => write!(f, "GateSet{set}"),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_ir::{Condition, Gate, ParameterExpression};

    #[test]
    fn test_mid_measure_detected() {
        let mut circuit = Circuit::with_size("mid", 1, 1);
        circuit.h(QubitId(0)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.x(QubitId(0)).unwrap();

        let err = Predicate::NoMidMeasure.verify(&circuit).unwrap_err();
        assert_eq!(err.predicate, "NoMidMeasure");
        assert_eq!(err.command, Some(2));
    }

    #[test]
    fn test_terminal_measure_passes() {
        let mut circuit = Circuit::bell().unwrap();
        circuit.measure_all().unwrap();
        circuit.barrier_all().unwrap();
        assert!(Predicate::NoMidMeasure.verify(&circuit).is_ok());
    }

    #[test]
    fn test_feedforward_detected() {
        let mut circuit = Circuit::with_size("ff", 2, 1);
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit
            .conditional(
                Gate::fixed(OpType::X).unwrap(),
                [QubitId(1)],
                Vec::<ClbitId>::new(),
                Condition::bit(ClbitId(0)),
            )
            .unwrap();

        assert!(Predicate::NoFastFeedforward.verify(&circuit).is_err());
        assert!(Predicate::NoClassicalControl.verify(&circuit).is_err());
    }

    #[test]
    fn test_condition_without_measurement_is_not_feedforward() {
        let mut circuit = Circuit::with_size("cc", 1, 1);
        circuit
            .conditional(
                Gate::fixed(OpType::X).unwrap(),
                [QubitId(0)],
                Vec::<ClbitId>::new(),
                Condition::bit(ClbitId(0)),
            )
            .unwrap();
        assert!(Predicate::NoFastFeedforward.verify(&circuit).is_ok());
        let err = Predicate::NoClassicalControl.verify(&circuit).unwrap_err();
        assert_eq!(err.command, Some(0));
    }

    #[test]
    fn test_gate_set_names_offending_gate() {
        let set: GateSet = [OpType::H, OpType::CX].into_iter().collect();
        let mut circuit = Circuit::bell().unwrap();
        assert!(Predicate::GateSet(set.clone()).verify(&circuit).is_ok());

        circuit.swap(QubitId(0), QubitId(1)).unwrap();
        let err = Predicate::GateSet(set).verify(&circuit).unwrap_err();
        assert!(err.detail.contains("swap"));
        assert_eq!(err.command, Some(2));
    }

    #[test]
    fn test_symbols_and_registers() {
        let mut circuit = Circuit::new("sym");
        circuit.add_qreg("anc", 1).unwrap();
        circuit.rz(ParameterExpression::symbol("a"), QubitId(0)).unwrap();

        assert!(Predicate::NoSymbols.verify(&circuit).is_err());
        let err = Predicate::DefaultRegister.verify(&circuit).unwrap_err();
        assert_eq!(err.command, None);
        assert!(err.to_string().contains("anc[0]"));
    }
}
