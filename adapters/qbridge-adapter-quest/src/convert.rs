//! Translation of circuits into simulator programs.
//!
//! The tables below list every operation kind the simulator executes
//! natively. A circuit that passed the backend's predicates only contains
//! these kinds, plus barriers, which are dropped.
//!
//! | Table | Kinds | Engine operations |
//! |-------|-------|-------------------|
//! | [`ONE_QUBIT_GATES`] | X Y Z H S Sdg T Tdg | `pauli_*`, `hadamard`, `s_gate`, `t_gate`, `phase_shift` |
//! | [`ONE_QUBIT_ROTATIONS`] | Rx Ry Rz | `rotate_*` |
//! | [`IBM_GATES`] | U1 U2 U3 | `phase_shift`, `unitary` |
//! | [`TWO_QUBIT_GATES`] | CX CY CZ CRx CRy CRz CU1 Swap | `controlled_*`, `swap` |
//! | [`MEASURE_GATES`] | Measure | `measure` |

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use qbridge_compile::{GateSet, Unitary2x2};
use qbridge_ir::{Circuit, ClbitId, Command, Op, OpType};
use qbridge_sim::{Operation, Program};

use crate::error::{QuestError, QuestResult};

/// Fixed single-qubit gates.
pub const ONE_QUBIT_GATES: &[OpType] = &[
    OpType::X,
    OpType::Y,
    OpType::Z,
    OpType::H,
    OpType::S,
    OpType::Sdg,
    OpType::T,
    OpType::Tdg,
];

/// Single-qubit rotations.
pub const ONE_QUBIT_ROTATIONS: &[OpType] = &[OpType::Rx, OpType::Ry, OpType::Rz];

/// IBM-style single-qubit gates.
pub const IBM_GATES: &[OpType] = &[OpType::U1, OpType::U2, OpType::U3];

/// Measurements.
pub const MEASURE_GATES: &[OpType] = &[OpType::Measure];

/// Two-qubit gates.
pub const TWO_QUBIT_GATES: &[OpType] = &[
    OpType::CX,
    OpType::CY,
    OpType::CZ,
    OpType::CRx,
    OpType::CRy,
    OpType::CRz,
    OpType::CU1,
    OpType::Swap,
];

/// Kinds the rebase pass targets.
pub fn rebase_gate_set() -> GateSet {
    [TWO_QUBIT_GATES, ONE_QUBIT_GATES, ONE_QUBIT_ROTATIONS, MEASURE_GATES, IBM_GATES]
        .concat()
        .into_iter()
        .collect()
}

/// Kinds a submitted circuit may contain.
pub fn gate_set() -> GateSet {
    let mut set = rebase_gate_set();
    set.insert(OpType::Barrier);
    set
}

/// A circuit lowered to engine operations.
#[derive(Debug, Clone)]
pub struct Translation {
    /// Operations over qubit positions `0..n`.
    pub program: Program,
    /// Bit written by each measurement, in program order.
    pub measured_bits: Vec<ClbitId>,
    /// Global phase of the source circuit.
    pub global_phase: f64,
}

/// Lower `circuit` into a simulator program.
///
/// Qubit `QubitId(k)` becomes engine qubit `k`.
pub fn circuit_to_program(circuit: &Circuit) -> QuestResult<Translation> {
    let mut program = Program::new(circuit.num_qubits());
    let mut measured_bits = vec![];

    for (i, cmd) in circuit.commands().iter().enumerate() {
        if cmd.condition.is_some() {
            return Err(QuestError::ClassicalControl {
                command: i,
                op: cmd.op.op_type(),
            });
        }
        match &cmd.op {
            Op::Barrier => {}
            Op::Measure => {
                let bit = cmd.bits.first().copied().ok_or(QuestError::UnsupportedGate {
                    command: i,
                    op: OpType::Measure,
                })?;
                let qubit = cmd.qubits.first().ok_or(QuestError::UnsupportedGate {
                    command: i,
                    op: OpType::Measure,
                })?;
                program.push(Operation::measure(qubit.0 as usize))?;
                measured_bits.push(bit);
            }
            Op::Gate(gate) => {
                let kind = gate.kind();
                let params = gate
                    .param_values()
                    .ok_or(QuestError::SymbolicParameter { command: i, op: kind })?;
                let op = gate_operation(i, kind, &params, cmd)?;
                program.push(op)?;
            }
            other => {
                return Err(QuestError::UnsupportedGate {
                    command: i,
                    op: other.op_type(),
                });
            }
        }
    }

    Ok(Translation {
        program,
        measured_bits,
        global_phase: circuit.global_phase(),
    })
}

fn gate_operation(command: usize, kind: OpType, p: &[f64], cmd: &Command) -> QuestResult<Operation> {
    if kind.n_qubits() != Some(cmd.qubits.len()) || kind.n_params() != p.len() {
        return Err(QuestError::UnsupportedGate { command, op: kind });
    }
    let q = |arg: usize| cmd.qubits[arg].0 as usize;
    let op = match kind {
        OpType::X => Operation::pauli_x(q(0)),
        OpType::Y => Operation::pauli_y(q(0)),
        OpType::Z => Operation::pauli_z(q(0)),
        OpType::H => Operation::hadamard(q(0)),
        OpType::S => Operation::s_gate(q(0)),
        OpType::Sdg => Operation::phase_shift(q(0), -FRAC_PI_2)?,
        OpType::T => Operation::t_gate(q(0)),
        OpType::Tdg => Operation::phase_shift(q(0), -FRAC_PI_4)?,
        OpType::Rx => Operation::rotate_x(q(0), p[0])?,
        OpType::Ry => Operation::rotate_y(q(0), p[0])?,
        OpType::Rz => Operation::rotate_z(q(0), p[0])?,
        OpType::U1 => Operation::phase_shift(q(0), p[0])?,
        OpType::U2 => Operation::unitary(q(0), Unitary2x2::u3(FRAC_PI_2, p[0], p[1]).0)?,
        OpType::U3 => Operation::unitary(q(0), Unitary2x2::u3(p[0], p[1], p[2]).0)?,
        OpType::CX => Operation::controlled_not(q(0), q(1)),
        OpType::CY => Operation::controlled_pauli_y(q(0), q(1)),
        OpType::CZ => Operation::controlled_phase_flip(q(0), q(1)),
        OpType::CRx => Operation::controlled_rotate_x(q(0), q(1), p[0])?,
        OpType::CRy => Operation::controlled_rotate_y(q(0), q(1), p[0])?,
        OpType::CRz => Operation::controlled_rotate_z(q(0), q(1), p[0])?,
        OpType::CU1 => Operation::controlled_phase_shift(q(0), q(1), p[0])?,
        OpType::Swap => Operation::swap(q(0), q(1)),
        other => return Err(QuestError::UnsupportedGate { command, op: other }),
    };
    Ok(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_ir::{Condition, Gate, ParameterExpression, QubitId};

    #[test]
    fn test_tables_cover_gate_set() {
        let set = gate_set();
        assert_eq!(set.len(), 24);
        assert!(set.contains(OpType::Barrier));
        assert!(!rebase_gate_set().contains(OpType::Barrier));
        assert!(!set.contains(OpType::CH));
    }

    #[test]
    fn test_every_table_kind_translates() {
        let mut circuit = Circuit::with_size("all", 2, 1);
        for &kind in [ONE_QUBIT_GATES, ONE_QUBIT_ROTATIONS, IBM_GATES].concat().iter() {
            let arity = match kind {
                OpType::U2 => 2,
                OpType::U3 => 3,
                OpType::Rx | OpType::Ry | OpType::Rz | OpType::U1 => 1,
                _ => 0,
            };
            let params = vec![ParameterExpression::constant(0.3); arity];
            circuit.add_gate(kind, params, [QubitId(0)]).unwrap();
        }
        for &kind in TWO_QUBIT_GATES {
            let params = match kind {
                OpType::CRx | OpType::CRy | OpType::CRz | OpType::CU1 => {
                    vec![ParameterExpression::constant(0.7)]
                }
                _ => vec![],
            };
            circuit.add_gate(kind, params, [QubitId(1), QubitId(0)]).unwrap();
        }
        circuit.barrier_all().unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();

        let translation = circuit_to_program(&circuit).unwrap();
        assert_eq!(translation.program.len(), circuit.commands().len() - 1);
        assert_eq!(translation.measured_bits, vec![ClbitId(0)]);
        let last = translation.program.operations().last().unwrap();
        assert!(last.is_measurement());
    }

    #[test]
    fn test_qubit_positions_preserved() {
        let mut circuit = Circuit::with_size("cx", 3, 0);
        circuit.cx(QubitId(2), QubitId(0)).unwrap();
        let translation = circuit_to_program(&circuit).unwrap();
        assert_eq!(translation.program.num_qubits(), 3);
        assert_eq!(translation.program.operations()[0].qubits(), vec![2, 0]);
    }

    #[test]
    fn test_rejections() {
        let mut toffoli = Circuit::with_size("ccx", 3, 0);
        toffoli.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
        assert!(matches!(
            circuit_to_program(&toffoli),
            Err(QuestError::UnsupportedGate { command: 0, op: OpType::CCX })
        ));

        let mut symbolic = Circuit::with_size("sym", 1, 0);
        symbolic.rz(ParameterExpression::symbol("a"), QubitId(0)).unwrap();
        assert!(matches!(
            circuit_to_program(&symbolic),
            Err(QuestError::SymbolicParameter { op: OpType::Rz, .. })
        ));

        let mut conditional = Circuit::with_size("if", 1, 1);
        conditional
            .conditional(
                Gate::fixed(OpType::X).unwrap(),
                [QubitId(0)],
                Vec::<ClbitId>::new(),
                Condition::bit(ClbitId(0)),
            )
            .unwrap();
        let err = circuit_to_program(&conditional).unwrap_err();
        assert!(matches!(err, QuestError::ClassicalControl { command: 0, .. }));
        assert!(matches!(err.at_circuit(4), qbridge_hal::HalError::UnsupportedCircuit { index: 4, .. }));
    }

    #[test]
    fn test_malformed_command_is_rejected() {
        let short = Command::new(Gate::fixed(OpType::CX).unwrap(), [QubitId(0)]);
        assert!(matches!(
            gate_operation(3, OpType::CX, &[], &short),
            Err(QuestError::UnsupportedGate { command: 3, op: OpType::CX })
        ));

        let rx = Command::new(Gate::fixed(OpType::H).unwrap(), [QubitId(0)]);
        assert!(matches!(
            gate_operation(0, OpType::Rx, &[], &rx),
            Err(QuestError::UnsupportedGate { op: OpType::Rx, .. })
        ));
    }

    #[test]
    fn test_non_finite_angle_is_engine_error() {
        let mut circuit = Circuit::with_size("nan", 1, 0);
        circuit.rx(f64::NAN, QubitId(0)).unwrap();
        let err = circuit_to_program(&circuit).unwrap_err();
        assert!(matches!(err, QuestError::Engine(_)));
        assert!(matches!(qbridge_hal::HalError::from(err), qbridge_hal::HalError::Simulation(_)));
    }
}
