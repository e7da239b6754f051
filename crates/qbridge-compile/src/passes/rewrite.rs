//! Command-list rewrites shared by several passes.

use qbridge_ir::{ClbitId, Command, Gate, Op, OpType, ParameterExpression, QubitId};
use std::f64::consts::PI;

use crate::error::{CompileError, CompileResult};
use crate::unitary::{EPSILON, Unitary2x2};

/// Build an unconditional gate command.
pub(crate) fn gate(
    kind: OpType,
    params: Vec<ParameterExpression>,
    qubits: impl IntoIterator<Item = QubitId>,
) -> CompileResult<Command> {
    Ok(Command::new(Gate::new(kind, params)?, qubits))
}

/// `p · factor`, folded when numeric.
pub(crate) fn scaled(p: &ParameterExpression, factor: f64) -> ParameterExpression {
    match p.evaluate() {
        Some(v) => ParameterExpression::constant(v * factor),
        None => p.clone() * ParameterExpression::constant(factor),
    }
}

/// `a + b`, folded when numeric.
pub(crate) fn sum(a: &ParameterExpression, b: &ParameterExpression) -> ParameterExpression {
    match (a.evaluate(), b.evaluate()) {
        (Some(x), Some(y)) => ParameterExpression::constant(x + y),
        _ => a.clone() + b.clone(),
    }
}

/// U3 command equal to `u` up to the returned global phase.
pub(crate) fn u3_from_unitary(u: &Unitary2x2, qubit: QubitId) -> CompileResult<(Command, f64)> {
    let a = u.u3_angles();
    let cmd = gate(
        OpType::U3,
        vec![a.theta.into(), a.phi.into(), a.lambda.into()],
        [qubit],
    )?;
    Ok((cmd, a.phase))
}

/// Flatten a boxed sub-circuit onto the holding command's arguments.
///
/// Returns the inlined commands and the box's global phase. A phase under
/// a classical condition is unobservable and is reported as zero.
pub(crate) fn inline_box(cmd: &Command) -> CompileResult<(Vec<Command>, f64)> {
    let Op::CircBox(circ_box) = &cmd.op else {
        return Ok((vec![cmd.clone()], 0.0));
    };
    let inner = circ_box.circuit();
    let mut out = Vec::with_capacity(inner.commands().len());
    let mut phase = inner.global_phase();

    for inner_cmd in inner.commands() {
        let mut mapped = remap(inner_cmd, &cmd.qubits, &cmd.bits);
        if let Some(outer) = &cmd.condition {
            if mapped.condition.is_some() {
                return Err(CompileError::PassFailed {
                    name: "DecomposeBoxes".into(),
                    reason: format!("nested classical condition inside box '{}'", inner.name()),
                });
            }
            mapped.condition = Some(outer.clone());
        }
        let (nested, nested_phase) = inline_box(&mapped)?;
        out.extend(nested);
        phase += nested_phase;
    }

    if cmd.condition.is_some() {
        phase = 0.0;
    }
    Ok((out, phase))
}

fn remap(cmd: &Command, qubits: &[QubitId], bits: &[ClbitId]) -> Command {
    let mut out = cmd.clone();
    out.qubits = cmd.qubits.iter().map(|q| qubits[q.0 as usize]).collect();
    out.bits = cmd.bits.iter().map(|b| bits[b.0 as usize]).collect();
    if let Some(cond) = &mut out.condition {
        cond.bits = cond.bits.iter().map(|b| bits[b.0 as usize]).collect();
    }
    out
}

fn squashable(cmd: &Command) -> Option<Unitary2x2> {
    if cmd.condition.is_some() || !cmd.op.op_type().is_single_qubit_unitary() {
        return None;
    }
    Unitary2x2::from_op(&cmd.op)
}

/// Merge every run of two or more adjacent numeric single-qubit
/// unitaries on a qubit into one U3, dropping runs that multiply to
/// identity. Returns the new list, the global phase picked up, and
/// whether anything changed.
pub(crate) fn squash_single_qubit_runs(
    commands: Vec<Command>,
    n_qubits: usize,
) -> CompileResult<(Vec<Command>, f64, bool)> {
    let mut runs: Vec<Vec<(usize, Unitary2x2)>> = vec![vec![]; n_qubits];
    let mut slots: Vec<Option<Command>> = commands.into_iter().map(Some).collect();
    let mut phase = 0.0;
    let mut changed = false;

    for i in 0..slots.len() {
        let Some(cmd) = &slots[i] else { continue };
        if let Some(u) = squashable(cmd) {
            let q = cmd.qubits[0].0 as usize;
            runs[q].push((i, u));
            continue;
        }
        let touched: Vec<usize> = cmd.qubits.iter().map(|q| q.0 as usize).collect();
        for q in touched {
            let run = std::mem::take(&mut runs[q]);
            changed |= flush_run(&mut slots, run, &mut phase)?;
        }
    }
    for run in runs {
        changed |= flush_run(&mut slots, run, &mut phase)?;
    }

    Ok((slots.into_iter().flatten().collect(), phase, changed))
}

fn flush_run(
    slots: &mut [Option<Command>],
    run: Vec<(usize, Unitary2x2)>,
    phase: &mut f64,
) -> CompileResult<bool> {
    if run.len() < 2 {
        return Ok(false);
    }
    let mut product = Unitary2x2::identity();
    for (_, u) in &run {
        product = *u * product;
    }
    let (last, _) = run[run.len() - 1];
    let qubit = slots[last].as_ref().map(|c| c.qubits[0]);
    for (i, _) in &run {
        slots[*i] = None;
    }
    if let Some(alpha) = product.identity_phase() {
        *phase += alpha;
    } else if let Some(qubit) = qubit {
        let (cmd, alpha) = u3_from_unitary(&product, qubit)?;
        slots[last] = Some(cmd);
        *phase += alpha;
    }
    Ok(true)
}

/// Rotation period after which a gate kind is the identity, if it is a
/// one-parameter rotation.
fn rotation_period(kind: OpType) -> Option<f64> {
    match kind {
        OpType::Rx | OpType::Ry | OpType::Rz | OpType::CRx | OpType::CRy | OpType::CRz | OpType::RZZ => {
            Some(4.0 * PI)
        }
        OpType::U1 | OpType::CU1 => Some(2.0 * PI),
        _ => None,
    }
}

fn is_multiple_of(value: f64, period: f64) -> bool {
    let r = value.rem_euclid(period);
    r < EPSILON || (period - r) < EPSILON
}

fn symmetric(kind: OpType) -> bool {
    matches!(kind, OpType::CZ | OpType::Swap | OpType::RZZ | OpType::CU1 | OpType::ISwap)
}

fn self_inverse(kind: OpType) -> bool {
    matches!(
        kind,
        OpType::X
            | OpType::Y
            | OpType::Z
            | OpType::H
            | OpType::CX
            | OpType::CY
            | OpType::CZ
            | OpType::CH
            | OpType::Swap
            | OpType::CCX
            | OpType::CSwap
    )
}

fn inverse_kind(kind: OpType) -> Option<OpType> {
    match kind {
        OpType::S => Some(OpType::Sdg),
        OpType::Sdg => Some(OpType::S),
        OpType::T => Some(OpType::Tdg),
        OpType::Tdg => Some(OpType::T),
        OpType::SX => Some(OpType::SXdg),
        OpType::SXdg => Some(OpType::SX),
        _ => None,
    }
}

/// True if `b` applied right after `a` is the identity.
fn are_inverse(a: &Command, b: &Command) -> bool {
    if a.condition.is_some() || b.condition.is_some() {
        return false;
    }
    let (Op::Gate(ga), Op::Gate(gb)) = (&a.op, &b.op) else {
        return false;
    };
    let same_args = a.qubits == b.qubits
        || (symmetric(ga.kind()) && a.qubits.len() == 2 && a.qubits[0] == b.qubits[1] && a.qubits[1] == b.qubits[0]);
    if !same_args {
        return false;
    }
    if ga.kind() == gb.kind() && self_inverse(ga.kind()) {
        return true;
    }
    if inverse_kind(ga.kind()) == Some(gb.kind()) {
        return true;
    }
    if ga.kind() == gb.kind() {
        if let (Some(period), Some(pa), Some(pb)) =
            (rotation_period(ga.kind()), ga.param_values(), gb.param_values())
        {
            return is_multiple_of(pa[0] + pb[0], period);
        }
    }
    false
}

/// Remove pairs of adjacent mutually inverse gates until none remain.
pub(crate) fn cancel_inverse_pairs(commands: Vec<Command>) -> (Vec<Command>, bool) {
    let mut slots: Vec<Option<Command>> = commands.into_iter().map(Some).collect();
    let mut changed = false;
    loop {
        let mut round = false;
        for i in 0..slots.len() {
            let Some(a) = &slots[i] else { continue };
            let Some(j) = next_touching(&slots, i, &a.qubits) else {
                continue;
            };
            let Some(b) = &slots[j] else { continue };
            if b.qubits.len() == a.qubits.len() && are_inverse(a, b) {
                slots[i] = None;
                slots[j] = None;
                round = true;
            }
        }
        if !round {
            break;
        }
        changed = true;
    }
    (slots.into_iter().flatten().collect(), changed)
}

fn next_touching(slots: &[Option<Command>], after: usize, qubits: &[QubitId]) -> Option<usize> {
    slots
        .iter()
        .enumerate()
        .skip(after + 1)
        .find(|(_, c)| c.as_ref().is_some_and(|c| c.qubits.iter().any(|q| qubits.contains(q))))
        .map(|(j, _)| j)
}

/// True if a gate diagonal in Z on `qubit` commutes with `cmd`.
fn commutes_with_z_on(cmd: &Command, qubit: QubitId) -> bool {
    if cmd.condition.is_some() {
        return false;
    }
    let Op::Gate(g) = &cmd.op else { return false };
    let kind = g.kind();
    if kind.is_diagonal() {
        return true;
    }
    let controls: &[QubitId] = match kind {
        OpType::CX | OpType::CY | OpType::CH | OpType::CRx | OpType::CRy | OpType::CSwap => &cmd.qubits[..1],
        OpType::CCX => &cmd.qubits[..2],
        _ => &[],
    };
    controls.contains(&qubit)
}

/// Merge same-axis rotations on a qubit, moving Z-diagonal rotations
/// backwards through gates they commute with. Returns the new list, the
/// global phase picked up, and whether anything changed.
pub(crate) fn merge_rotations(commands: Vec<Command>) -> CompileResult<(Vec<Command>, f64, bool)> {
    let mut slots: Vec<Option<Command>> = commands.into_iter().map(Some).collect();
    let mut phase = 0.0;
    let mut changed = false;

    for i in 0..slots.len() {
        let Some(first) = &slots[i] else { continue };
        let kind = first.op.op_type();
        if first.condition.is_some() || !matches!(kind, OpType::Rx | OpType::Ry | OpType::Rz | OpType::U1) {
            continue;
        }
        let qubit = first.qubits[0];
        let mut angle = first.op.params()[0].clone();
        let mut merged = false;
        let mut j = i;
        while let Some(next) = next_touching(&slots, j, &[qubit]) {
            let Some(cmd) = &slots[next] else { break };
            if cmd.condition.is_none() && cmd.op.op_type() == kind && cmd.qubits.len() == 1 {
                angle = sum(&angle, &cmd.op.params()[0]);
                slots[next] = None;
                merged = true;
            } else if !(kind.is_diagonal() && cmd.qubits.len() > 1 && commutes_with_z_on(cmd, qubit)) {
                break;
            }
            j = next;
        }
        if !merged {
            continue;
        }
        changed = true;
        let period = rotation_period(kind).unwrap_or(2.0 * PI);
        slots[i] = match angle.evaluate() {
            Some(v) if is_multiple_of(v, period) => None,
            Some(v) if period > 2.0 * PI && is_multiple_of(v, 2.0 * PI) => {
                // Rotation by 2π is -I.
                phase += PI;
                None
            }
            _ => Some(gate(kind, vec![angle], [qubit])?),
        };
    }

    Ok((slots.into_iter().flatten().collect(), phase, changed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_ir::{CircBox, Circuit, Condition};

    fn kinds(commands: &[Command]) -> Vec<OpType> {
        commands.iter().map(Command::op_type).collect()
    }

    #[test]
    fn test_cancel_cx_pair() {
        let mut c = Circuit::with_size("c", 2, 0);
        c.cx(QubitId(0), QubitId(1)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        let (out, changed) = cancel_inverse_pairs(c.commands().to_vec());
        assert!(changed);
        assert!(out.is_empty());
    }

    #[test]
    fn test_reversed_cx_does_not_cancel() {
        let mut c = Circuit::with_size("c", 2, 0);
        c.cx(QubitId(0), QubitId(1)).unwrap().cx(QubitId(1), QubitId(0)).unwrap();
        let (out, changed) = cancel_inverse_pairs(c.commands().to_vec());
        assert!(!changed);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_cancellation_cascades() {
        let mut c = Circuit::with_size("c", 2, 0);
        c.h(QubitId(1)).unwrap();
        c.cz(QubitId(0), QubitId(1)).unwrap();
        c.cz(QubitId(1), QubitId(0)).unwrap();
        c.h(QubitId(1)).unwrap();
        let (out, _) = cancel_inverse_pairs(c.commands().to_vec());
        assert!(out.is_empty());
    }

    #[test]
    fn test_measurement_blocks_cancellation() {
        let mut c = Circuit::with_size("c", 1, 1);
        c.h(QubitId(0)).unwrap();
        c.measure(QubitId(0), ClbitId(0)).unwrap();
        c.h(QubitId(0)).unwrap();
        let (out, changed) = cancel_inverse_pairs(c.commands().to_vec());
        assert!(!changed);
        assert_eq!(kinds(&out), vec![OpType::H, OpType::Measure, OpType::H]);
    }

    #[test]
    fn test_squash_run_to_u3() {
        let mut c = Circuit::with_size("c", 2, 0);
        c.h(QubitId(0)).unwrap().t(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        let (out, _, changed) = squash_single_qubit_runs(c.commands().to_vec(), 2).unwrap();
        assert!(changed);
        assert_eq!(kinds(&out), vec![OpType::U3, OpType::CX]);
    }

    #[test]
    fn test_squash_identity_run_disappears() {
        let mut c = Circuit::with_size("c", 1, 0);
        c.s(QubitId(0)).unwrap().s(QubitId(0)).unwrap().z(QubitId(0)).unwrap();
        let (out, phase, changed) = squash_single_qubit_runs(c.commands().to_vec(), 1).unwrap();
        assert!(changed);
        assert!(out.is_empty());
        assert!(phase.abs() < 1e-9);
    }

    #[test]
    fn test_squash_skips_symbolic_and_conditional() {
        let mut c = Circuit::with_size("c", 1, 1);
        c.rz(ParameterExpression::symbol("a"), QubitId(0)).unwrap();
        c.h(QubitId(0)).unwrap();
        c.conditional(Gate::fixed(OpType::X).unwrap(), [QubitId(0)], Vec::<ClbitId>::new(), Condition::bit(ClbitId(0)))
            .unwrap();
        let (out, _, changed) = squash_single_qubit_runs(c.commands().to_vec(), 1).unwrap();
        assert!(!changed);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_merge_rz_through_cx_control() {
        let mut c = Circuit::with_size("c", 2, 0);
        c.rz(0.25, QubitId(0)).unwrap();
        c.cx(QubitId(0), QubitId(1)).unwrap();
        c.rz(0.5, QubitId(0)).unwrap();
        let (out, _, changed) = merge_rotations(c.commands().to_vec()).unwrap();
        assert!(changed);
        assert_eq!(kinds(&out), vec![OpType::Rz, OpType::CX]);
        assert_eq!(out[0].op.params()[0].evaluate(), Some(0.75));
    }

    #[test]
    fn test_rz_does_not_pass_cx_target() {
        let mut c = Circuit::with_size("c", 2, 0);
        c.rz(0.25, QubitId(1)).unwrap();
        c.cx(QubitId(0), QubitId(1)).unwrap();
        c.rz(0.5, QubitId(1)).unwrap();
        let (_, _, changed) = merge_rotations(c.commands().to_vec()).unwrap();
        assert!(!changed);
    }

    #[test]
    fn test_full_turn_rotation_becomes_phase() {
        let mut c = Circuit::with_size("c", 1, 0);
        c.rx(PI, QubitId(0)).unwrap().rx(PI, QubitId(0)).unwrap();
        let (out, phase, _) = merge_rotations(c.commands().to_vec()).unwrap();
        assert!(out.is_empty());
        assert!((phase - PI).abs() < 1e-12);
    }

    #[test]
    fn test_symbolic_rotations_merge() {
        let mut c = Circuit::with_size("c", 1, 0);
        c.ry(ParameterExpression::symbol("a"), QubitId(0)).unwrap();
        c.ry(0.5, QubitId(0)).unwrap();
        let (out, _, _) = merge_rotations(c.commands().to_vec()).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].op.is_symbolic());
    }

    #[test]
    fn test_inline_box_maps_arguments() {
        let mut inner = Circuit::with_size("inner", 2, 1);
        inner.cx(QubitId(0), QubitId(1)).unwrap();
        inner.measure(QubitId(1), ClbitId(0)).unwrap();
        inner.add_phase(0.5);

        let mut outer = Circuit::with_size("outer", 3, 2);
        outer.add_box(CircBox::new(inner), [QubitId(2), QubitId(0)], [ClbitId(1)]).unwrap();

        let (cmds, phase) = inline_box(&outer.commands()[0]).unwrap();
        assert_eq!(cmds[0].qubits, vec![QubitId(2), QubitId(0)]);
        assert_eq!(cmds[1].qubits, vec![QubitId(0)]);
        assert_eq!(cmds[1].bits, vec![ClbitId(1)]);
        assert!((phase - 0.5).abs() < 1e-12);
    }
}
