//! Gate-set rebasing.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use qbridge_ir::{Circuit, Command, Gate, Op, OpType, ParameterExpression as Param, QubitId};
use tracing::debug;

use super::rewrite::{gate, inline_box, scaled};
use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;
use crate::predicate::GateSet;
use crate::unitary::Unitary2x2;

/// Deepest chain of rewrite rules a single command may go through.
const MAX_EXPANSION_DEPTH: usize = 8;

/// Rewrites every gate outside a target gate set into gates inside it.
///
/// Gates already in the target are left untouched, so running the pass
/// on its own output changes nothing. Measurements, resets and barriers
/// are never rewritten. Multi-qubit gates go through exact CX-based
/// identities; single-qubit gates become U3, or `Rz·Ry·Rz` when U3 is not
/// available. Global phase is tracked for numeric gates.
pub struct AutoRebase {
    target: GateSet,
}

impl AutoRebase {
    /// Rebase into `target`.
    pub fn new(target: GateSet) -> Self {
        Self { target }
    }

    /// The target gate set.
    pub fn target(&self) -> &GateSet {
        &self.target
    }

    fn keep(&self, cmd: &Command) -> bool {
        self.target.contains(cmd.op.op_type()) || matches!(cmd.op, Op::Measure | Op::Reset | Op::Barrier)
    }

    fn not_in_basis(&self, kind: OpType) -> CompileError {
        CompileError::GateNotInBasis {
            op: kind.name().to_string(),
            target: self.target.to_string(),
        }
    }

    fn rebase_command(
        &self,
        cmd: &Command,
        out: &mut Vec<Command>,
        phase: &mut f64,
        depth: usize,
    ) -> CompileResult<()> {
        if self.keep(cmd) {
            out.push(cmd.clone());
            return Ok(());
        }
        let kind = cmd.op.op_type();
        if depth > MAX_EXPANSION_DEPTH {
            return Err(self.not_in_basis(kind));
        }

        let expansion = match &cmd.op {
            Op::CircBox(_) => {
                let (inlined, box_phase) = inline_box(cmd)?;
                *phase += box_phase;
                inlined
            }
            _ if kind.is_single_qubit_unitary() => return self.rebase_single_qubit(cmd, out, phase),
            Op::Gate(g) => {
                let mut cmds = self.expand_multi_qubit(g, &cmd.qubits)?;
                for c in &mut cmds {
                    c.condition.clone_from(&cmd.condition);
                }
                cmds
            }
            _ => return Err(self.not_in_basis(kind)),
        };

        for c in &expansion {
            self.rebase_command(c, out, phase, depth + 1)?;
        }
        Ok(())
    }

    fn rebase_single_qubit(&self, cmd: &Command, out: &mut Vec<Command>, phase: &mut f64) -> CompileResult<()> {
        let (angles, gate_phase): ([Param; 3], f64) = match Unitary2x2::from_op(&cmd.op) {
            Some(u) => {
                let a = u.u3_angles();
                ([a.theta.into(), a.phi.into(), a.lambda.into()], a.phase)
            }
            None => match &cmd.op {
                // Symbolic rotations: the Rz phase cannot be tracked.
                Op::Gate(g) => {
                    let angles = symbolic_u3(g).ok_or_else(|| self.not_in_basis(g.kind()))?;
                    (angles, 0.0)
                }
                _ => return Err(self.not_in_basis(cmd.op.op_type())),
            },
        };
        let unconditional = cmd.condition.is_none();
        if unconditional {
            *phase += gate_phase;
        }

        let qubit = cmd.qubits[0];
        let [theta, phi, lambda] = angles;
        let emitted = if self.target.contains(OpType::U3) {
            vec![gate(OpType::U3, vec![theta, phi, lambda], [qubit])?]
        } else if self.target.contains(OpType::Rz) && self.target.contains(OpType::Ry) {
            // U3(θ, φ, λ) = e^{i(φ+λ)/2} · Rz(φ)·Ry(θ)·Rz(λ)
            if unconditional {
                if let (Some(p), Some(l)) = (phi.evaluate(), lambda.evaluate()) {
                    *phase += (p + l) / 2.0;
                }
            }
            vec![
                gate(OpType::Rz, vec![lambda], [qubit])?,
                gate(OpType::Ry, vec![theta], [qubit])?,
                gate(OpType::Rz, vec![phi], [qubit])?,
            ]
        } else {
            return Err(self.not_in_basis(cmd.op.op_type()));
        };

        for mut c in emitted {
            c.condition.clone_from(&cmd.condition);
            out.push(c);
        }
        Ok(())
    }

    /// One step of exact rewriting toward CX and single-qubit gates.
    fn expand_multi_qubit(&self, g: &Gate, qubits: &[QubitId]) -> CompileResult<Vec<Command>> {
        let fixed = |kind: OpType, qs: &[QubitId]| gate(kind, vec![], qs.iter().copied());
        let rot = |kind: OpType, angle: Param, q: QubitId| gate(kind, vec![angle], [q]);
        let param = || g.params()[0].clone();
        let q = qubits;

        let cmds = match g.kind() {
            OpType::CX if self.target.contains(OpType::CZ) => {
                vec![fixed(OpType::H, &[q[1]])?, fixed(OpType::CZ, q)?, fixed(OpType::H, &[q[1]])?]
            }
            OpType::CY => vec![fixed(OpType::Sdg, &[q[1]])?, fixed(OpType::CX, q)?, fixed(OpType::S, &[q[1]])?],
            OpType::CZ => vec![fixed(OpType::H, &[q[1]])?, fixed(OpType::CX, q)?, fixed(OpType::H, &[q[1]])?],
            OpType::CH => vec![
                rot(OpType::Ry, FRAC_PI_4.into(), q[1])?,
                fixed(OpType::CX, q)?,
                rot(OpType::Ry, (-FRAC_PI_4).into(), q[1])?,
            ],
            OpType::Swap => vec![
                fixed(OpType::CX, &[q[0], q[1]])?,
                fixed(OpType::CX, &[q[1], q[0]])?,
                fixed(OpType::CX, &[q[0], q[1]])?,
            ],
            OpType::ISwap => vec![
                fixed(OpType::S, &[q[0]])?,
                fixed(OpType::S, &[q[1]])?,
                fixed(OpType::H, &[q[0]])?,
                fixed(OpType::CX, &[q[0], q[1]])?,
                fixed(OpType::CX, &[q[1], q[0]])?,
                fixed(OpType::H, &[q[1]])?,
            ],
            OpType::CRx => vec![
                fixed(OpType::H, &[q[1]])?,
                rot(OpType::Rz, scaled(&param(), 0.5), q[1])?,
                fixed(OpType::CX, q)?,
                rot(OpType::Rz, scaled(&param(), -0.5), q[1])?,
                fixed(OpType::CX, q)?,
                fixed(OpType::H, &[q[1]])?,
            ],
            OpType::CRy => vec![
                rot(OpType::Ry, scaled(&param(), 0.5), q[1])?,
                fixed(OpType::CX, q)?,
                rot(OpType::Ry, scaled(&param(), -0.5), q[1])?,
                fixed(OpType::CX, q)?,
            ],
            OpType::CRz => vec![
                rot(OpType::Rz, scaled(&param(), 0.5), q[1])?,
                fixed(OpType::CX, q)?,
                rot(OpType::Rz, scaled(&param(), -0.5), q[1])?,
                fixed(OpType::CX, q)?,
            ],
            OpType::CU1 => vec![
                rot(OpType::U1, scaled(&param(), 0.5), q[0])?,
                fixed(OpType::CX, q)?,
                rot(OpType::U1, scaled(&param(), -0.5), q[1])?,
                fixed(OpType::CX, q)?,
                rot(OpType::U1, scaled(&param(), 0.5), q[1])?,
            ],
            OpType::RZZ => vec![fixed(OpType::CX, q)?, rot(OpType::Rz, param(), q[1])?, fixed(OpType::CX, q)?],
            OpType::CCX => {
                let (a, b, c) = (q[0], q[1], q[2]);
                vec![
                    fixed(OpType::H, &[c])?,
                    fixed(OpType::CX, &[b, c])?,
                    fixed(OpType::Tdg, &[c])?,
                    fixed(OpType::CX, &[a, c])?,
                    fixed(OpType::T, &[c])?,
                    fixed(OpType::CX, &[b, c])?,
                    fixed(OpType::Tdg, &[c])?,
                    fixed(OpType::CX, &[a, c])?,
                    fixed(OpType::T, &[b])?,
                    fixed(OpType::T, &[c])?,
                    fixed(OpType::H, &[c])?,
                    fixed(OpType::CX, &[a, b])?,
                    fixed(OpType::T, &[a])?,
                    fixed(OpType::Tdg, &[b])?,
                    fixed(OpType::CX, &[a, b])?,
                ]
            }
            OpType::CSwap => vec![
                fixed(OpType::CX, &[q[2], q[1]])?,
                fixed(OpType::CCX, &[q[0], q[1], q[2]])?,
                fixed(OpType::CX, &[q[2], q[1]])?,
            ],
            other => return Err(self.not_in_basis(other)),
        };
        Ok(cmds)
    }
}

/// U3 angles of a parametric single-qubit rotation, up to global phase.
fn symbolic_u3(g: &Gate) -> Option<[Param; 3]> {
    let p = g.params();
    let zero = || Param::constant(0.0);
    Some(match g.kind() {
        OpType::Rx => [p[0].clone(), Param::constant(-FRAC_PI_2), Param::constant(FRAC_PI_2)],
        OpType::Ry => [p[0].clone(), zero(), zero()],
        OpType::Rz | OpType::U1 => [zero(), zero(), p[0].clone()],
        OpType::U2 => [Param::constant(FRAC_PI_2), p[0].clone(), p[1].clone()],
        OpType::U3 => [p[0].clone(), p[1].clone(), p[2].clone()],
        _ => return None,
    })
}

impl Pass for AutoRebase {
    fn name(&self) -> &'static str {
        "AutoRebase"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<bool> {
        if circuit.commands().iter().all(|c| self.keep(c)) {
            return Ok(false);
        }
        let mut out = Vec::with_capacity(circuit.commands().len());
        let mut phase = 0.0;
        for cmd in circuit.commands() {
            self.rebase_command(cmd, &mut out, &mut phase, 0)?;
        }
        debug!(
            "Rebased {} commands into {} for target {}",
            circuit.commands().len(),
            out.len(),
            self.target
        );
        circuit.replace_commands(out)?;
        circuit.add_phase(phase);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_ir::{CircBox, ClbitId, Condition};

    fn cx_u3() -> GateSet {
        [OpType::CX, OpType::U3, OpType::Measure].into_iter().collect()
    }

    #[test]
    fn test_gates_in_target_are_untouched() {
        let mut circuit = Circuit::bell().unwrap();
        let target: GateSet = [OpType::H, OpType::CX].into_iter().collect();
        assert!(!AutoRebase::new(target).run(&mut circuit).unwrap());
        assert_eq!(circuit, Circuit::bell().unwrap());
    }

    #[test]
    fn test_everything_lands_in_target() {
        let mut circuit = Circuit::with_size("all", 3, 0);
        circuit.sx(QubitId(0)).unwrap();
        circuit.ch(QubitId(0), QubitId(1)).unwrap();
        circuit.iswap(QubitId(1), QubitId(2)).unwrap();
        circuit.rzz(0.3, QubitId(0), QubitId(2)).unwrap();
        circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
        circuit.cswap(QubitId(2), QubitId(0), QubitId(1)).unwrap();
        circuit.cu1(0.7, QubitId(1), QubitId(0)).unwrap();
        circuit.crx(0.2, QubitId(0), QubitId(1)).unwrap();

        let rebase = AutoRebase::new(cx_u3());
        assert!(rebase.run(&mut circuit).unwrap());
        for cmd in circuit.commands() {
            assert!(cx_u3().contains(cmd.op_type()), "{cmd} escaped the rebase");
        }
        assert!(!rebase.run(&mut circuit).unwrap());
    }

    #[test]
    fn test_cx_via_cz_when_cx_missing() {
        let target: GateSet = [OpType::CZ, OpType::H].into_iter().collect();
        let mut circuit = Circuit::with_size("c", 2, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        AutoRebase::new(target).run(&mut circuit).unwrap();
        let kinds: Vec<_> = circuit.commands().iter().map(Command::op_type).collect();
        assert_eq!(kinds, vec![OpType::H, OpType::CZ, OpType::H]);
    }

    #[test]
    fn test_unreachable_target_errors() {
        let target: GateSet = [OpType::U3].into_iter().collect();
        let mut circuit = Circuit::bell().unwrap();
        let err = AutoRebase::new(target).run(&mut circuit).unwrap_err();
        assert!(matches!(err, CompileError::GateNotInBasis { .. }));
    }

    #[test]
    fn test_zyz_fallback_tracks_phase() {
        let target: GateSet = [OpType::Rz, OpType::Ry].into_iter().collect();
        let mut circuit = Circuit::with_size("c", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        AutoRebase::new(target).run(&mut circuit).unwrap();
        let kinds: Vec<_> = circuit.commands().iter().map(Command::op_type).collect();
        assert_eq!(kinds, vec![OpType::Rz, OpType::Ry, OpType::Rz]);
        // H = e^{iπ/2} · Rz(0)·Ry(π/2)·Rz(π)
        assert!((circuit.global_phase() - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_symbolic_rotation_rebases() {
        let target: GateSet = [OpType::U3].into_iter().collect();
        let mut circuit = Circuit::with_size("c", 1, 0);
        circuit.rx(Param::symbol("t"), QubitId(0)).unwrap();
        AutoRebase::new(target).run(&mut circuit).unwrap();
        assert_eq!(circuit.commands()[0].op_type(), OpType::U3);
        assert!(circuit.free_symbols().contains("t"));
    }

    #[test]
    fn test_condition_is_carried_to_expansion() {
        let mut circuit = Circuit::with_size("c", 2, 1);
        circuit
            .conditional(
                Gate::fixed(OpType::CZ).unwrap(),
                [QubitId(0), QubitId(1)],
                Vec::<ClbitId>::new(),
                Condition::bit(ClbitId(0)),
            )
            .unwrap();
        let mut target = cx_u3();
        target.insert(OpType::Conditional);
        AutoRebase::new(target).run(&mut circuit).unwrap();
        assert_eq!(circuit.commands().len(), 3);
        assert!(circuit.commands().iter().all(|c| c.condition.is_some()));
    }

    #[test]
    fn test_boxes_are_inlined() {
        let mut circuit = Circuit::with_size("c", 2, 0);
        circuit
            .add_box(CircBox::new(Circuit::bell().unwrap()), [QubitId(1), QubitId(0)], Vec::<ClbitId>::new())
            .unwrap();
        AutoRebase::new(cx_u3()).run(&mut circuit).unwrap();
        let kinds: Vec<_> = circuit.commands().iter().map(Command::op_type).collect();
        assert_eq!(kinds, vec![OpType::U3, OpType::CX]);
        assert_eq!(circuit.commands()[1].qubits, vec![QubitId(1), QubitId(0)]);
    }
}
