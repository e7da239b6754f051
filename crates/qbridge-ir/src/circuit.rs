//! High-level circuit builder API.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::PI;

use crate::command::{Command, Condition};
use crate::error::{IrError, IrResult};
use crate::op::{CircBox, Gate, Op, Unitary1qBox};
use crate::optype::OpType;
use crate::parameter::ParameterExpression;
use crate::qubit::{Clbit, ClbitId, DEFAULT_CLBIT_REGISTER, DEFAULT_QUBIT_REGISTER, Qubit, QubitId};

/// A quantum circuit.
///
/// An ordered list of commands over declared qubits and classical bits.
/// Every command added through the builder is checked for arity,
/// parameter count, unit existence and repeated arguments. Deserialized
/// circuits go through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCircuit")]
pub struct Circuit {
    name: String,
    qubits: Vec<Qubit>,
    clbits: Vec<Clbit>,
    commands: Vec<Command>,
    /// Global phase in radians.
    global_phase: f64,
}

/// Serialized form of [`Circuit`], replayed through the builder checks.
#[derive(Deserialize)]
struct RawCircuit {
    name: String,
    qubits: Vec<Qubit>,
    clbits: Vec<Clbit>,
    commands: Vec<Command>,
    global_phase: f64,
}

impl TryFrom<RawCircuit> for Circuit {
    type Error = IrError;

    fn try_from(raw: RawCircuit) -> IrResult<Self> {
        let mut circuit = Circuit::new(raw.name);
        for qubit in raw.qubits {
            circuit.add_named_qubit(qubit)?;
        }
        for clbit in raw.clbits {
            circuit.add_named_clbit(clbit)?;
        }
        circuit.replace_commands(raw.commands)?;
        circuit.global_phase = raw.global_phase;
        Ok(circuit)
    }
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            commands: vec![],
            global_phase: 0.0,
        }
    }

    /// Create a circuit with `q[0..n)` and `c[0..m)`.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    /// Append the next free qubit of the default register.
    pub fn add_qubit(&mut self) -> QubitId {
        let index = next_default_index(self.qubits.iter().map(|q| (&q.register, &q.index)), DEFAULT_QUBIT_REGISTER);
        self.qubits.push(Qubit::new(index));
        QubitId(self.qubits.len() as u32 - 1)
    }

    /// Append a named qubit.
    pub fn add_named_qubit(&mut self, qubit: Qubit) -> IrResult<QubitId> {
        if self.qubits.contains(&qubit) {
            return Err(IrError::DuplicateUnit(qubit.to_string()));
        }
        self.qubits.push(qubit);
        Ok(QubitId(self.qubits.len() as u32 - 1))
    }

    /// Append a quantum register `name[0..size)`.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Vec<QubitId>> {
        let name = name.into();
        (0..size)
            .map(|i| self.add_named_qubit(Qubit::with_register(name.clone(), i)))
            .collect()
    }

    /// Append the next free bit of the default classical register.
    pub fn add_clbit(&mut self) -> ClbitId {
        let index = next_default_index(self.clbits.iter().map(|c| (&c.register, &c.index)), DEFAULT_CLBIT_REGISTER);
        self.clbits.push(Clbit::new(index));
        ClbitId(self.clbits.len() as u32 - 1)
    }

    /// Append a named classical bit.
    pub fn add_named_clbit(&mut self, clbit: Clbit) -> IrResult<ClbitId> {
        if self.clbits.contains(&clbit) {
            return Err(IrError::DuplicateUnit(clbit.to_string()));
        }
        self.clbits.push(clbit);
        Ok(ClbitId(self.clbits.len() as u32 - 1))
    }

    /// Append a classical register `name[0..size)`.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Vec<ClbitId>> {
        let name = name.into();
        (0..size)
            .map(|i| self.add_named_clbit(Clbit::with_register(name.clone(), i)))
            .collect()
    }

    // =========================================================================
    // Generic command entry points
    // =========================================================================

    /// Validate and append a command.
    pub fn add_command(&mut self, command: Command) -> IrResult<&mut Self> {
        self.validate_command(&command)?;
        self.commands.push(command);
        Ok(self)
    }

    /// Append a gate of any kind.
    pub fn add_gate(
        &mut self,
        kind: OpType,
        params: Vec<ParameterExpression>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let gate = Gate::new(kind, params)?;
        self.add_command(Command::new(gate, qubits))
    }

    /// Append a boxed sub-circuit acting on `qubits` and `bits`.
    pub fn add_box(
        &mut self,
        circ_box: CircBox,
        qubits: impl IntoIterator<Item = QubitId>,
        bits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<&mut Self> {
        self.add_command(Command::new(Op::CircBox(circ_box), qubits).with_bits(bits))
    }

    /// Append a boxed single-qubit unitary.
    pub fn add_unitary1q(&mut self, unitary: Unitary1qBox, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_command(Command::new(Op::Unitary1qBox(unitary), [qubit]))
    }

    /// Append `op` guarded by `condition`.
    pub fn conditional(
        &mut self,
        op: impl Into<Op>,
        qubits: impl IntoIterator<Item = QubitId>,
        bits: impl IntoIterator<Item = ClbitId>,
        condition: Condition,
    ) -> IrResult<&mut Self> {
        self.add_command(
            Command::new(op, qubits)
                .with_bits(bits)
                .with_condition(condition),
        )
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::X, vec![], [qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::Y, vec![], [qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::Z, vec![], [qubit])
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::H, vec![], [qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::S, vec![], [qubit])
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::Sdg, vec![], [qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::T, vec![], [qubit])
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::Tdg, vec![], [qubit])
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::SX, vec![], [qubit])
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::SXdg, vec![], [qubit])
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: impl Into<ParameterExpression>, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::Rx, vec![theta.into()], [qubit])
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: impl Into<ParameterExpression>, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::Ry, vec![theta.into()], [qubit])
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: impl Into<ParameterExpression>, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::Rz, vec![theta.into()], [qubit])
    }

    /// Apply U1 phase gate.
    pub fn u1(&mut self, lambda: impl Into<ParameterExpression>, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::U1, vec![lambda.into()], [qubit])
    }

    /// Apply U2 gate.
    pub fn u2(
        &mut self,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.add_gate(OpType::U2, vec![phi.into(), lambda.into()], [qubit])
    }

    /// Apply U3 gate.
    pub fn u3(
        &mut self,
        theta: impl Into<ParameterExpression>,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.add_gate(OpType::U3, vec![theta.into(), phi.into(), lambda.into()], [qubit])
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::CX, vec![], [control, target])
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::CY, vec![], [control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::CZ, vec![], [control, target])
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::CH, vec![], [control, target])
    }

    /// Apply controlled-Rx gate.
    pub fn crx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.add_gate(OpType::CRx, vec![theta.into()], [control, target])
    }

    /// Apply controlled-Ry gate.
    pub fn cry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.add_gate(OpType::CRy, vec![theta.into()], [control, target])
    }

    /// Apply controlled-Rz gate.
    pub fn crz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.add_gate(OpType::CRz, vec![theta.into()], [control, target])
    }

    /// Apply controlled-U1 gate.
    pub fn cu1(
        &mut self,
        lambda: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.add_gate(OpType::CU1, vec![lambda.into()], [control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::Swap, vec![], [q1, q2])
    }

    /// Apply iSWAP gate.
    pub fn iswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::ISwap, vec![], [q1, q2])
    }

    /// Apply ZZ rotation gate.
    pub fn rzz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        q1: QubitId,
        q2: QubitId,
    ) -> IrResult<&mut Self> {
        self.add_gate(OpType::RZZ, vec![theta.into()], [q1, q2])
    }

    // =========================================================================
    // Three-qubit gates
    // =========================================================================

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::CCX, vec![], [c1, c2, target])
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.add_gate(OpType::CSwap, vec![], [control, t1, t2])
    }

    // =========================================================================
    // Non-unitary operations
    // =========================================================================

    /// Measure `qubit` into `clbit`.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.add_command(Command::measure(qubit, clbit))
    }

    /// Measure every qubit `i` into bit `i`, adding default bits as needed.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.clbits.len() < self.qubits.len() {
            self.add_clbit();
        }
        for i in 0..self.qubits.len() as u32 {
            self.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(self)
    }

    /// Reset `qubit` to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_command(Command::new(Op::Reset, [qubit]))
    }

    /// Barrier over `qubits`.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.add_command(Command::new(Op::Barrier, qubits))
    }

    /// Barrier over every qubit.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = (0..self.qubits.len() as u32).map(QubitId).collect();
        self.barrier(qubits)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Qubit names, indexed by [`QubitId`].
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Classical bit names, indexed by [`ClbitId`].
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Commands in program order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Global phase in radians.
    pub fn global_phase(&self) -> f64 {
        self.global_phase
    }

    /// Add to the global phase.
    pub fn add_phase(&mut self, phase: f64) {
        self.global_phase = (self.global_phase + phase).rem_euclid(2.0 * PI);
    }

    /// Replace the command list, validating every command.
    ///
    /// On error the circuit is left unchanged.
    pub fn replace_commands(&mut self, commands: Vec<Command>) -> IrResult<()> {
        for cmd in &commands {
            self.validate_command(cmd)?;
        }
        self.commands = commands;
        Ok(())
    }

    /// Rename every unit. Positions, and therefore commands, are unchanged.
    pub fn rename_units(&mut self, qubits: Vec<Qubit>, clbits: Vec<Clbit>) -> IrResult<()> {
        if qubits.len() != self.qubits.len() {
            return Err(IrError::ArityMismatch {
                op: "rename".into(),
                unit: "qubit",
                expected: self.qubits.len(),
                got: qubits.len(),
            });
        }
        if clbits.len() != self.clbits.len() {
            return Err(IrError::ArityMismatch {
                op: "rename".into(),
                unit: "bit",
                expected: self.clbits.len(),
                got: clbits.len(),
            });
        }
        let mut seen = FxHashSet::default();
        if let Some(dup) = qubits.iter().find(|q| !seen.insert(*q)) {
            return Err(IrError::DuplicateUnit(dup.to_string()));
        }
        let mut seen = FxHashSet::default();
        if let Some(dup) = clbits.iter().find(|c| !seen.insert(*c)) {
            return Err(IrError::DuplicateUnit(dup.to_string()));
        }
        self.qubits = qubits;
        self.clbits = clbits;
        Ok(())
    }

    /// True if every unit lives in the default registers `q` / `c` with a
    /// single index.
    pub fn is_default_register(&self) -> bool {
        self.qubits.iter().all(Qubit::is_default) && self.clbits.iter().all(Clbit::is_default)
    }

    /// Number of command layers. Barriers synchronize their wires but add
    /// no depth.
    pub fn depth(&self) -> usize {
        let mut qubit_level = vec![0usize; self.qubits.len()];
        let mut clbit_level = vec![0usize; self.clbits.len()];
        let mut depth = 0;
        for cmd in &self.commands {
            let current = cmd
                .qubits
                .iter()
                .map(|q| qubit_level[q.0 as usize])
                .chain(cmd.all_bits().map(|c| clbit_level[c.0 as usize]))
                .max()
                .unwrap_or(0);
            let next = if matches!(cmd.op, Op::Barrier) { current } else { current + 1 };
            for q in &cmd.qubits {
                qubit_level[q.0 as usize] = next;
            }
            for c in cmd.all_bits() {
                clbit_level[c.0 as usize] = next;
            }
            depth = depth.max(next);
        }
        depth
    }

    /// Number of commands of each kind.
    pub fn count_ops(&self) -> FxHashMap<OpType, usize> {
        let mut counts = FxHashMap::default();
        for cmd in &self.commands {
            *counts.entry(cmd.op_type()).or_insert(0) += 1;
        }
        counts
    }

    /// Free symbols in gate parameters, including inside boxes.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for cmd in &self.commands {
            match &cmd.op {
                Op::Gate(g) => {
                    for p in g.params() {
                        p.collect_symbols(&mut out);
                    }
                }
                Op::CircBox(b) => out.extend(b.circuit().free_symbols()),
                _ => {}
            }
        }
        out
    }

    /// Substitute numeric values for symbols, including inside boxes.
    pub fn bind(&mut self, values: &FxHashMap<String, f64>) -> &mut Self {
        for cmd in &mut self.commands {
            match &mut cmd.op {
                Op::Gate(g) => {
                    for p in g.params_mut() {
                        *p = p.substitute(values);
                    }
                }
                Op::CircBox(b) => {
                    b.circuit_mut().bind(values);
                }
                _ => {}
            }
        }
        self
    }

    fn validate_command(&self, cmd: &Command) -> IrResult<()> {
        let name = cmd.op.name();
        let (qubits, bits) = match &cmd.op {
            Op::Gate(g) => {
                if g.params().len() != g.kind().n_params() {
                    return Err(IrError::ParameterCountMismatch {
                        op: name.into(),
                        expected: g.kind().n_params(),
                        got: g.params().len(),
                    });
                }
                (g.kind().n_qubits(), Some(0))
            }
            Op::Measure => (Some(1), Some(1)),
            Op::Reset | Op::Unitary1qBox(_) => (Some(1), Some(0)),
            Op::Barrier => (None, None),
            Op::CircBox(b) => (Some(b.circuit().num_qubits()), Some(b.circuit().num_clbits())),
        };
        check_arity(name, "qubit", qubits, cmd.qubits.len())?;
        check_arity(name, "bit", bits, cmd.bits.len())?;

        let mut seen = FxHashSet::default();
        for &q in &cmd.qubits {
            if q.0 as usize >= self.qubits.len() {
                return Err(IrError::QubitNotFound {
                    qubit: q,
                    op: Some(name.into()),
                });
            }
            if !seen.insert(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    op: Some(name.into()),
                });
            }
        }

        let guard_bits = cmd.condition.iter().flat_map(|c| c.bits.iter().copied());
        for group in [cmd.bits.iter().copied().collect::<Vec<_>>(), guard_bits.collect()] {
            let mut seen = FxHashSet::default();
            for c in group {
                if c.0 as usize >= self.clbits.len() {
                    return Err(IrError::ClbitNotFound {
                        clbit: c,
                        op: Some(name.into()),
                    });
                }
                if !seen.insert(c) {
                    return Err(IrError::DuplicateClbit {
                        clbit: c,
                        op: Some(name.into()),
                    });
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Standard circuits
    // =========================================================================

    /// Bell state preparation `(|00⟩ + |11⟩)/√2`, unmeasured.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 0);
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        Ok(circuit)
    }

    /// `n`-qubit GHZ state preparation, unmeasured.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size("ghz", n, 0);
        if n == 0 {
            return Ok(circuit);
        }
        circuit.h(QubitId(0))?;
        for i in 1..n {
            circuit.cx(QubitId(i - 1), QubitId(i))?;
        }
        Ok(circuit)
    }

    /// `n`-qubit quantum Fourier transform including the final reversal swaps.
    pub fn qft(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size("qft", n, 0);
        for i in 0..n {
            circuit.h(QubitId(i))?;
            for j in (i + 1)..n {
                let angle = PI / f64::from(1u32 << (j - i));
                circuit.cu1(angle, QubitId(j), QubitId(i))?;
            }
        }
        for i in 0..n / 2 {
            circuit.swap(QubitId(i), QubitId(n - 1 - i))?;
        }
        Ok(circuit)
    }
}

fn check_arity(op: &str, unit: &'static str, expected: Option<usize>, got: usize) -> IrResult<()> {
    match expected {
        Some(expected) if expected != got => Err(IrError::ArityMismatch {
            op: op.into(),
            unit,
            expected,
            got,
        }),
        _ => Ok(()),
    }
}

fn next_default_index<'a>(
    units: impl Iterator<Item = (&'a String, &'a Vec<u32>)>,
    register: &str,
) -> u32 {
    units
        .filter(|(reg, idx)| reg.as_str() == register && idx.len() == 1)
        .map(|(_, idx)| idx[0] + 1)
        .max()
        .unwrap_or(0)
}
