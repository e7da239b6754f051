//! Operation kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of an operation, independent of its parameters and arguments.
///
/// Gate sets and predicates are expressed over `OpType`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpType {
    // Single-qubit Paulis and Cliffords
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// Hadamard.
    H,
    /// sqrt(Z).
    S,
    /// S-dagger.
    Sdg,
    /// Fourth root of Z.
    T,
    /// T-dagger.
    Tdg,
    /// sqrt(X).
    SX,
    /// sqrt(X)-dagger.
    SXdg,

    // Single-qubit rotations
    /// Rotation about X.
    Rx,
    /// Rotation about Y.
    Ry,
    /// Rotation about Z.
    Rz,

    // IBM single-qubit gates
    /// Phase gate U1(λ).
    U1,
    /// U2(φ, λ).
    U2,
    /// General single-qubit gate U3(θ, φ, λ).
    U3,

    // Two-qubit gates
    /// Controlled-X.
    CX,
    /// Controlled-Y.
    CY,
    /// Controlled-Z.
    CZ,
    /// Controlled-Hadamard.
    CH,
    /// Controlled Rx.
    CRx,
    /// Controlled Ry.
    CRy,
    /// Controlled Rz.
    CRz,
    /// Controlled U1.
    CU1,
    /// SWAP.
    Swap,
    /// iSWAP.
    ISwap,
    /// ZZ interaction exp(-iθ/2 Z⊗Z).
    RZZ,

    // Three-qubit gates
    /// Toffoli.
    CCX,
    /// Fredkin.
    CSwap,

    // Non-unitary and structural operations
    /// Computational-basis measurement into a classical bit.
    Measure,
    /// Reset to |0⟩.
    Reset,
    /// Scheduling barrier.
    Barrier,
    /// Boxed sub-circuit.
    CircBox,
    /// Boxed single-qubit unitary matrix.
    Unitary1qBox,
    /// Any operation gated on classical bits.
    Conditional,
}

impl OpType {
    /// Every unitary gate kind with a fixed arity.
    pub const GATES: [OpType; 29] = [
        OpType::X,
        OpType::Y,
        OpType::Z,
        OpType::H,
        OpType::S,
        OpType::Sdg,
        OpType::T,
        OpType::Tdg,
        OpType::SX,
        OpType::SXdg,
        OpType::Rx,
        OpType::Ry,
        OpType::Rz,
        OpType::U1,
        OpType::U2,
        OpType::U3,
        OpType::CX,
        OpType::CY,
        OpType::CZ,
        OpType::CH,
        OpType::CRx,
        OpType::CRy,
        OpType::CRz,
        OpType::CU1,
        OpType::Swap,
        OpType::ISwap,
        OpType::RZZ,
        OpType::CCX,
        OpType::CSwap,
    ];

    /// Lower-case mnemonic.
    pub fn name(self) -> &'static str {
        match self {
            OpType::X => "x",
            OpType::Y => "y",
            OpType::Z => "z",
            OpType::H => "h",
            OpType::S => "s",
            OpType::Sdg => "sdg",
            OpType::T => "t",
            OpType::Tdg => "tdg",
            OpType::SX => "sx",
            OpType::SXdg => "sxdg",
            OpType::Rx => "rx",
            OpType::Ry => "ry",
            OpType::Rz => "rz",
            OpType::U1 => "u1",
            OpType::U2 => "u2",
            OpType::U3 => "u3",
            OpType::CX => "cx",
            OpType::CY => "cy",
            OpType::CZ => "cz",
            OpType::CH => "ch",
            OpType::CRx => "crx",
            OpType::CRy => "cry",
            OpType::CRz => "crz",
            OpType::CU1 => "cu1",
            OpType::Swap => "swap",
            OpType::ISwap => "iswap",
            OpType::RZZ => "rzz",
            OpType::CCX => "ccx",
            OpType::CSwap => "cswap",
            OpType::Measure => "measure",
            OpType::Reset => "reset",
            OpType::Barrier => "barrier",
            OpType::CircBox => "circbox",
            OpType::Unitary1qBox => "unitary1qbox",
            OpType::Conditional => "conditional",
        }
    }

    /// Number of qubits, or `None` when the arity depends on the instance.
    pub fn n_qubits(self) -> Option<usize> {
        match self {
            OpType::X
            | OpType::Y
            | OpType::Z
            | OpType::H
            | OpType::S
            | OpType::Sdg
            | OpType::T
            | OpType::Tdg
            | OpType::SX
            | OpType::SXdg
            | OpType::Rx
            | OpType::Ry
            | OpType::Rz
            | OpType::U1
            | OpType::U2
            | OpType::U3
            | OpType::Measure
            | OpType::Reset
            | OpType::Unitary1qBox => Some(1),

            OpType::CX
            | OpType::CY
            | OpType::CZ
            | OpType::CH
            | OpType::CRx
            | OpType::CRy
            | OpType::CRz
            | OpType::CU1
            | OpType::Swap
            | OpType::ISwap
            | OpType::RZZ => Some(2),

            OpType::CCX | OpType::CSwap => Some(3),

            OpType::Barrier | OpType::CircBox | OpType::Conditional => None,
        }
    }

    /// Number of angle parameters.
    pub fn n_params(self) -> usize {
        match self {
            OpType::Rx
            | OpType::Ry
            | OpType::Rz
            | OpType::U1
            | OpType::CRx
            | OpType::CRy
            | OpType::CRz
            | OpType::CU1
            | OpType::RZZ => 1,
            OpType::U2 => 2,
            OpType::U3 => 3,
            _ => 0,
        }
    }

    /// True for unitary gates with a fixed arity.
    pub fn is_gate(self) -> bool {
        Self::GATES.contains(&self)
    }

    /// True for single-qubit unitaries, including boxed matrices.
    pub fn is_single_qubit_unitary(self) -> bool {
        (self.is_gate() && self.n_qubits() == Some(1)) || self == OpType::Unitary1qBox
    }

    /// True for gates that are diagonal in the computational basis.
    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            OpType::Z
                | OpType::S
                | OpType::Sdg
                | OpType::T
                | OpType::Tdg
                | OpType::Rz
                | OpType::U1
                | OpType::CZ
                | OpType::CRz
                | OpType::CU1
                | OpType::RZZ
        )
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_table_is_consistent() {
        for kind in OpType::GATES {
            assert!(kind.is_gate());
            assert!(kind.n_qubits().is_some(), "{kind} has no fixed arity");
        }
        assert!(!OpType::Measure.is_gate());
        assert!(!OpType::Barrier.is_gate());
    }

    #[test]
    fn test_arity_and_params() {
        assert_eq!(OpType::U3.n_params(), 3);
        assert_eq!(OpType::U2.n_params(), 2);
        assert_eq!(OpType::CU1.n_qubits(), Some(2));
        assert_eq!(OpType::CSwap.n_qubits(), Some(3));
        assert_eq!(OpType::Barrier.n_qubits(), None);
    }

    #[test]
    fn test_single_qubit_unitary() {
        assert!(OpType::H.is_single_qubit_unitary());
        assert!(OpType::Unitary1qBox.is_single_qubit_unitary());
        assert!(!OpType::CX.is_single_qubit_unitary());
        assert!(!OpType::Measure.is_single_qubit_unitary());
    }
}
