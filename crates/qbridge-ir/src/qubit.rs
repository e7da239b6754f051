//! Qubit and classical bit units.
//!
//! Commands address units by dense position ([`QubitId`], [`ClbitId`]).
//! Each position carries a name made of a register and an index vector,
//! so `q[0]` and `grid[1, 2]` are both valid units.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the default quantum register.
pub const DEFAULT_QUBIT_REGISTER: &str = "q";

/// Name of the default classical register.
pub const DEFAULT_CLBIT_REGISTER: &str = "c";

/// Position of a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Position of a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

/// A named qubit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Qubit {
    /// Register name.
    pub register: String,
    /// Index within the register; more than one entry for multi-dimensional registers.
    pub index: Vec<u32>,
}

impl Qubit {
    /// `q[index]` in the default register.
    pub fn new(index: u32) -> Self {
        Self::with_register(DEFAULT_QUBIT_REGISTER, index)
    }

    /// `register[index]`.
    pub fn with_register(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index: vec![index],
        }
    }

    /// `register[i, j, ...]`.
    pub fn with_index(register: impl Into<String>, index: Vec<u32>) -> Self {
        Self {
            register: register.into(),
            index,
        }
    }

    /// True for `q[i]`.
    pub fn is_default(&self) -> bool {
        self.register == DEFAULT_QUBIT_REGISTER && self.index.len() == 1
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_unit(f, &self.register, &self.index)
    }
}

/// A named classical bit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Clbit {
    /// Register name.
    pub register: String,
    /// Index within the register.
    pub index: Vec<u32>,
}

impl Clbit {
    /// `c[index]` in the default register.
    pub fn new(index: u32) -> Self {
        Self::with_register(DEFAULT_CLBIT_REGISTER, index)
    }

    /// `register[index]`.
    pub fn with_register(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index: vec![index],
        }
    }

    /// `register[i, j, ...]`.
    pub fn with_index(register: impl Into<String>, index: Vec<u32>) -> Self {
        Self {
            register: register.into(),
            index,
        }
    }

    /// True for `c[i]`.
    pub fn is_default(&self) -> bool {
        self.register == DEFAULT_CLBIT_REGISTER && self.index.len() == 1
    }
}

impl fmt::Display for Clbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_unit(f, &self.register, &self.index)
    }
}

fn write_unit(f: &mut fmt::Formatter<'_>, register: &str, index: &[u32]) -> fmt::Result {
    write!(f, "{register}[")?;
    for (i, idx) in index.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{idx}")?;
    }
    write!(f, "]")
}
