//! qbridge Demo Suite
//!
//! Small circuits run end to end on the QuEST simulator backend, plus the
//! console helpers the demo binaries share.

use clap::ValueEnum;
use console::style;
use qbridge_ir::{Circuit, IrResult};

/// Circuits the demos can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoCircuit {
    /// Two-qubit Bell pair.
    Bell,
    /// `n`-qubit GHZ state.
    Ghz,
    /// `n`-qubit quantum Fourier transform of `|0…0⟩`.
    Qft,
}

impl DemoCircuit {
    /// Build the circuit over `num_qubits` qubits (Bell ignores the count).
    pub fn build(self, num_qubits: u32) -> IrResult<Circuit> {
        match self {
            DemoCircuit::Bell => Circuit::bell(),
            DemoCircuit::Ghz => Circuit::ghz(num_qubits),
            DemoCircuit::Qft => Circuit::qft(num_qubits),
        }
    }
}

/// `|b_0 b_1 …⟩` for basis index `index` in increasing lexicographic order.
pub fn basis_label(index: usize, num_qubits: usize) -> String {
    format!("|{index:0num_qubits$b}⟩")
}

/// Basis states with probability above `threshold`, largest first.
pub fn significant_states(probabilities: &[f64], threshold: f64) -> Vec<(usize, f64)> {
    let mut states: Vec<_> = probabilities
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, p)| *p > threshold)
        .collect();
    states.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    states
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}
