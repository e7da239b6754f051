//! Simulator Backend Demo
//!
//! Compiles a standard circuit for the QuEST backend, runs it and prints
//! the most likely basis states.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use qbridge_adapter_quest::{Backend, BackendConfig, BackendFactory, QuestBackend};
use qbridge_demos::{
    DemoCircuit, basis_label, print_header, print_result, print_section, print_success,
    significant_states,
};
use qbridge_hal::{BasisOrder, SubmitOptions};

#[derive(Parser, Debug)]
#[command(name = "demo-quest")]
#[command(about = "Run a circuit on the QuEST simulator backend")]
struct Args {
    /// Circuit to run
    #[arg(short, long, value_enum, default_value = "ghz")]
    circuit: DemoCircuit,

    /// Number of qubits
    #[arg(short = 'n', long, default_value = "3")]
    qubits: u32,

    /// Optimisation level (0-2)
    #[arg(short = 'O', long, default_value = "2")]
    level: u8,

    /// Result type: state_vector or density_matrix
    #[arg(long, default_value = "state_vector")]
    result_type: String,

    /// Measure every qubit at the end
    #[arg(long)]
    measure: bool,

    /// Seed for measurement sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    print_header("QuEST Simulator Backend Demo");

    let config = BackendConfig::new("quest").with_extra("result_type", args.result_type.clone().into());
    let backend = QuestBackend::from_config(config).context("creating backend")?;
    let info = backend.backend_info();
    print_section("Backend");
    print_result("Name", &info.name);
    print_result("Version", &info.version);
    print_result("Result type", backend.result_kind());
    print_result("Max qubits", info.max_qubits);
    print_result("Gate set", &info.gate_set);

    let mut circuit = args.circuit.build(args.qubits).context("building circuit")?;
    if args.measure {
        circuit.measure_all()?;
    }
    print_section("Compilation");
    print_result("Input commands", circuit.commands().len());
    let pass = backend.default_compilation_pass(args.level)?;
    print_result("Passes", pass.pass_names().join(" → "));
    let compiled = backend.get_compiled_circuit(&circuit, args.level)?;
    print_result("Compiled commands", compiled.commands().len());
    print_result("Compiled depth", compiled.depth());

    let mut options = SubmitOptions::new();
    if let Some(seed) = args.seed {
        options = options.with_seed(seed);
    }
    let handle = backend.process_circuit(&compiled, &options)?;
    info!("Circuit submitted as {handle}");
    let status = backend.circuit_status(&handle)?;

    print_section("Result");
    print_result("Handle", &handle);
    print_result("Status", status.status);
    let result = backend.pop_result(&handle)?;
    let n = result.num_qubits();
    for (index, p) in significant_states(&result.probabilities(BasisOrder::Ilo)?, 1e-9).into_iter().take(8) {
        print_result(&basis_label(index, n), format!("{p:.4}"));
    }
    if args.measure {
        let bits: String = result
            .bits()
            .iter()
            .map(|b| match b {
                Some(true) => '1',
                Some(false) => '0',
                None => '-',
            })
            .collect();
        print_result("Measured bits", bits);
    }

    print_success("Done");
    Ok(())
}
