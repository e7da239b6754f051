//! Built-in compilation passes.
//!
//! - [`DecomposeBoxes`]: inline boxed sub-circuits and single-qubit unitaries
//! - [`FlattenRegisters`]: rename every unit into the default registers
//! - [`SynthesiseTket`]: light cancellation and single-qubit squashing
//! - [`FullPeepholeOptimise`]: rotation merging iterated to a fixed point
//! - [`AutoRebase`]: rewrite into a target gate set

mod rewrite;

pub mod decompose_boxes;
pub mod flatten_registers;
pub mod peephole;
pub mod rebase;
pub mod synthesise;

pub use decompose_boxes::DecomposeBoxes;
pub use flatten_registers::FlattenRegisters;
pub use peephole::FullPeepholeOptimise;
pub use rebase::AutoRebase;
pub use synthesise::SynthesiseTket;
