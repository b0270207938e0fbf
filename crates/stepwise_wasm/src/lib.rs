//! WASM bindings for the stepwise numerical cores.
//!
//! Every entry point validates its inputs, runs the core, and hands the
//! result back as a plain JS object.

mod ballistics;
mod conduction;
mod shared;

pub use ballistics::{default_trajectory_ladder, run_trajectory_sweep, simulate_trajectory};
pub use conduction::{calculate_heat, default_heat_ladder, WasmHeatSweepRunner};
