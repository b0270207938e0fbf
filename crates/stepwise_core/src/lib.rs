//! The `stepwise_core` crate holds two small numerical engines used to study how
//! discretization error shrinks with the step size.
//!
//! Key components:
//! - **Traits**: `Scalar`, `DynamicalSystem` (ODE right-hand sides), `Steppable` (fixed-step solvers).
//! - **Solvers**: classical RK4 with preallocated stage buffers.
//! - **Ballistics**: a projectile under gravity and quadratic drag, flown until it hits the ground.
//! - **Tridiagonal / Heat**: the Thomas algorithm and an implicit 1D conduction solver built on it.
//! - **Sweep**: runs either engine across ladders of step sizes and compares the results.
pub mod ballistics;
pub mod heat;
pub mod params;
pub mod solvers;
pub mod sweep;
pub mod traits;
pub mod tridiagonal;

pub use ballistics::{simulate, try_simulate, Trajectory, TrajectoryParameters};
pub use heat::{calculate_heat, try_calculate_heat, HeatSolution, ThermalParameters};
pub use params::ParameterError;
pub use sweep::{
    heat_sweep, trajectory_sweep, HeatSweepEntry, HeatSweepRunner, TrajectorySweepEntry,
};
