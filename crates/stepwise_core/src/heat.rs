//! Transient 1D conduction in a rod with fixed end temperatures.
//!
//! Backward Euler in time, central differences in space:
//!
//! ```text
//! rho c (T_i - T_i_old) / dt = lambda (T_{i-1} - 2 T_i + T_{i+1}) / h^2
//! ```
//!
//! which rearranges into the tridiagonal rows A = C = lambda / h^2,
//! B = 2 lambda / h^2 + rho c / dt, F_i = -(rho c / dt) T_i_old.
//! B exceeds A + C by rho c / dt, so every row is strictly dominant.

use crate::params::{require_finite, require_positive, ParameterError};
use crate::tridiagonal::{TridiagonalSolver, UniformRows};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalParameters {
    /// Rod length L, m.
    pub length: f64,
    /// Spatial step h, m.
    pub step: f64,
    /// Fixed temperature at x = 0.
    pub left_temperature: f64,
    /// Fixed temperature at x = L.
    pub right_temperature: f64,
    /// Simulated time, s.
    pub total_time: f64,
    pub dt: f64,
    /// Density rho, kg/m^3.
    pub density: f64,
    /// Specific heat c, J/(kg K).
    pub specific_heat: f64,
    /// Thermal conductivity lambda, W/(m K).
    pub conductivity: f64,
}

impl Default for ThermalParameters {
    /// A 0.4 m steel rod held at 0 and 200 degrees for two seconds.
    fn default() -> Self {
        Self {
            length: 0.4,
            step: 0.1,
            left_temperature: 0.0,
            right_temperature: 200.0,
            total_time: 2.0,
            dt: 0.1,
            density: 7800.0,
            specific_heat: 460.0,
            conductivity: 46.0,
        }
    }
}

/// Number of grid intervals Nx = floor(L / h).
///
/// A fractional remainder is dropped, not rejected, and the computed quotient
/// is truncated as-is: 0.3 / 0.1 evaluates just below 3 and yields 2.
pub fn node_intervals(length: f64, step: f64) -> usize {
    (length / step) as usize
}

/// Number of time steps Nt = floor(total_time / dt), same truncation rules
/// as [`node_intervals`].
pub fn time_steps(total_time: f64, dt: f64) -> usize {
    (total_time / dt) as usize
}

impl ThermalParameters {
    /// Same rod and material, different discretization.
    pub fn with_steps(&self, dt: f64, step: f64) -> Self {
        Self { dt, step, ..*self }
    }

    pub fn intervals(&self) -> usize {
        node_intervals(self.length, self.step)
    }

    pub fn time_steps(&self) -> usize {
        time_steps(self.total_time, self.dt)
    }

    /// rho c / dt, the weight of the previous temperature in each row.
    pub fn capacity_rate(&self) -> f64 {
        self.density * self.specific_heat / self.dt
    }

    pub fn rows(&self) -> UniformRows {
        let neighbor = self.conductivity / (self.step * self.step);
        UniformRows {
            lower: neighbor,
            diagonal: 2.0 * neighbor + self.capacity_rate(),
            upper: neighbor,
        }
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        require_positive("rod length", self.length)?;
        require_positive("spatial step", self.step)?;
        require_finite("left temperature", self.left_temperature)?;
        require_finite("right temperature", self.right_temperature)?;
        require_positive("total time", self.total_time)?;
        require_positive("dt", self.dt)?;
        require_positive("density", self.density)?;
        require_positive("specific heat", self.specific_heat)?;
        require_positive("conductivity", self.conductivity)?;
        if self.intervals() == 0 {
            return Err(ParameterError::NoGridCells {
                length: self.length,
                step: self.step,
            });
        }
        if self.time_steps() == 0 {
            return Err(ParameterError::NoTimeSteps {
                total_time: self.total_time,
                dt: self.dt,
            });
        }
        Ok(())
    }
}

/// Node temperatures T[0..=Nx] with T[0] and T[Nx] held at the boundary values.
///
/// Only [`ThermalGrid::new`] builds one, so there is always at least one node.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalGrid {
    temperatures: Vec<f64>,
}

impl ThermalGrid {
    /// Interior nodes start at zero.
    pub fn new(intervals: usize, left: f64, right: f64) -> Self {
        let mut temperatures = vec![0.0; intervals + 1];
        temperatures[0] = left;
        temperatures[intervals] = right;
        Self { temperatures }
    }

    pub fn intervals(&self) -> usize {
        self.temperatures.len() - 1
    }

    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    /// Temperature at index Nx / 2 (integer division).
    pub fn center(&self) -> f64 {
        self.temperatures[self.intervals() / 2]
    }

    pub fn into_temperatures(self) -> Vec<f64> {
        self.temperatures
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatSolution {
    /// Nx + 1 evenly spaced coordinates from 0 to L inclusive.
    pub positions: Vec<f64>,
    pub temperatures: Vec<f64>,
    pub center_temperature: f64,
}

/// Time-steps a [`ThermalGrid`] with the implicit scheme.
///
/// All buffers are sized at construction; stepping swaps the current and
/// next grids instead of allocating.
pub struct HeatGridSolver {
    params: ThermalParameters,
    rows: UniformRows,
    grid: ThermalGrid,
    next: Vec<f64>,
    rhs: Vec<f64>,
    tridiagonal: TridiagonalSolver,
    steps_taken: usize,
}

impl HeatGridSolver {
    pub fn new(params: &ThermalParameters) -> Self {
        let intervals = params.intervals();
        Self {
            params: *params,
            rows: params.rows(),
            grid: ThermalGrid::new(intervals, params.left_temperature, params.right_temperature),
            next: vec![0.0; intervals + 1],
            rhs: vec![0.0; intervals + 1],
            tridiagonal: TridiagonalSolver::new(intervals),
            steps_taken: 0,
        }
    }

    pub fn grid(&self) -> &ThermalGrid {
        &self.grid
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Nt = floor(total_time / dt), fixed at construction.
    pub fn total_steps(&self) -> usize {
        self.params.time_steps()
    }

    pub fn is_finished(&self) -> bool {
        self.steps_taken >= self.total_steps()
    }

    /// Advances the grid by one dt; the new grid replaces the old one in full.
    pub fn step(&mut self) {
        let capacity_rate = self.params.capacity_rate();
        for (f, &old) in self.rhs.iter_mut().zip(&self.grid.temperatures) {
            *f = -capacity_rate * old;
        }
        self.tridiagonal.solve(
            &self.rows,
            &self.rhs,
            self.params.left_temperature,
            self.params.right_temperature,
            &mut self.next,
        );
        std::mem::swap(&mut self.grid.temperatures, &mut self.next);
        self.steps_taken += 1;
    }

    /// Runs the remaining steps up to Nt = floor(total_time / dt).
    pub fn run(mut self) -> HeatSolution {
        while !self.is_finished() {
            self.step();
        }
        self.into_solution()
    }

    /// Packages the current grid, whether or not all steps have run.
    pub fn into_solution(self) -> HeatSolution {
        let intervals = self.grid.intervals();
        let length = self.params.length;
        let positions = (0..=intervals)
            .map(|i| match intervals {
                0 => 0.0,
                n if i == n => length,
                n => length * i as f64 / n as f64,
            })
            .collect();
        let center_temperature = self.grid.center();
        HeatSolution {
            positions,
            temperatures: self.grid.into_temperatures(),
            center_temperature,
        }
    }
}

/// Solves the conduction problem and returns the final temperature profile.
///
/// Nx and Nt come from truncating division and nothing is validated here.
/// A zero spatial step makes Nx saturate to `usize::MAX` and the grid
/// construction panics. A zero dt does the same to Nt, so the run
/// never finishes in practice. Negative steps give Nx or Nt = 0: a single-node
/// grid or an unchanged initial profile. Use [`try_calculate_heat`] for
/// checked input.
pub fn calculate_heat(params: &ThermalParameters) -> HeatSolution {
    HeatGridSolver::new(params).run()
}

/// Validates `params`, then runs [`calculate_heat`].
pub fn try_calculate_heat(params: &ThermalParameters) -> Result<HeatSolution> {
    params
        .validate()
        .context("Invalid thermal parameters.")?;
    Ok(calculate_heat(params))
}
