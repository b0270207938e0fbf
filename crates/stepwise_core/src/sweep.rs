//! Step-size sweeps over the two cores, for studying truncation error as the
//! discretization is refined.
//!
//! Each entry is an independent run with freshly allocated buffers; entries
//! come back in the order the step sizes were given.

use crate::ballistics::{simulate, Trajectory, TrajectoryParameters};
use crate::heat::{calculate_heat, HeatGridSolver, HeatSolution, ThermalParameters};
use crate::params::{require_ladder, ParameterError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Time steps for the trajectory study, coarse to fine.
pub const TRAJECTORY_DT_LADDER: [f64; 5] = [1.0, 0.1, 0.01, 0.001, 0.0001];
/// Time steps for the conduction study.
pub const HEAT_DT_LADDER: [f64; 4] = [0.1, 0.01, 0.001, 0.0001];
/// Spatial steps for the conduction study.
pub const HEAT_H_LADDER: [f64; 4] = [0.1, 0.01, 0.001, 0.0001];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySweepEntry {
    pub dt: f64,
    pub trajectory: Trajectory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatSweepEntry {
    pub dt: f64,
    pub h: f64,
    pub center_temperature: f64,
    pub solution: HeatSolution,
}

/// Flies the projectile in `base` once per entry of `dts`.
/// `base.dt` is ignored.
pub fn trajectory_sweep(base: &TrajectoryParameters, dts: &[f64]) -> Vec<TrajectorySweepEntry> {
    dts.iter()
        .map(|&dt| TrajectorySweepEntry {
            dt,
            trajectory: simulate(&base.with_dt(dt)),
        })
        .collect()
}

/// Solves the rod in `base` for every (dt, h) pair, dt in the outer loop.
/// `base.dt` and `base.step` are ignored.
pub fn heat_sweep(base: &ThermalParameters, dts: &[f64], hs: &[f64]) -> Vec<HeatSweepEntry> {
    let mut entries = Vec::with_capacity(dts.len() * hs.len());
    for &dt in dts {
        for &h in hs {
            let solution = calculate_heat(&base.with_steps(dt, h));
            entries.push(HeatSweepEntry {
                dt,
                h,
                center_temperature: solution.center_temperature,
                solution,
            });
        }
    }
    entries
}

/// Checks the ladder and every parameter set it produces.
pub fn check_trajectory_sweep(base: &TrajectoryParameters, dts: &[f64]) -> Result<()> {
    require_ladder("dt", dts).context("Invalid trajectory sweep.")?;
    for &dt in dts {
        base.with_dt(dt)
            .validate()
            .with_context(|| format!("Invalid trajectory parameters for dt = {dt}."))?;
    }
    Ok(())
}

/// Checks both ladders and every (dt, h) combination.
pub fn check_heat_sweep(base: &ThermalParameters, dts: &[f64], hs: &[f64]) -> Result<()> {
    require_ladder("dt", dts).context("Invalid heat sweep.")?;
    require_ladder("h", hs).context("Invalid heat sweep.")?;
    for &dt in dts {
        for &h in hs {
            validate_pair(base, dt, h)
                .with_context(|| format!("Invalid thermal parameters for dt = {dt}, h = {h}."))?;
        }
    }
    Ok(())
}

pub fn try_trajectory_sweep(
    base: &TrajectoryParameters,
    dts: &[f64],
) -> Result<Vec<TrajectorySweepEntry>> {
    check_trajectory_sweep(base, dts)?;
    Ok(trajectory_sweep(base, dts))
}

pub fn try_heat_sweep(
    base: &ThermalParameters,
    dts: &[f64],
    hs: &[f64],
) -> Result<Vec<HeatSweepEntry>> {
    check_heat_sweep(base, dts, hs)?;
    Ok(heat_sweep(base, dts, hs))
}

fn validate_pair(base: &ThermalParameters, dt: f64, h: f64) -> Result<(), ParameterError> {
    base.with_steps(dt, h).validate()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatSweepProgress {
    pub done: bool,
    pub completed_entries: usize,
    pub total_entries: usize,
    /// Time steps finished in the entry currently being solved.
    pub entry_steps: usize,
    pub entry_total_steps: usize,
}

/// A heat sweep that can be advanced a bounded number of time steps at a
/// time, so an interactive caller can interleave other work or stop early.
///
/// Produces the same entries, in the same order, as [`heat_sweep`].
pub struct HeatSweepRunner {
    base: ThermalParameters,
    pairs: Vec<(f64, f64)>,
    current: Option<HeatGridSolver>,
    entries: Vec<HeatSweepEntry>,
}

impl HeatSweepRunner {
    pub fn new(base: &ThermalParameters, dts: &[f64], hs: &[f64]) -> Self {
        let pairs = dts
            .iter()
            .flat_map(|&dt| hs.iter().map(move |&h| (dt, h)))
            .collect::<Vec<_>>();
        Self {
            base: *base,
            entries: Vec::with_capacity(pairs.len()),
            pairs,
            current: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.entries.len() == self.pairs.len()
    }

    /// Runs at most `max_steps` time steps, spread over as many entries as
    /// they reach. Entries with no time steps complete without consuming any.
    pub fn advance(&mut self, max_steps: usize) -> HeatSweepProgress {
        let mut budget = max_steps;
        while !self.is_done() {
            let (dt, h) = self.pairs[self.entries.len()];
            let base = self.base;
            let solver = self
                .current
                .get_or_insert_with(|| HeatGridSolver::new(&base.with_steps(dt, h)));

            while budget > 0 && !solver.is_finished() {
                solver.step();
                budget -= 1;
            }
            if !solver.is_finished() {
                break;
            }

            if let Some(solver) = self.current.take() {
                let solution = solver.into_solution();
                self.entries.push(HeatSweepEntry {
                    dt,
                    h,
                    center_temperature: solution.center_temperature,
                    solution,
                });
            }
        }
        self.progress()
    }

    pub fn progress(&self) -> HeatSweepProgress {
        let (entry_steps, entry_total_steps) = self
            .current
            .as_ref()
            .map_or((0, 0), |solver| (solver.steps_taken(), solver.total_steps()));
        HeatSweepProgress {
            done: self.is_done(),
            completed_entries: self.entries.len(),
            total_entries: self.pairs.len(),
            entry_steps,
            entry_total_steps,
        }
    }

    /// Entries finished so far, in sweep order.
    pub fn entries(&self) -> &[HeatSweepEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<HeatSweepEntry> {
        self.entries
    }
}

/// |range_{k+1} - range_k| for consecutive sweep entries.
pub fn range_differences(entries: &[TrajectorySweepEntry]) -> Vec<f64> {
    entries
        .windows(2)
        .map(|pair| {
            (pair[1].trajectory.summary.range - pair[0].trajectory.summary.range).abs()
        })
        .collect()
}

/// Observed order of accuracy between consecutive (step, error) samples:
/// p = ln(e_k / e_{k+1}) / ln(h_k / h_{k+1}).
///
/// Pairs with a zero error or equal steps yield NaN.
pub fn observed_orders(samples: &[(f64, f64)]) -> Vec<f64> {
    samples
        .windows(2)
        .map(|pair| {
            let (h0, e0) = pair[0];
            let (h1, e1) = pair[1];
            if e0 == 0.0 || e1 == 0.0 || h0 == h1 {
                return f64::NAN;
            }
            (e0.abs() / e1.abs()).ln() / (h0 / h1).ln()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballistics::GRAVITY;

    #[test]
    fn trajectory_sweep_keeps_ladder_order() {
        let base = TrajectoryParameters::default();
        let entries = trajectory_sweep(&base, &TRAJECTORY_DT_LADDER);
        assert_eq!(entries.len(), 5);
        let dts: Vec<f64> = entries.iter().map(|e| e.dt).collect();
        assert_eq!(dts, TRAJECTORY_DT_LADDER.to_vec());
        for entry in &entries {
            assert_eq!(entry.trajectory, simulate(&base.with_dt(entry.dt)));
        }
    }

    #[test]
    fn repeated_step_sizes_produce_repeated_entries() {
        let entries = trajectory_sweep(&TrajectoryParameters::default(), &[0.01, 0.01]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], entries[1]);
    }

    #[test]
    fn refining_dt_shrinks_range_bias() {
        let base = TrajectoryParameters::new(20.0, 45.0, 0.0, 1.0, 0.0);
        let entries = trajectory_sweep(&base, &[0.1, 0.01, 0.001]);
        let analytic = 400.0 / GRAVITY;
        let errors: Vec<f64> = entries
            .iter()
            .map(|e| (e.trajectory.summary.range - analytic).abs())
            .collect();
        assert!(errors[0] > errors[1] && errors[1] > errors[2], "{errors:?}");

        let diffs = range_differences(&entries);
        assert_eq!(diffs.len(), 2);
        assert!(diffs[1] < diffs[0]);
    }

    #[test]
    fn heat_sweep_nests_h_inside_dt() {
        let base = ThermalParameters::default();
        let dts = [0.5, 0.25];
        let hs = [0.2, 0.1, 0.05];
        let entries = heat_sweep(&base, &dts, &hs);
        let keys: Vec<(f64, f64)> = entries.iter().map(|e| (e.dt, e.h)).collect();
        assert_eq!(
            keys,
            vec![(0.5, 0.2), (0.5, 0.1), (0.5, 0.05), (0.25, 0.2), (0.25, 0.1), (0.25, 0.05)]
        );
        for entry in &entries {
            assert_eq!(entry.center_temperature, entry.solution.center_temperature);
            assert_eq!(
                entry.solution.temperatures.len(),
                crate::heat::node_intervals(base.length, entry.h) + 1
            );
        }
    }

    #[test]
    fn stepped_runner_matches_one_shot_sweep() {
        let base = ThermalParameters::default();
        let dts = [0.5, 0.2];
        let hs = [0.2, 0.1];
        let expected = heat_sweep(&base, &dts, &hs);

        let mut runner = HeatSweepRunner::new(&base, &dts, &hs);
        let first = runner.advance(3);
        assert!(!first.done);
        assert_eq!(first.completed_entries, 0);
        assert_eq!((first.entry_steps, first.entry_total_steps), (3, 4));
        assert_eq!(first.total_entries, 4);

        let mut calls = 1;
        while !runner.advance(3).done {
            calls += 1;
            assert!(calls < 100, "runner stopped making progress");
        }
        assert_eq!(runner.entries().len(), 4);
        assert_eq!(runner.into_entries(), expected);
    }

    #[test]
    fn stepped_runner_with_empty_ladder_is_done_immediately() {
        let mut runner = HeatSweepRunner::new(&ThermalParameters::default(), &[], &[0.1]);
        assert!(runner.is_done());
        let progress = runner.advance(10);
        assert!(progress.done);
        assert_eq!(progress.total_entries, 0);
    }

    #[test]
    fn try_sweeps_reject_bad_ladders() {
        let err = try_trajectory_sweep(&TrajectoryParameters::default(), &[])
            .expect_err("empty ladder");
        assert!(format!("{err:#}").contains("at least one step size"));

        let err = try_trajectory_sweep(&TrajectoryParameters::default(), &[0.1, 0.0])
            .expect_err("zero dt");
        assert!(format!("{err:#}").contains("dt must be positive"));

        let err = try_heat_sweep(&ThermalParameters::default(), &[0.1], &[0.1, 1.0])
            .expect_err("h larger than rod");
        assert!(format!("{err:#}").contains("h = 1"));

        let entries = try_heat_sweep(&ThermalParameters::default(), &[0.1], &[0.1])
            .expect("valid sweep");
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn observed_orders_recover_power_law() {
        let samples: Vec<(f64, f64)> = [0.1, 0.05, 0.025]
            .iter()
            .map(|&h: &f64| (h, 3.0 * h.powi(4)))
            .collect();
        let orders = observed_orders(&samples);
        assert_eq!(orders.len(), 2);
        for p in orders {
            assert!((p - 4.0).abs() < 1e-9);
        }
        assert!(observed_orders(&[(0.1, 0.0), (0.05, 1.0)])[0].is_nan());
        assert!(observed_orders(&[(0.1, 1.0)]).is_empty());
    }
}
