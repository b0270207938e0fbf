//! Trajectory simulation and dt sweeps.

use crate::shared::{js_error, to_js};
use js_sys::Float64Array;
use serde::{Deserialize, Serialize};
use stepwise_core::ballistics::{try_simulate, TrajectoryParameters};
use stepwise_core::sweep::{
    range_differences, try_trajectory_sweep, TrajectorySweepEntry, TRAJECTORY_DT_LADDER,
};
use wasm_bindgen::prelude::*;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TrajectorySweepPayload {
    entries: Vec<TrajectorySweepEntry>,
    range_differences: Vec<f64>,
}

pub(crate) fn build_trajectory_sweep(
    initial_speed: f64,
    angle_degrees: f64,
    mass: f64,
    area: f64,
    dts: &[f64],
) -> anyhow::Result<TrajectorySweepPayload> {
    // dt is overridden per entry; any valid placeholder works for the base.
    let base = TrajectoryParameters::new(initial_speed, angle_degrees, 1.0, mass, area);
    let entries = try_trajectory_sweep(&base, dts)?;
    let range_differences = range_differences(&entries);
    Ok(TrajectorySweepPayload {
        entries,
        range_differences,
    })
}

#[wasm_bindgen]
pub fn simulate_trajectory(
    initial_speed: f64,
    angle_degrees: f64,
    dt: f64,
    mass: f64,
    area: f64,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let params = TrajectoryParameters::new(initial_speed, angle_degrees, dt, mass, area);
    let trajectory =
        try_simulate(&params).map_err(|e| js_error("Trajectory simulation failed", e))?;
    to_js(&trajectory)
}

#[wasm_bindgen]
pub fn run_trajectory_sweep(
    initial_speed: f64,
    angle_degrees: f64,
    mass: f64,
    area: f64,
    dts: Vec<f64>,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let payload = build_trajectory_sweep(initial_speed, angle_degrees, mass, area, &dts)
        .map_err(|e| js_error("Trajectory sweep failed", e))?;
    to_js(&payload)
}

#[wasm_bindgen]
pub fn default_trajectory_ladder() -> Float64Array {
    Float64Array::from(&TRAJECTORY_DT_LADDER[..])
}
