//! Heat conduction solves and the stepped (dt, h) sweep runner.

use crate::shared::{js_error, to_js};
use js_sys::Float64Array;
use stepwise_core::heat::{try_calculate_heat, ThermalParameters};
use stepwise_core::sweep::{
    check_heat_sweep, HeatSweepProgress, HeatSweepRunner, HEAT_DT_LADDER, HEAT_H_LADDER,
};
use wasm_bindgen::prelude::*;

#[allow(clippy::too_many_arguments)]
#[wasm_bindgen]
pub fn calculate_heat(
    left_temperature: f64,
    right_temperature: f64,
    length: f64,
    step: f64,
    total_time: f64,
    dt: f64,
    density: f64,
    specific_heat: f64,
    conductivity: f64,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let params = ThermalParameters {
        length,
        step,
        left_temperature,
        right_temperature,
        total_time,
        dt,
        density,
        specific_heat,
        conductivity,
    };
    let solution =
        try_calculate_heat(&params).map_err(|e| js_error("Heat calculation failed", e))?;
    to_js(&solution)
}

/// The step ladder used for both dt and h in the conduction study.
#[wasm_bindgen]
pub fn default_heat_ladder() -> Float64Array {
    debug_assert_eq!(HEAT_DT_LADDER, HEAT_H_LADDER);
    Float64Array::from(&HEAT_DT_LADDER[..])
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn build_heat_runner(
    left_temperature: f64,
    right_temperature: f64,
    length: f64,
    total_time: f64,
    density: f64,
    specific_heat: f64,
    conductivity: f64,
    dts: &[f64],
    hs: &[f64],
) -> anyhow::Result<HeatSweepRunner> {
    let base = ThermalParameters {
        length,
        // Overridden per entry.
        step: length,
        left_temperature,
        right_temperature,
        total_time,
        dt: total_time,
        density,
        specific_heat,
        conductivity,
    };
    check_heat_sweep(&base, dts, hs)?;
    Ok(HeatSweepRunner::new(&base, dts, hs))
}

/// Runs a (dt, h) sweep a batch of time steps per call, so a worker can
/// report progress and stop early between calls.
#[wasm_bindgen]
pub struct WasmHeatSweepRunner {
    runner: HeatSweepRunner,
}

impl WasmHeatSweepRunner {
    pub(crate) fn advance(&mut self, batch_size: u32) -> HeatSweepProgress {
        self.runner.advance(batch_size.max(1) as usize)
    }
}

#[wasm_bindgen]
impl WasmHeatSweepRunner {
    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen(constructor)]
    pub fn new(
        left_temperature: f64,
        right_temperature: f64,
        length: f64,
        total_time: f64,
        density: f64,
        specific_heat: f64,
        conductivity: f64,
        dts: Vec<f64>,
        hs: Vec<f64>,
    ) -> Result<WasmHeatSweepRunner, JsValue> {
        console_error_panic_hook::set_once();

        let runner = build_heat_runner(
            left_temperature,
            right_temperature,
            length,
            total_time,
            density,
            specific_heat,
            conductivity,
            &dts,
            &hs,
        )
        .map_err(|e| js_error("Heat sweep setup failed", e))?;
        Ok(WasmHeatSweepRunner { runner })
    }

    pub fn is_done(&self) -> bool {
        self.runner.is_done()
    }

    pub fn run_steps(&mut self, batch_size: u32) -> Result<JsValue, JsValue> {
        let progress = self.advance(batch_size);
        to_js(&progress)
    }

    pub fn get_progress(&self) -> Result<JsValue, JsValue> {
        to_js(&self.runner.progress())
    }

    /// Entries finished so far; the full table once `is_done()`.
    pub fn get_result(&self) -> Result<JsValue, JsValue> {
        to_js(&self.runner.entries())
    }

    pub fn center_temperatures(&self) -> Float64Array {
        let centers: Vec<f64> = self
            .runner
            .entries()
            .iter()
            .map(|entry| entry.center_temperature)
            .collect();
        Float64Array::from(centers.as_slice())
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde_wasm_bindgen::from_value;
    use stepwise_core::heat::HeatSolution;
    use stepwise_core::sweep::HeatSweepEntry;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn steel_runner() -> WasmHeatSweepRunner {
        WasmHeatSweepRunner::new(
            0.0,
            200.0,
            0.4,
            2.0,
            7800.0,
            460.0,
            46.0,
            vec![0.5, 0.25],
            vec![0.2, 0.1],
        )
        .expect("runner should build")
    }

    #[wasm_bindgen_test]
    fn calculate_heat_returns_profile_over_the_rod() {
        let value = calculate_heat(0.0, 200.0, 0.4, 0.1, 2.0, 0.1, 7800.0, 460.0, 46.0)
            .expect("valid rod");
        let solution: HeatSolution = from_value(value).expect("heat solution");

        assert_eq!(solution.positions.len(), 5);
        assert_eq!(solution.temperatures.len(), 5);
        assert_eq!(solution.positions[4], 0.4);
        assert_eq!(solution.temperatures[0], 0.0);
        assert_eq!(solution.temperatures[4], 200.0);
        assert_eq!(solution.center_temperature, solution.temperatures[2]);
    }

    #[wasm_bindgen_test]
    fn calculate_heat_rejects_zero_conductivity() {
        let message = calculate_heat(0.0, 100.0, 1.0, 0.5, 1.0, 0.1, 1.0, 1.0, 0.0)
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.contains("Heat calculation failed"));
    }

    #[wasm_bindgen_test]
    fn run_steps_reports_progress_until_done() {
        let mut runner = steel_runner();
        let progress: HeatSweepProgress =
            from_value(runner.run_steps(1).expect("progress")).expect("progress shape");
        assert_eq!(progress.total_entries, 4);
        assert_eq!(progress.completed_entries, 0);
        assert_eq!(progress.entry_steps, 1);
        assert!(!progress.done);

        let mut batches = 0;
        while !runner.is_done() {
            runner.run_steps(5).expect("progress");
            batches += 1;
            assert!(batches < 50, "runner stopped making progress");
        }
        let progress: HeatSweepProgress =
            from_value(runner.get_progress().expect("progress")).expect("progress shape");
        assert!(progress.done);
        assert_eq!(progress.completed_entries, 4);
    }

    #[wasm_bindgen_test]
    fn get_result_and_centers_follow_sweep_order() {
        let mut runner = steel_runner();
        while !runner.is_done() {
            runner.run_steps(100).expect("progress");
        }
        let entries: Vec<HeatSweepEntry> =
            from_value(runner.get_result().expect("result")).expect("entries");
        let pairs: Vec<(f64, f64)> = entries.iter().map(|e| (e.dt, e.h)).collect();
        assert_eq!(pairs, vec![(0.5, 0.2), (0.5, 0.1), (0.25, 0.2), (0.25, 0.1)]);

        let centers = runner.center_temperatures().to_vec();
        let expected: Vec<f64> = entries.iter().map(|e| e.center_temperature).collect();
        assert_eq!(centers, expected);
    }

    #[wasm_bindgen_test]
    fn default_heat_ladder_matches_both_step_ladders() {
        assert_eq!(default_heat_ladder().to_vec(), HEAT_DT_LADDER.to_vec());
    }
}
