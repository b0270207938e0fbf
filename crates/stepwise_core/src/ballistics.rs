//! Point-mass projectile under gravity and quadratic drag, integrated with RK4
//! until it returns to the ground.

use crate::params::{require_finite, require_non_negative, require_positive, ParameterError};
use crate::solvers::Rk4;
use crate::traits::{DynamicalSystem, Steppable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Gravitational acceleration, m/s^2.
pub const GRAVITY: f64 = 9.81;
/// Air density, kg/m^3.
pub const AIR_DENSITY: f64 = 1.225;
/// Dimensionless drag coefficient.
pub const DRAG_COEFFICIENT: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryParameters {
    /// Launch speed v0, m/s.
    pub initial_speed: f64,
    /// Launch angle above the horizon, degrees.
    pub angle_degrees: f64,
    pub dt: f64,
    /// Projectile mass, kg.
    pub mass: f64,
    /// Cross-sectional area S, m^2. Zero disables drag.
    pub area: f64,
}

impl Default for TrajectoryParameters {
    fn default() -> Self {
        Self {
            initial_speed: 1.0,
            angle_degrees: 10.0,
            dt: 0.01,
            mass: 1.0,
            area: 0.01,
        }
    }
}

impl TrajectoryParameters {
    pub fn new(initial_speed: f64, angle_degrees: f64, dt: f64, mass: f64, area: f64) -> Self {
        Self {
            initial_speed,
            angle_degrees,
            dt,
            mass,
            area,
        }
    }

    /// Same projectile, different time step.
    pub fn with_dt(&self, dt: f64) -> Self {
        Self { dt, ..*self }
    }

    /// k = C_d * rho * S / (2m)
    pub fn drag_factor(&self) -> f64 {
        DRAG_COEFFICIENT * AIR_DENSITY * self.area / (2.0 * self.mass)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        require_positive("initial speed", self.initial_speed)?;
        require_finite("launch angle", self.angle_degrees)?;
        require_positive("dt", self.dt)?;
        require_positive("mass", self.mass)?;
        require_non_negative("area", self.area)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectileState {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl ProjectileState {
    /// State at the launch point: origin, velocity along the launch angle.
    pub fn launch(params: &TrajectoryParameters) -> Self {
        let (sin, cos) = params.angle_degrees.to_radians().sin_cos();
        Self {
            x: 0.0,
            y: 0.0,
            vx: params.initial_speed * cos,
            vy: params.initial_speed * sin,
        }
    }

    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.vx, self.vy]
    }

    pub fn from_array(values: [f64; 4]) -> Self {
        let [x, y, vx, vy] = values;
        Self { x, y, vx, vy }
    }
}

/// Right-hand side of the projectile equations of motion.
///
/// With v = |(vx, vy)|: dx/dt = vx, dy/dt = vy, dvx/dt = -k vx v,
/// dvy/dt = -g - k vy v.
#[derive(Debug, Clone, Copy)]
pub struct DragDynamics {
    drag_factor: f64,
}

impl DragDynamics {
    pub fn new(params: &TrajectoryParameters) -> Self {
        Self {
            drag_factor: params.drag_factor(),
        }
    }

    pub fn drag_factor(&self) -> f64 {
        self.drag_factor
    }

    /// Derivative (vx, vy, ax, ay) packed into a `ProjectileState`.
    pub fn derivative(&self, state: &ProjectileState) -> ProjectileState {
        let mut out = [0.0; 4];
        self.apply(0.0, &state.to_array(), &mut out);
        ProjectileState::from_array(out)
    }
}

impl DynamicalSystem<f64> for DragDynamics {
    fn dimension(&self) -> usize {
        4
    }

    fn apply(&self, _t: f64, x: &[f64], out: &mut [f64]) {
        let (vx, vy) = (x[2], x[3]);
        let speed = vx.hypot(vy);
        out[0] = vx;
        out[1] = vy;
        out[2] = -self.drag_factor * vx * speed;
        out[3] = -GRAVITY - self.drag_factor * vy * speed;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    /// x of the first state below ground.
    pub range: f64,
    /// Highest accepted y; never below the launch height.
    pub max_height: f64,
    /// Speed of the first state below ground.
    pub final_speed: f64,
    /// RK4 steps taken, including the one that went below ground.
    pub steps: usize,
    pub flight_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Launch point followed by every accepted sample.
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// The rejected state that ended the flight.
    pub terminal: ProjectileState,
    pub summary: TrajectorySummary,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Flies the projectile with fixed-step RK4 until a step lands below y = 0.
///
/// The step that crosses the ground is not recorded and is not interpolated
/// back to y = 0: range and final speed are taken from that overshooting
/// state, so they carry an O(dt) bias that only vanishes as dt -> 0.
///
/// No validation happens here. `dt` must be positive; with `dt == 0` the
/// projectile never lands. Use [`try_simulate`] for checked input.
pub fn simulate(params: &TrajectoryParameters) -> Trajectory {
    let dynamics = DragDynamics::new(params);
    let mut stepper = Rk4::<f64>::new(dynamics.dimension());
    let mut state = ProjectileState::launch(params).to_array();
    let mut t = 0.0;

    let mut x = vec![state[0]];
    let mut y = vec![state[1]];
    let mut max_height = 0.0_f64;
    let mut steps = 0usize;

    // NaN heights fail the comparison too, so non-finite input still terminates.
    while state[1] >= 0.0 {
        stepper.step(&dynamics, &mut t, &mut state, params.dt);
        steps += 1;
        if state[1] >= 0.0 {
            x.push(state[0]);
            y.push(state[1]);
            max_height = max_height.max(state[1]);
        }
    }

    let terminal = ProjectileState::from_array(state);
    Trajectory {
        x,
        y,
        terminal,
        summary: TrajectorySummary {
            range: terminal.x,
            max_height,
            final_speed: terminal.speed(),
            steps,
            flight_time: t,
        },
    }
}

/// Validates `params`, then runs [`simulate`].
pub fn try_simulate(params: &TrajectoryParameters) -> Result<Trajectory> {
    params
        .validate()
        .context("Invalid trajectory parameters.")?;
    Ok(simulate(params))
}
