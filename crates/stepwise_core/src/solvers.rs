use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Classical fourth-order Runge-Kutta stepper.
///
/// Stage derivatives and the probe state live in buffers sized once at
/// construction, so stepping never allocates. Local truncation error is
/// O(dt^5), global error over a fixed horizon O(dt^4).
pub struct Rk4<T: Scalar> {
    stages: [Vec<T>; 4],
    probe: Vec<T>,
}

impl<T: Scalar> Rk4<T> {
    pub fn new(dim: usize) -> Self {
        let zero = T::zero();
        Self {
            stages: [vec![zero; dim], vec![zero; dim], vec![zero; dim], vec![zero; dim]],
            probe: vec![zero; dim],
        }
    }

    pub fn dimension(&self) -> usize {
        self.probe.len()
    }
}

/// out = base + scale * slope
fn offset<T: Scalar>(base: &[T], slope: &[T], scale: T, out: &mut [T]) {
    for ((o, &b), &s) in out.iter_mut().zip(base).zip(slope) {
        *o = b + scale * s;
    }
}

impl<T: Scalar> Steppable<T> for Rk4<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        debug_assert_eq!(state.len(), self.probe.len());
        let half_dt = dt * T::lit(0.5);
        let t0 = *t;
        let [k1, k2, k3, k4] = &mut self.stages;

        system.apply(t0, state, k1);

        offset(state, k1, half_dt, &mut self.probe);
        system.apply(t0 + half_dt, &self.probe, k2);

        offset(state, k2, half_dt, &mut self.probe);
        system.apply(t0 + half_dt, &self.probe, k3);

        offset(state, k3, dt, &mut self.probe);
        system.apply(t0 + dt, &self.probe, k4);

        let two = T::lit(2.0);
        let weight = dt / T::lit(6.0);
        for i in 0..state.len() {
            state[i] = state[i] + weight * (k1[i] + two * k2[i] + two * k3[i] + k4[i]);
        }

        *t = t0 + dt;
    }
}
