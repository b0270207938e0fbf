use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// Numeric type usable by the integrators.
/// Anything float-like that can be built from an `f64` literal qualifies.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {
    /// Converts an `f64` constant into this scalar type.
    fn lit(value: f64) -> Self {
        Self::from_f64(value).unwrap_or_else(Self::nan)
    }
}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A first-order ODE system dx/dt = f(t, x).
pub trait DynamicalSystem<T: Scalar> {
    /// Length of the state vector.
    fn dimension(&self) -> usize;

    /// Writes f(t, x) into `out`.
    /// `x` and `out` both have length `dimension()`.
    fn apply(&self, t: T, x: &[T], out: &mut [T]);
}

/// A fixed-step integrator.
pub trait Steppable<T: Scalar> {
    /// Advances `state` by exactly `dt` and moves `t` forward by `dt`.
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T);

    /// Takes `steps` consecutive steps of size `dt`.
    fn advance(
        &mut self,
        system: &impl DynamicalSystem<T>,
        t: &mut T,
        state: &mut [T],
        dt: T,
        steps: usize,
    ) {
        for _ in 0..steps {
            self.step(system, t, state, dt);
        }
    }
}
