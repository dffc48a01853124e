use crate::physics::dynamics::EquationsOfMotion;

/// Explicit (forward) Euler: the derivative is taken at the start of the step.
pub struct Euler<T: EquationsOfMotion> {
    eom: T,
}

impl<T: EquationsOfMotion> Euler<T>
where
    T::State: Clone + std::ops::Add<Output = T::State> + std::ops::Mul<f64, Output = T::State>,
{
    pub fn new(eom: T) -> Self {
        Euler { eom }
    }

    pub fn integrate(&self, state: &T::State, dt: f64) -> T::State {
        let k1 = self.eom.compute_derivative(state);
        state.clone() + k1 * dt
    }
}
