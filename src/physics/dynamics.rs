use super::gravity::GravityField;
use crate::models::craft::KinematicState;
use nalgebra as na;
use serde::{Deserialize, Serialize};

pub trait EquationsOfMotion {
    type State;

    fn compute_derivative(&self, state: &Self::State) -> Self::State;
}

/// Which components of the field force reach the craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalForce {
    /// Drop the y component; the craft flies in the plane.
    #[default]
    Planar,
    /// Full 3-D force.
    Full,
}

impl VerticalForce {
    pub fn apply(&self, force: na::Vector3<f64>) -> na::Vector3<f64> {
        match self {
            VerticalForce::Planar => na::Vector3::new(force.x, 0.0, force.z),
            VerticalForce::Full => force,
        }
    }
}

/// Field force on a unit test mass at the craft, filtered by `vertical`.
pub fn field_force_on_craft(
    field: &GravityField,
    position: &na::Vector3<f64>,
    vertical: VerticalForce,
) -> na::Vector3<f64> {
    vertical.apply(field.net_force_at(position, 1.0))
}

/// Rates for one craft step under a fixed net force.
pub struct CraftDynamics {
    ge_force: na::Vector3<f64>,
    time_scale_factor: f64,
}

impl CraftDynamics {
    pub fn new(ge_force: na::Vector3<f64>, time_scale_factor: f64) -> Self {
        Self {
            ge_force,
            time_scale_factor,
        }
    }
}

impl EquationsOfMotion for CraftDynamics {
    type State = KinematicState;

    fn compute_derivative(&self, state: &KinematicState) -> KinematicState {
        let mut derivative = KinematicState::zero();

        // Position derivative is velocity
        derivative.position = state.velocity;

        // Velocity derivative is the net force, dilated by the scenario time scale
        derivative.velocity = self.ge_force / self.time_scale_factor;

        derivative.heading = state.angular_velocity;

        // Damping is applied outside the integrator
        derivative.angular_velocity = 0.0;

        derivative
    }
}
