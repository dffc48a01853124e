use crate::constants::*;
use serde::{Deserialize, Serialize};

/// Handling constants for the player craft.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftTuning {
    pub max_acceleration: f64,     // thrust added to geForce per firing
    pub max_angular_velocity: f64, // turn impulse and cap (rad/s)
    pub angular_damping: f64,      // fraction of angular velocity lost per second
    pub collision_radius: f64,     // 0 = point test
    pub initial_heading: f64,      // radians
}

impl Default for CraftTuning {
    fn default() -> Self {
        Self {
            max_acceleration: DEFAULT_CRAFT_MAX_ACCELERATION,
            max_angular_velocity: DEFAULT_CRAFT_MAX_ANGULAR_VELOCITY,
            angular_damping: DEFAULT_CRAFT_ANGULAR_DAMPING,
            collision_radius: 0.0,
            initial_heading: PI / 2.0,
        }
    }
}
