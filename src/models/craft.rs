use crate::config::craft::CraftTuning;
use crate::constants::TWO_PI;
use crate::integrators::euler::Euler;
use crate::physics::dynamics::CraftDynamics;
use nalgebra as na;

/// Integrated part of the craft state. Heading is a yaw angle about +y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    pub position: na::Vector3<f64>,
    pub velocity: na::Vector3<f64>,
    pub heading: f64,
    pub angular_velocity: f64,
}

impl KinematicState {
    pub fn new(position: na::Vector3<f64>, heading: f64) -> Self {
        Self {
            position,
            velocity: na::Vector3::zeros(),
            heading,
            angular_velocity: 0.0,
        }
    }

    pub fn zero() -> Self {
        Self::new(na::Vector3::zeros(), 0.0)
    }
}

impl std::ops::Add for KinematicState {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        KinematicState {
            position: self.position + other.position,
            velocity: self.velocity + other.velocity,
            heading: self.heading + other.heading,
            angular_velocity: self.angular_velocity + other.angular_velocity,
        }
    }
}

impl std::ops::Mul<f64> for KinematicState {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        KinematicState {
            position: self.position * scalar,
            velocity: self.velocity * scalar,
            heading: self.heading * scalar,
            angular_velocity: self.angular_velocity * scalar,
        }
    }
}

/// Wraps an angle into [0, 2π).
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TWO_PI);
    // rem_euclid can round up to exactly 2π for tiny negative inputs
    if wrapped >= TWO_PI {
        0.0
    } else {
        wrapped
    }
}

/// Unit vector the craft points along for a given heading.
pub fn forward(heading: f64) -> na::Vector3<f64> {
    na::Vector3::new(heading.sin(), 0.0, heading.cos())
}

#[derive(Debug, Clone)]
pub struct Craft {
    pub state: KinematicState,
    /// Net force accumulated during the current tick, kept for telemetry.
    pub ge_force: na::Vector3<f64>,
    pub tuning: CraftTuning,
    thrusters_firing: bool,
    is_alive: bool,
    spawn: KinematicState,
}

impl Craft {
    pub fn new(tuning: CraftTuning, spawn_position: na::Vector3<f64>, spawn_heading: f64) -> Self {
        let spawn = KinematicState::new(spawn_position, wrap_angle(spawn_heading));
        Self {
            state: spawn,
            ge_force: na::Vector3::zeros(),
            tuning,
            thrusters_firing: false,
            is_alive: true,
            spawn,
        }
    }

    pub fn position(&self) -> na::Vector3<f64> {
        self.state.position
    }

    pub fn velocity(&self) -> na::Vector3<f64> {
        self.state.velocity
    }

    pub fn heading(&self) -> f64 {
        self.state.heading
    }

    pub fn angular_velocity(&self) -> f64 {
        self.state.angular_velocity
    }

    pub fn is_alive(&self) -> bool {
        self.is_alive
    }

    pub fn thrusters_firing(&self) -> bool {
        self.thrusters_firing
    }

    pub fn spawn_position(&self) -> na::Vector3<f64> {
        self.spawn.position
    }

    pub fn fire_thrusters(&mut self) {
        self.thrusters_firing = true;
    }

    /// Consumes the thruster flag. Returns the thrust to add to `ge_force`, if any.
    pub fn take_thrust(&mut self) -> Option<na::Vector3<f64>> {
        if !self.thrusters_firing {
            return None;
        }
        self.thrusters_firing = false;
        Some(forward(self.state.heading) * self.tuning.max_acceleration)
    }

    /// Angular impulse; `direction` is -1 (left), 0 or 1 (right).
    pub fn turn(&mut self, direction: f64) {
        let max = self.tuning.max_angular_velocity;
        self.state.angular_velocity =
            (self.state.angular_velocity + direction * max).clamp(-max, max);
    }

    /// Advances heading and position by one explicit Euler step using the current
    /// `ge_force`, then damps the angular velocity.
    pub fn integrate(&mut self, dt: f64, time_scale_factor: f64) {
        let dynamics = CraftDynamics::new(self.ge_force, time_scale_factor);
        let integrator = Euler::new(dynamics);

        let mut next = integrator.integrate(&self.state, dt);
        next.heading = wrap_angle(next.heading);
        next.angular_velocity *= (1.0 - self.tuning.angular_damping * dt).max(0.0);
        self.state = next;
    }

    /// Returns false if the craft was already dead.
    pub fn kill(&mut self) -> bool {
        if !self.is_alive {
            return false;
        }
        self.is_alive = false;
        self.state.velocity = na::Vector3::zeros();
        self.state.angular_velocity = 0.0;
        self.thrusters_firing = false;
        true
    }

    /// Restores the configured spawn state.
    pub fn respawn(&mut self) {
        self.state = self.spawn;
        self.ge_force = na::Vector3::zeros();
        self.thrusters_firing = false;
        self.is_alive = true;
    }
}
