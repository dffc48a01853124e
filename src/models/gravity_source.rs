use crate::physics::orbital::CircularOrbit;
use nalgebra as na;
use std::fmt;

/// Index of a source inside its owning [`GravityField`](crate::physics::gravity::GravityField).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Star,
    Planet,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceKind::Star => write!(f, "Star"),
            SourceKind::Planet => write!(f, "Planet"),
        }
    }
}

/// Point mass contributing to the field. Only planets carry an orbit.
#[derive(Debug, Clone)]
pub struct GravitySource {
    pub kind: SourceKind,
    mass: f64,
    radius: f64,
    pub position: na::Vector3<f64>,
    pub orbit: Option<CircularOrbit>,
}

impl GravitySource {
    pub fn star(mass: f64, radius: f64, position: na::Vector3<f64>) -> Self {
        Self {
            kind: SourceKind::Star,
            mass,
            radius,
            position,
            orbit: None,
        }
    }

    pub fn planet(mass: f64, radius: f64, position: na::Vector3<f64>, orbit: CircularOrbit) -> Self {
        Self {
            kind: SourceKind::Planet,
            mass,
            radius,
            position,
            orbit: Some(orbit),
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// μ = G * M
    pub fn gravitational_parameter(&self, g: f64) -> f64 {
        g * self.mass
    }

    /// Signed surface acceleration, negative toward the centre.
    pub fn surface_gravity(&self, g: f64) -> f64 {
        if self.radius == 0.0 {
            return f64::NEG_INFINITY;
        }
        -(g * self.mass) / self.radius.powi(2)
    }

    pub fn escape_velocity_at_surface(&self, g: f64) -> f64 {
        (2.0 * self.gravitational_parameter(g) / self.radius).sqrt()
    }

    pub fn is_orbiting(&self) -> bool {
        self.orbit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::G;
    use approx::assert_relative_eq;

    #[test]
    fn star_has_no_orbit() {
        let star = GravitySource::star(1e15, 500.0, na::Vector3::zeros());
        assert_eq!(star.kind, SourceKind::Star);
        assert!(!star.is_orbiting());
    }

    #[test]
    fn derived_quantities() {
        let star = GravitySource::star(1e15, 500.0, na::Vector3::zeros());
        let mu = G * 1e15;

        assert_relative_eq!(star.gravitational_parameter(G), mu);
        assert_relative_eq!(star.surface_gravity(G), -mu / 250_000.0);
        assert_relative_eq!(star.escape_velocity_at_surface(G), (2.0 * mu / 500.0).sqrt());
    }
}
