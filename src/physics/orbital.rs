use crate::constants::{PI, TWO_PI};
use crate::models::craft::wrap_angle;
use crate::models::gravity_source::{GravitySource, SourceId};
use nalgebra as na;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct OrbitalMechanics;

impl OrbitalMechanics {
    /// Vo = sqrt(μ / r)
    pub fn compute_circular_velocity(mu: f64, r: f64) -> f64 {
        (mu / r).sqrt()
    }

    pub fn compute_orbital_period(mu: f64, r: f64) -> f64 {
        TWO_PI * (r.powi(3) / mu).sqrt()
    }

    /// Radius inside which the orbiting body dominates its parent.
    pub fn hill_sphere_radius(orbital_radius: f64, body_mass: f64, parent_mass: f64) -> f64 {
        orbital_radius * (body_mass / (3.0 * parent_mass)).cbrt()
    }
}

/// Fixed-radius circular orbit in the horizontal plane.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularOrbit {
    pub parent: SourceId,
    orbital_radius: f64,
    current_angle: f64,
    orbital_speed: f64,
    orbital_period: f64,
}

impl CircularOrbit {
    /// Speed and period are derived here once and never re-derived.
    pub fn new(parent: SourceId, orbital_radius: f64, initial_angle: f64, parent_mu: f64) -> Self {
        let (orbital_speed, orbital_period) =
            Self::calculate_orbital_velocity(orbital_radius, parent_mu);
        Self {
            parent,
            orbital_radius,
            current_angle: wrap_angle(initial_angle),
            orbital_speed,
            orbital_period,
        }
    }

    pub fn calculate_orbital_velocity(orbital_radius: f64, parent_mu: f64) -> (f64, f64) {
        (
            OrbitalMechanics::compute_circular_velocity(parent_mu, orbital_radius),
            OrbitalMechanics::compute_orbital_period(parent_mu, orbital_radius),
        )
    }

    pub fn orbital_radius(&self) -> f64 {
        self.orbital_radius
    }

    pub fn current_angle(&self) -> f64 {
        self.current_angle
    }

    pub fn orbital_speed(&self) -> f64 {
        self.orbital_speed
    }

    pub fn orbital_period(&self) -> f64 {
        self.orbital_period
    }

    pub fn angular_velocity(&self) -> f64 {
        self.orbital_speed / self.orbital_radius
    }

    pub fn advance(&mut self, dt: f64) {
        self.current_angle = wrap_angle(self.current_angle + self.angular_velocity() * dt);
    }

    /// Point on the circle for the current angle; `height` is carried through unchanged.
    pub fn position_about(&self, parent_position: &na::Vector3<f64>, height: f64) -> na::Vector3<f64> {
        na::Vector3::new(
            parent_position.x + self.orbital_radius * self.current_angle.sin(),
            height,
            parent_position.z + self.orbital_radius * self.current_angle.cos(),
        )
    }

    pub fn hill_sphere_radius(&self, body_mass: f64, parent_mass: f64) -> f64 {
        OrbitalMechanics::hill_sphere_radius(self.orbital_radius, body_mass, parent_mass)
    }
}

/// How a generated planet's radius follows from its mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RadiusScaling {
    /// radius = density * sqrt(mass)
    #[default]
    SquareRoot,
    /// Sphere of randomized density in [density / 100, density].
    Volumetric,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetParams {
    pub lower_mass_scale: f64,
    pub upper_mass_scale: f64,
    pub lower_orbital_radii_scale: f64,
    pub upper_orbital_radii_scale: f64,
    pub planet_density: f64,
    pub radius_scaling: RadiusScaling,
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high <= low {
        return low;
    }
    rng.gen_range(low..high)
}

pub fn planet_radius<R: Rng + ?Sized>(
    rng: &mut R,
    mass: f64,
    density: f64,
    scaling: RadiusScaling,
) -> f64 {
    match scaling {
        RadiusScaling::SquareRoot => density * mass.sqrt(),
        RadiusScaling::Volumetric => {
            let body_density = uniform(rng, density / 100.0, density);
            let volume = (mass / body_density) / ((4.0 / 3.0) * PI);
            volume.cbrt()
        }
    }
}

/// Builds a randomized planet on a circular orbit around `star`.
pub fn generate_planet<R: Rng + ?Sized>(
    rng: &mut R,
    star_id: SourceId,
    star: &GravitySource,
    params: &PlanetParams,
    g: f64,
) -> GravitySource {
    let star_radius = star.radius();
    let mass = star.mass() * uniform(rng, params.lower_mass_scale, params.upper_mass_scale);
    let radius = planet_radius(rng, mass, params.planet_density, params.radius_scaling);
    let orbital_radius = uniform(
        rng,
        radius + params.lower_orbital_radii_scale * star_radius,
        radius + params.upper_orbital_radii_scale * star_radius,
    ) + star_radius;
    let initial_angle = uniform(rng, 0.0, TWO_PI);

    let orbit = CircularOrbit::new(
        star_id,
        orbital_radius,
        initial_angle,
        star.gravitational_parameter(g),
    );
    let position = orbit.position_about(&star.position, star.position.y);

    debug!(
        mass,
        radius,
        orbital_radius,
        orbital_speed = orbit.orbital_speed(),
        orbital_period = orbit.orbital_period(),
        hill_sphere = orbit.hill_sphere_radius(mass, star.mass()),
        "planetary params calculated"
    );

    GravitySource::planet(mass, radius, position, orbit)
}
