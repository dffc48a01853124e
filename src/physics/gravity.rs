use crate::constants::G;
use crate::models::gravity_source::{GravitySource, SourceId, SourceKind};
use nalgebra as na;
use serde::{Deserialize, Serialize};

/// What happens to a force query that lands inside a source's radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurfaceClamp {
    /// Hold the magnitude at its surface value.
    #[default]
    Clamp,
    /// No force inside the body.
    Zero,
    /// Plain inverse-square all the way down.
    Unclamped,
}

/// Inverse-square force field over an ordered set of point masses.
#[derive(Debug, Clone)]
pub struct GravityField {
    gravitational_constant: f64,
    surface_clamp: SurfaceClamp,
    sources: Vec<GravitySource>,
}

impl Default for GravityField {
    fn default() -> Self {
        Self::new(G, SurfaceClamp::default())
    }
}

impl GravityField {
    pub fn new(gravitational_constant: f64, surface_clamp: SurfaceClamp) -> Self {
        Self {
            gravitational_constant,
            surface_clamp,
            sources: Vec::new(),
        }
    }

    pub fn gravitational_constant(&self) -> f64 {
        self.gravitational_constant
    }

    pub fn surface_clamp(&self) -> SurfaceClamp {
        self.surface_clamp
    }

    pub fn add_source(&mut self, source: GravitySource) -> SourceId {
        self.sources.push(source);
        SourceId(self.sources.len() - 1)
    }

    pub fn sources(&self) -> &[GravitySource] {
        &self.sources
    }

    pub fn source(&self, id: SourceId) -> Option<&GravitySource> {
        self.sources.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn stars(&self) -> impl Iterator<Item = &GravitySource> {
        self.sources.iter().filter(|s| s.kind == SourceKind::Star)
    }

    pub fn planets(&self) -> impl Iterator<Item = &GravitySource> {
        self.sources.iter().filter(|s| s.kind == SourceKind::Planet)
    }

    /// Force exerted by `source` on `test_mass` at `point`. With a unit test mass
    /// this is the field acceleration.
    pub fn compute_force_at(
        &self,
        source: &GravitySource,
        point: &na::Vector3<f64>,
        test_mass: f64,
    ) -> na::Vector3<f64> {
        let offset = point - source.position;
        let distance = offset.magnitude();
        if distance == 0.0 {
            return na::Vector3::zeros();
        }

        let effective_distance = if distance < source.radius() {
            match self.surface_clamp {
                SurfaceClamp::Clamp => source.radius(),
                SurfaceClamp::Zero => return na::Vector3::zeros(),
                SurfaceClamp::Unclamped => distance,
            }
        } else {
            distance
        };

        let force_magnitude: f64 = -(self.gravitational_constant * test_mass * source.mass())
            / (effective_distance * effective_distance);
        (offset / distance) * force_magnitude
    }

    /// Superposition of every source's contribution at `point`.
    pub fn net_force_at(&self, point: &na::Vector3<f64>, test_mass: f64) -> na::Vector3<f64> {
        self.sources
            .iter()
            .fold(na::Vector3::zeros(), |acc, source| {
                acc + self.compute_force_at(source, point, test_mass)
            })
    }

    pub fn compute_escape_velocity(&self, source: &GravitySource, distance: f64) -> f64 {
        (2.0 * source.gravitational_parameter(self.gravitational_constant)
            / distance.max(source.radius()))
        .sqrt()
    }

    /// Moves every orbiting source along its circle. Parents are read before the
    /// child is written, so a planet always follows its parent's current position.
    pub fn advance_orbits(&mut self, dt: f64) {
        for idx in 0..self.sources.len() {
            let parent_position = match &self.sources[idx].orbit {
                Some(orbit) => match self.sources.get(orbit.parent.0) {
                    Some(parent) => parent.position,
                    None => continue,
                },
                None => continue,
            };

            let source = &mut self.sources[idx];
            let height = source.position.y;
            if let Some(orbit) = source.orbit.as_mut() {
                orbit.advance(dt);
                source.position = orbit.position_about(&parent_position, height);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use test_case::test_case;

    fn star_at_origin(mass: f64, radius: f64) -> GravitySource {
        GravitySource::star(mass, radius, na::Vector3::zeros())
    }

    #[test_case(na::Vector3::new(1000.0, 0.0, 0.0); "along x")]
    #[test_case(na::Vector3::new(0.0, 0.0, -750.0); "along -z")]
    #[test_case(na::Vector3::new(300.0, 400.0, -1200.0); "off axis")]
    fn inverse_square_law(point: na::Vector3<f64>) {
        let field = GravityField::default();
        let star = star_at_origin(1e15, 100.0);

        let near = field.compute_force_at(&star, &point, 1.0).magnitude();
        let far = field.compute_force_at(&star, &(point * 2.0), 1.0).magnitude();

        assert_relative_eq!(far, near / 4.0, max_relative = 1e-12);
    }

    #[test_case(na::Vector3::new(1000.0, 0.0, 0.0); "along x")]
    #[test_case(na::Vector3::new(-20.0, 5.0, 13.0); "inside the clamp radius")]
    #[test_case(na::Vector3::new(4000.0, -10.0, 9000.0); "far away")]
    fn force_points_toward_source(point: na::Vector3<f64>) {
        let field = GravityField::default();
        let star = GravitySource::star(1e15, 100.0, na::Vector3::new(50.0, 0.0, 50.0));

        let force = field.compute_force_at(&star, &point, 1.0);
        let to_source = star.position - point;

        assert!(force.dot(&to_source) > 0.0);
        assert_abs_diff_eq!(force.normalize(), to_source.normalize(), epsilon = 1e-12);
    }

    #[test]
    fn zero_distance_is_zero_vector() {
        let field = GravityField::new(G, SurfaceClamp::Unclamped);
        let star = star_at_origin(1e15, 0.0);

        let force = field.compute_force_at(&star, &star.position.clone(), 1.0);

        assert_eq!(force, na::Vector3::zeros());
        assert!(force.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn magnitude_matches_newton() {
        let field = GravityField::default();
        let star = star_at_origin(1e15, 100.0);

        let force = field.compute_force_at(&star, &na::Vector3::new(1000.0, 0.0, 0.0), 1.0);

        assert_relative_eq!(force.x, -G * 1e15 / 1e6, max_relative = 1e-12);
        assert_eq!(force.y, 0.0);
        assert_eq!(force.z, 0.0);
    }

    #[test_case(SurfaceClamp::Clamp, G * 1e15 / 1e4; "clamped to surface value")]
    #[test_case(SurfaceClamp::Zero, 0.0; "zero inside")]
    #[test_case(SurfaceClamp::Unclamped, G * 1e15 / 2500.0; "plain inverse square")]
    fn surface_clamp_policies(policy: SurfaceClamp, expected: f64) {
        let field = GravityField::new(G, policy);
        let star = star_at_origin(1e15, 100.0);

        let force = field.compute_force_at(&star, &na::Vector3::new(50.0, 0.0, 0.0), 1.0);

        assert_relative_eq!(force.magnitude(), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_mass_scales_force_linearly() {
        let field = GravityField::default();
        let star = star_at_origin(1e15, 100.0);
        let point = na::Vector3::new(0.0, 0.0, 2000.0);

        let unit = field.compute_force_at(&star, &point, 1.0);
        let heavy = field.compute_force_at(&star, &point, 1000.0);

        assert_relative_eq!(heavy, unit * 1000.0, max_relative = 1e-12);
    }

    #[test]
    fn forces_superpose() {
        let mut field = GravityField::default();
        field.add_source(GravitySource::star(1e15, 100.0, na::Vector3::new(-500.0, 0.0, 0.0)));
        field.add_source(GravitySource::star(3e14, 40.0, na::Vector3::new(800.0, 0.0, 300.0)));
        let point = na::Vector3::new(100.0, 0.0, -250.0);

        let a = field.compute_force_at(&field.sources()[0], &point, 1.0);
        let b = field.compute_force_at(&field.sources()[1], &point, 1.0);

        assert_relative_eq!(field.net_force_at(&point, 1.0), a + b, max_relative = 1e-12);
    }

    #[test]
    fn empty_field_has_no_force() {
        let field = GravityField::default();
        assert!(field.is_empty());
        assert_eq!(field.net_force_at(&na::Vector3::new(1.0, 2.0, 3.0), 1.0), na::Vector3::zeros());
    }

    #[test_case(1000.0, 1000.0; "outside the body")]
    #[test_case(10.0, 100.0; "inside uses the radius")]
    fn escape_velocity(distance: f64, effective: f64) {
        let field = GravityField::default();
        let star = star_at_origin(1e15, 100.0);

        assert_relative_eq!(
            field.compute_escape_velocity(&star, distance),
            (2.0 * G * 1e15 / effective).sqrt(),
            max_relative = 1e-12
        );
    }
}
