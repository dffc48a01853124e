use super::gravity::GravityField;
use crate::models::gravity_source::GravitySource;
use nalgebra as na;

/// Specific mechanical energy of a unit test mass in the field.
/// Potential inside a body is evaluated at its surface.
pub fn calculate_specific_energy(
    field: &GravityField,
    position: &na::Vector3<f64>,
    velocity: &na::Vector3<f64>,
) -> f64 {
    let g = field.gravitational_constant();
    let kinetic = 0.5 * velocity.magnitude_squared();
    let potential: f64 = field
        .sources()
        .iter()
        .map(|source| {
            let r = (position - source.position).magnitude().max(source.radius());
            if r == 0.0 {
                0.0
            } else {
                -source.gravitational_parameter(g) / r
            }
        })
        .sum();

    kinetic + potential
}

/// Specific angular momentum about `source`.
pub fn calculate_angular_momentum(
    source: &GravitySource,
    position: &na::Vector3<f64>,
    velocity: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    (position - source.position).cross(velocity)
}
