use super::dynamics::VerticalForce;
use super::gravity::GravityField;
use crate::models::gravity_source::SourceId;
use nalgebra as na;

/// Distance used for overlap tests. A planar craft is confined to its plane, so
/// bodies below or above it are hit by their x/z footprint.
fn separation(a: &na::Vector3<f64>, b: &na::Vector3<f64>, vertical: VerticalForce) -> f64 {
    match vertical {
        VerticalForce::Planar => (a.x - b.x).hypot(a.z - b.z),
        VerticalForce::Full => (a - b).magnitude(),
    }
}

/// First source (in field order) whose body overlaps a sphere of `radius` at `position`.
pub fn first_collision(
    field: &GravityField,
    position: &na::Vector3<f64>,
    radius: f64,
    vertical: VerticalForce,
) -> Option<SourceId> {
    field
        .sources()
        .iter()
        .position(|source| separation(position, &source.position, vertical) <= source.radius() + radius)
        .map(SourceId)
}
