use super::height_sampler::TerrainHeightSampler;
use nalgebra as na;

/// Coarseness tier for a vertex at `horizontal_distance` from the viewer.
pub fn lod_tier(horizontal_distance: f64, tier_span: f64) -> u8 {
    if !(tier_span > 0.0) {
        return 0;
    }
    (horizontal_distance / tier_span).floor().min(u8::MAX as f64) as u8
}

impl TerrainHeightSampler {
    /// Buckets every vertex by its x/z distance to `viewpoint`. Height of the
    /// viewpoint is ignored.
    pub fn assign_lod_tiers(&mut self, viewpoint: &na::Vector3<f64>, tier_span: f64) {
        for vertex in 0..self.vertex_count() {
            let point = self.point_at(vertex);
            let distance = (point.x - viewpoint.x).hypot(point.z - viewpoint.z);
            self.lod_tiers_mut()[vertex] = lod_tier(distance, tier_span);
        }
    }

    /// Vertices that the next refresh will resample.
    pub fn active_vertex_count(&self) -> usize {
        let threshold = self.lod_threshold();
        self.lod_tiers().iter().filter(|&&tier| tier <= threshold).count()
    }
}
