use crate::config::scenario::TerrainConfig;
use crate::physics::gravity::GravityField;
use nalgebra as na;
use tracing::debug;

/// Samples the field magnitude over a regular x/z grid into a deforming height map.
///
/// The height map is a flat `[x, y, z, x, y, z, ...]` buffer in `f32`; only `y` is
/// rewritten by [`refresh`](Self::refresh). Vertices whose LOD tier exceeds the
/// threshold keep their previous height and color.
#[derive(Debug, Clone)]
pub struct TerrainHeightSampler {
    columns: usize,
    rows: usize,
    grid_unit: f64,
    height_map: Vec<f32>,
    colors: Vec<[f32; 4]>,
    lod_tiers: Vec<u8>,
    lod_threshold: u8,
    scale_factor: f64,
    force_floor: f64,
    force_ceiling: f64,
    low_color: [f32; 4],
    high_color: [f32; 4],
    max_magnitude: f64,
}

impl TerrainHeightSampler {
    pub fn new(world_size_x: f64, world_size_z: f64, grid_unit: f64, config: &TerrainConfig) -> Self {
        let subdivisions_x = ((world_size_x / grid_unit).floor() as usize).max(1);
        let subdivisions_z = ((world_size_z / grid_unit).floor() as usize).max(1);
        let columns = subdivisions_x + 1;
        let rows = subdivisions_z + 1;
        let vertex_count = columns * rows;

        let origin_x = -(subdivisions_x as f64) * grid_unit / 2.0;
        let origin_z = -(subdivisions_z as f64) * grid_unit / 2.0;

        let mut height_map = Vec::with_capacity(vertex_count * 3);
        for row in 0..rows {
            for column in 0..columns {
                height_map.push((origin_x + column as f64 * grid_unit) as f32);
                height_map.push(0.0);
                height_map.push((origin_z + row as f64 * grid_unit) as f32);
            }
        }

        debug!(columns, rows, vertex_count, grid_unit, "terrain grid allocated");

        Self {
            columns,
            rows,
            grid_unit,
            height_map,
            colors: vec![config.low_color; vertex_count],
            lod_tiers: vec![0; vertex_count],
            lod_threshold: config.lod_threshold,
            scale_factor: config.scale_factor,
            force_floor: config.force_floor,
            force_ceiling: config.force_ceiling,
            low_color: config.low_color,
            high_color: config.high_color,
            max_magnitude: 0.0,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn vertex_count(&self) -> usize {
        self.columns * self.rows
    }

    pub fn grid_unit(&self) -> f64 {
        self.grid_unit
    }

    /// Flat `[x, y, z]` triples, row-major in z then x.
    pub fn heights(&self) -> &[f32] {
        &self.height_map
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    /// Current height of `vertex`, `None` past the end of the grid.
    pub fn height(&self, vertex: usize) -> Option<f32> {
        self.height_map.get(3 * vertex + 1).copied()
    }

    pub fn index_of(&self, column: usize, row: usize) -> usize {
        row * self.columns + column
    }

    /// World-space sample point of a vertex. Sampling happens in the y = 0 plane.
    pub fn sample_point(&self, vertex: usize) -> Option<na::Vector3<f64>> {
        (vertex < self.vertex_count()).then(|| self.point_at(vertex))
    }

    /// Caller guarantees `vertex < vertex_count()`.
    pub(super) fn point_at(&self, vertex: usize) -> na::Vector3<f64> {
        na::Vector3::new(
            self.height_map[3 * vertex] as f64,
            0.0,
            self.height_map[3 * vertex + 2] as f64,
        )
    }

    pub fn lod_tiers(&self) -> &[u8] {
        &self.lod_tiers
    }

    /// Tiers are normally written by the mesh layer each frame.
    pub fn lod_tiers_mut(&mut self) -> &mut [u8] {
        &mut self.lod_tiers
    }

    pub fn lod_threshold(&self) -> u8 {
        self.lod_threshold
    }

    pub fn set_lod_threshold(&mut self, threshold: u8) {
        self.lod_threshold = threshold;
    }

    /// Highest clamped magnitude seen since construction.
    pub fn max_magnitude(&self) -> f64 {
        self.max_magnitude
    }

    /// Resamples every vertex at or below the LOD threshold. Returns how many were written.
    pub fn refresh(&mut self, field: &GravityField) -> usize {
        let mut updated = 0;

        for vertex in 0..self.vertex_count() {
            if self.lod_tiers[vertex] > self.lod_threshold {
                continue;
            }

            let point = self.point_at(vertex);
            let magnitude = field
                .net_force_at(&point, 1.0)
                .magnitude()
                .max(self.force_floor)
                .min(self.force_ceiling);

            if magnitude > self.max_magnitude {
                self.max_magnitude = magnitude;
            }

            self.height_map[3 * vertex + 1] = -(magnitude * self.scale_factor) as f32;
            self.colors[vertex] = self.color_for(magnitude);
            updated += 1;
        }

        updated
    }

    fn color_for(&self, magnitude: f64) -> [f32; 4] {
        let t = color_fraction(magnitude, self.force_floor, self.max_magnitude) as f32;
        let mut color = [0.0; 4];
        for (channel, value) in color.iter_mut().enumerate() {
            *value = self.low_color[channel] + (self.high_color[channel] - self.low_color[channel]) * t;
        }
        color
    }
}

/// Logarithmic position of `magnitude` between `floor` and `max_magnitude`, in [0, 1].
///
/// `floor` maps to the low color and `max_magnitude` to the high color, so the
/// gradient holds whatever absolute scale the clamp range has.
pub fn color_fraction(magnitude: f64, floor: f64, max_magnitude: f64) -> f64 {
    if !(floor > 0.0) || !(max_magnitude > floor) || !(magnitude > 0.0) {
        return 0.0;
    }
    ((magnitude / floor).ln() / (max_magnitude / floor).ln()).clamp(0.0, 1.0)
}
