pub mod height_sampler;
pub mod lod;

pub use height_sampler::TerrainHeightSampler;
