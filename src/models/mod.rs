pub mod craft;
pub mod gravity_source;

pub use craft::{Craft, KinematicState};
pub use gravity_source::{GravitySource, SourceId, SourceKind};
