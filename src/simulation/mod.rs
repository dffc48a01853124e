pub mod engine;
pub mod input;
pub mod respawn;
pub mod telemetry;

pub use engine::Simulation;
pub use input::{InputIntent, TurnDirection};
pub use respawn::RespawnTimer;
pub use telemetry::{SimulationEvent, Telemetry};
