use crate::fsm::RunState;
use crate::models::gravity_source::{SourceId, SourceKind};
use hifitime::Duration;
use nalgebra as na;

/// Snapshot for HUD and logging, taken between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub tick: u64,
    pub elapsed: Duration,
    pub position: na::Vector3<f64>,
    pub velocity: na::Vector3<f64>,
    pub ge_force: na::Vector3<f64>,
    pub heading: f64,
    pub is_alive: bool,
    pub run_state: RunState,
    pub specific_energy: f64,
}

/// Things that happened during a step, for effect and UI layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationEvent {
    RunStateChanged(RunState),
    CraftDestroyed {
        source: SourceId,
        kind: SourceKind,
        position: na::Vector3<f64>,
    },
    CraftRespawned {
        position: na::Vector3<f64>,
    },
}
