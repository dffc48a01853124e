use super::run_state::RunState;
use tracing::info;

/// Pause/run gate for the fixed-step loop. Starts paused.
#[derive(Debug, Clone, Default)]
pub struct SimulationFsm {
    current_state: RunState,
    last_state_change: f64,
}

impl SimulationFsm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_current_state(&self) -> RunState {
        self.current_state
    }

    pub fn get_last_state_change(&self) -> f64 {
        self.last_state_change
    }

    pub fn is_running(&self) -> bool {
        self.current_state == RunState::Running
    }

    /// Returns true if the state changed.
    pub fn transition_to(&mut self, new_state: RunState, time: f64) -> bool {
        if self.current_state == new_state {
            return false;
        }
        info!(
            time,
            from = %self.current_state,
            to = %new_state,
            "run state transition"
        );
        self.current_state = new_state;
        self.last_state_change = time;
        true
    }

    pub fn toggle(&mut self, time: f64) -> RunState {
        self.transition_to(self.current_state.toggled(), time);
        self.current_state
    }
}
