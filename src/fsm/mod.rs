pub mod run_state;
pub mod state_machine;

pub use run_state::RunState;
pub use state_machine::SimulationFsm;
