pub mod config;
pub mod constants;
pub mod fsm;
pub mod integrators;
pub mod models;
pub mod physics;
pub mod simulation;
pub mod terrain;
