//! Immutable-snapshot N-body simulation with body fusion
//!
//! Bodies attract each other under softened gravity and fuse, conserving
//! mass and momentum, when they overlap closely. Every step produces a new
//! [`state::SimulationState`] plus the list of fusions that happened, for a
//! presentation layer to consume.

pub mod body;
pub mod collisions;
pub mod config;
pub mod engine;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod state;

pub use body::{Body, BodyId};
pub use config::SimulationConfig;
pub use engine::{FusionEvents, SimulationEngine, StepOutcome};
pub use error::{ConfigError, SimulationError};
pub use state::SimulationState;

#[cfg(test)]
mod state_test;
