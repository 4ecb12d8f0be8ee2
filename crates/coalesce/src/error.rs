//! Error types for configuration and snapshot lookups

use thiserror::Error;

use crate::body::BodyId;

/// Reasons a `SimulationConfig` is rejected
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("num_bodies must be at least 1")]
    NoBodies,
    #[error("min_mass {min} exceeds max_mass {max}")]
    InvalidMassRange { min: f64, max: f64 },
    #[error("body masses must be positive")]
    NonPositiveMass,
    #[error("dt must be non-negative, got {0}")]
    NegativeTimestep(f64),
    #[error("total_time must be non-negative, got {0}")]
    NegativeTotalTime(f64),
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("{field} must be non-negative")]
    NegativeExtent { field: &'static str },
    /// The sampling span for `field` overflows to infinity
    #[error("range of {field} is too wide to sample")]
    UnboundedRange { field: &'static str },
    #[error("softening must be non-negative")]
    NegativeSoftening,
    #[error("gravitational constant must be positive")]
    NonPositiveGravity,
    #[error("fusion divisor must be positive")]
    NonPositiveFusionDivisor,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
    /// A collaborator referenced an id that is not in the snapshot
    #[error("body {0} not found")]
    NotFound(BodyId),
    #[error("body id {0} appears more than once")]
    DuplicateId(BodyId),
    #[error("no body ids left to hand out")]
    IdsExhausted,
}
