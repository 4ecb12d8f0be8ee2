//! Simulation configuration
//!
//! `SimulationConfig` is plain serde data, so a host can load it from
//! whatever format it likes. Field names serialize in camelCase:
//!
//! ```json
//! {
//!   "numBodies": 10,
//!   "G": 4.0,
//!   "dt": 0.05,
//!   "totalTime": 10.0,
//!   "maxVelocity": 5.0,
//!   "centerMass": true,
//!   "centerMassValue": 3000.0,
//!   "minMass": 10.0,
//!   "maxMass": 1000.0,
//!   "xLim": 50.0,
//!   "yLim": 50.0,
//!   "softening": 2.0,
//!   "fusionDivisor": 3.0,
//!   "seed": 42
//! }
//! ```
//!
//! Every field is optional and falls back to the value shown above
//! (except `seed`, which defaults to none).

use serde::{Deserialize, Serialize};

use crate::collisions::detection::DEFAULT_FUSION_DIVISOR;
use crate::error::ConfigError;
use crate::forces::{DEFAULT_SOFTENING, G};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    /// Number of bodies created by `initialize`
    pub num_bodies: usize,
    /// Gravitational constant
    #[serde(rename = "G")]
    pub g: f64,
    /// Timestep per frame
    pub dt: f64,
    /// Span of simulated time a host is expected to run
    pub total_time: f64,
    /// Bound on each initial velocity component
    pub max_velocity: f64,
    /// Place a fixed massive anchor at the origin as body 0
    pub center_mass: bool,
    /// Mass of the anchor body
    pub center_mass_value: f64,
    pub min_mass: f64,
    pub max_mass: f64,
    /// Half-width of the initial placement region
    pub x_lim: f64,
    /// Half-height of the initial placement region
    pub y_lim: f64,
    /// Additive distance offset in the force law
    pub softening: f64,
    /// Divisor applied to the radius sum for the fusion threshold
    pub fusion_divisor: f64,
    /// Seed for reproducible initial states
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_bodies: 10,
            g: G,
            dt: 0.05,
            total_time: 10.0,
            max_velocity: 5.0,
            center_mass: true,
            center_mass_value: 3000.0,
            min_mass: 10.0,
            max_mass: 1000.0,
            x_lim: 50.0,
            y_lim: 50.0,
            softening: DEFAULT_SOFTENING,
            fusion_divisor: DEFAULT_FUSION_DIVISOR,
            seed: None,
        }
    }
}

fn finite(value: f64, field: &'static str) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

/// A symmetric bound `[-value, value]` that can be sampled
fn symmetric_bound(value: f64, field: &'static str) -> Result<(), ConfigError> {
    if finite(value, field)? < 0.0 {
        return Err(ConfigError::NegativeExtent { field });
    }
    if !(2.0 * value).is_finite() {
        return Err(ConfigError::UnboundedRange { field });
    }
    Ok(())
}

impl SimulationConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every field, failing on the first invalid one
    ///
    /// # Examples
    ///
    /// ```
    /// use coalesce::config::SimulationConfig;
    /// use coalesce::error::ConfigError;
    ///
    /// assert!(SimulationConfig::default().validate().is_ok());
    ///
    /// let config = SimulationConfig { num_bodies: 0, ..Default::default() };
    /// assert_eq!(config.validate(), Err(ConfigError::NoBodies));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_bodies < 1 {
            return Err(ConfigError::NoBodies);
        }

        let min_mass = finite(self.min_mass, "min_mass")?;
        let max_mass = finite(self.max_mass, "max_mass")?;
        if min_mass <= 0.0 {
            return Err(ConfigError::NonPositiveMass);
        }
        if min_mass > max_mass {
            return Err(ConfigError::InvalidMassRange {
                min: min_mass,
                max: max_mass,
            });
        }
        if self.center_mass && finite(self.center_mass_value, "center_mass_value")? <= 0.0 {
            return Err(ConfigError::NonPositiveMass);
        }

        if finite(self.dt, "dt")? < 0.0 {
            return Err(ConfigError::NegativeTimestep(self.dt));
        }
        if finite(self.total_time, "total_time")? < 0.0 {
            return Err(ConfigError::NegativeTotalTime(self.total_time));
        }
        if finite(self.g, "G")? <= 0.0 {
            return Err(ConfigError::NonPositiveGravity);
        }
        if finite(self.softening, "softening")? < 0.0 {
            return Err(ConfigError::NegativeSoftening);
        }
        if finite(self.fusion_divisor, "fusion_divisor")? <= 0.0 {
            return Err(ConfigError::NonPositiveFusionDivisor);
        }

        symmetric_bound(self.max_velocity, "max_velocity")?;
        symmetric_bound(self.x_lim, "x_lim")?;
        symmetric_bound(self.y_lim, "y_lim")?;

        Ok(())
    }

    /// Number of frames needed to cover `total_time`, 0 when `dt` is 0
    pub fn frame_count(&self) -> u64 {
        if self.dt <= 0.0 {
            return 0;
        }
        (self.total_time / self.dt).ceil() as u64
    }
}
