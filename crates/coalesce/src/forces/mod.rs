//! Force models for the fusion simulation
//!
//! A force model turns a snapshot into per-body accelerations. Only the
//! softened direct-sum gravity is provided; the trait is the seam for
//! swapping it out.

use crate::state::SimulationState;
use nalgebra::Vector2;

pub mod gravity;

#[cfg(test)]
mod gravity_test;

pub use gravity::SoftenedGravity;

/// Default gravitational constant in simulation units
///
/// Tuned together with `DEFAULT_SOFTENING` for a visually stable system,
/// not for physical accuracy.
pub const G: f64 = 4.0;

/// Default additive distance offset used by `SoftenedGravity`
pub const DEFAULT_SOFTENING: f64 = 2.0;

/// A source of acceleration on bodies in a snapshot
///
/// # Examples
///
/// ```
/// use coalesce::forces::{ForceModel, SoftenedGravity};
/// use coalesce::state::SimulationState;
/// use nalgebra::{Point2, Vector2};
///
/// let (state, _) = SimulationState::empty()
///     .with_added_body(10.0, Point2::new(-5.0, 0.0), Vector2::zeros()).unwrap();
/// let (state, _) = state.with_added_body(10.0, Point2::new(5.0, 0.0), Vector2::zeros()).unwrap();
///
/// let gravity = SoftenedGravity::default();
/// let accel = gravity.acceleration(0, &state);
///
/// // Pulled toward the other body
/// assert!(accel.x > 0.0);
/// ```
pub trait ForceModel: Send + Sync {
    /// Acceleration on the body at index `idx` of `state.bodies()`
    fn acceleration(&self, idx: usize, state: &SimulationState) -> Vector2<f64>;

    /// Accelerations for every body, in snapshot order
    ///
    /// All entries are computed from the same positions, so no body sees
    /// another body's updated position within one call.
    fn accelerations(&self, state: &SimulationState) -> Vec<Vector2<f64>> {
        (0..state.body_count())
            .map(|i| self.acceleration(i, state))
            .collect()
    }

    /// Potential energy of the whole snapshot
    ///
    /// Default implementation returns 0.0.
    fn potential_energy(&self, _state: &SimulationState) -> f64 {
        0.0
    }
}
