//! Time integration for the fusion simulation
//!
//! Integrators read one snapshot and produce the next set of bodies. They
//! never touch time or frame counters; the engine wraps their output into a
//! new snapshot.

use std::sync::Arc;

use crate::body::Body;
use crate::forces::ForceModel;
use crate::state::SimulationState;

/// A fixed-step time integrator
pub trait Integrator: Send + Sync {
    /// Advance every body of `state` by `dt`
    ///
    /// # Arguments
    ///
    /// * `state` - Snapshot at the start of the step (not modified)
    /// * `dt` - Timestep in simulation units
    /// * `force` - Force model to compute accelerations
    ///
    /// # Returns
    ///
    /// Advanced bodies in the same order as `state.bodies()`
    fn advance(&self, state: &SimulationState, dt: f64, force: &dyn ForceModel) -> Vec<Arc<Body>>;
}

/// Second-order Taylor step with a single force evaluation
///
/// Accelerations are evaluated once from the pre-step positions of all
/// bodies, then each body is moved with:
///
/// 1. v(t + dt) = v(t) + a(t) * dt
/// 2. x(t + dt) = x(t) + v(t) * dt + a(t) * dt² / 2
///
/// The position update uses the old velocity, so this is neither plain
/// Euler nor Euler-Cromer. The computed acceleration is stored on each
/// body for inspection.
///
/// # Examples
///
/// ```
/// use coalesce::forces::SoftenedGravity;
/// use coalesce::integrator::{Integrator, TaylorStep};
/// use coalesce::state::SimulationState;
/// use nalgebra::{Point2, Vector2};
///
/// let (state, _) = SimulationState::empty()
///     .with_added_body(10.0, Point2::new(0.0, 0.0), Vector2::new(1.0, 0.0)).unwrap();
///
/// let bodies = TaylorStep.advance(&state, 0.5, &SoftenedGravity::default());
///
/// // A lone body drifts in a straight line
/// assert_eq!(bodies[0].position, Point2::new(0.5, 0.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TaylorStep;

impl Integrator for TaylorStep {
    fn advance(&self, state: &SimulationState, dt: f64, force: &dyn ForceModel) -> Vec<Arc<Body>> {
        let accelerations = force.accelerations(state);

        state
            .bodies()
            .iter()
            .zip(accelerations)
            .map(|(body, accel)| {
                Arc::new(Body {
                    position: body.position + body.velocity * dt + accel * (0.5 * dt * dt),
                    velocity: body.velocity + accel * dt,
                    acceleration: accel,
                    ..**body
                })
            })
            .collect()
    }
}
