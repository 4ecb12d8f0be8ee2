//! Fusion candidate detection

use crate::body::{Body, BodyId};
use crate::state::SimulationState;

/// Default divisor applied to the radius sum
///
/// A pair only fuses once the discs overlap well past touching, which
/// reads better on screen than fusing on first contact.
pub const DEFAULT_FUSION_DIVISOR: f64 = 3.0;

/// Criteria for what counts as a fusion
///
/// Two bodies are candidates when their separation is strictly below
/// `(r_a + r_b) / divisor`.
///
/// # Examples
///
/// ```
/// use coalesce::collisions::FusionCriteria;
///
/// // Fuse at one third of the radius sum
/// let criteria = FusionCriteria::default();
/// assert_eq!(criteria.divisor, 3.0);
///
/// // Fuse on first contact
/// let contact = FusionCriteria { divisor: 1.0 };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionCriteria {
    pub divisor: f64,
}

impl FusionCriteria {
    /// Separation below which `a` and `b` fuse
    pub fn threshold(&self, a: &Body, b: &Body) -> f64 {
        (a.radius + b.radius) / self.divisor
    }
}

impl Default for FusionCriteria {
    fn default() -> Self {
        Self {
            divisor: DEFAULT_FUSION_DIVISOR,
        }
    }
}

/// A pair of bodies close enough to fuse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionCandidate {
    /// Body earlier in snapshot order
    pub body_a: BodyId,
    /// Body later in snapshot order
    pub body_b: BodyId,
    /// Current separation
    pub separation: f64,
    /// Threshold that the separation fell below
    pub threshold: f64,
}

fn check_pair(a: &Body, b: &Body, criteria: &FusionCriteria) -> Option<FusionCandidate> {
    let separation = a.distance_to(b);
    let threshold = criteria.threshold(a, b);

    (separation < threshold).then_some(FusionCandidate {
        body_a: a.id,
        body_b: b.id,
        separation,
        threshold,
    })
}

/// Fusion detector trait
pub trait FusionDetector: Send + Sync {
    /// Detect every candidate pair in the snapshot
    ///
    /// Each unordered pair appears at most once and never pairs a body
    /// with itself.
    fn detect(&self, state: &SimulationState, criteria: &FusionCriteria) -> Vec<FusionCandidate>;
}

/// Direct O(N²) detector
///
/// Checks every pair `i < j` in snapshot order, so output order is stable.
///
/// # Examples
///
/// ```
/// use coalesce::collisions::{DirectDetector, FusionCriteria, FusionDetector};
/// use coalesce::state::SimulationState;
/// use nalgebra::{Point2, Vector2};
///
/// let (state, _) = SimulationState::empty()
///     .with_added_body(100.0, Point2::new(0.0, 0.0), Vector2::zeros()).unwrap();
/// let (state, _) = state.with_added_body(100.0, Point2::new(0.1, 0.0), Vector2::zeros()).unwrap();
///
/// let candidates = DirectDetector.detect(&state, &FusionCriteria::default());
/// assert_eq!(candidates.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectDetector;

impl FusionDetector for DirectDetector {
    fn detect(&self, state: &SimulationState, criteria: &FusionCriteria) -> Vec<FusionCandidate> {
        let bodies = state.bodies();
        let n = bodies.len();

        (0..n)
            .flat_map(|i| {
                ((i + 1)..n).filter_map(move |j| check_pair(&bodies[i], &bodies[j], criteria))
            })
            .collect()
    }
}
