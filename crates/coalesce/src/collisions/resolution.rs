//! Fusion resolution through momentum-conserving mergers
//!
//! When two bodies fuse, the heavier one survives under its own id and
//! absorbs the lighter one, conserving:
//! - Total mass: m_new = m_a + m_b
//! - Momentum: p_new = p_a + p_b
//!
//! The merged position is the center of mass, and the radius is derived
//! again from the new mass.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::debug;
use nalgebra::Point2;

use crate::body::{Body, BodyId, radius_for_mass};
use crate::collisions::detection::{
    DirectDetector, FusionCandidate, FusionCriteria, FusionDetector,
};
use crate::error::SimulationError;
use crate::state::SimulationState;

/// Which body was absorbed by which
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FusedPair {
    pub removed: BodyId,
    pub survivor: BodyId,
}

/// Result of resolving one snapshot's fusions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FusionOutcome {
    /// Survivors that grew, in resolution order
    pub fusion_ids: Vec<BodyId>,
    /// Bodies to drop from the next snapshot, in resolution order
    pub removal_ids: Vec<BodyId>,
    pub fused_pairs: Vec<FusedPair>,
    /// Every input body in input order: survivors merged, everything else
    /// (including removed bodies) passed through unchanged
    pub bodies: Vec<Arc<Body>>,
}

impl FusionOutcome {
    /// True when no fusion took place
    pub fn is_empty(&self) -> bool {
        self.fused_pairs.is_empty()
    }
}

/// Pick the survivor of a fusing pair
///
/// The heavier body survives. On equal masses `b` survives, so the
/// outcome never depends on anything but the pair's order.
///
/// # Returns
///
/// `(survivor, removed)`
pub fn select_survivor<'a>(a: &'a Body, b: &'a Body) -> (&'a Body, &'a Body) {
    if a.mass > b.mass { (a, b) } else { (b, a) }
}

/// Merge `removed` into `survivor`, conserving mass and momentum
///
/// The result keeps the survivor's id and its last acceleration; the
/// acceleration is recomputed on the next integration step.
///
/// # Examples
///
/// ```
/// use coalesce::body::{Body, BodyId};
/// use coalesce::collisions::merge_bodies;
/// use nalgebra::{Point2, Vector2};
///
/// let survivor = Body::new(BodyId(1), 20.0, Point2::new(0.1, 0.0), Vector2::new(0.0, 1.0));
/// let removed = Body::new(BodyId(0), 10.0, Point2::new(0.0, 0.0), Vector2::new(0.0, -2.0));
///
/// let merged = merge_bodies(&survivor, &removed);
///
/// assert_eq!(merged.id, BodyId(1));
/// assert!((merged.mass - 30.0).abs() < 1e-12);
///
/// // Momentum is conserved
/// let p_initial = survivor.momentum() + removed.momentum();
/// assert!((merged.momentum() - p_initial).magnitude() < 1e-12);
/// ```
pub fn merge_bodies(survivor: &Body, removed: &Body) -> Body {
    let mass = survivor.mass + removed.mass;

    let position = (survivor.position.coords * survivor.mass
        + removed.position.coords * removed.mass)
        / mass;
    let velocity = (survivor.velocity * survivor.mass + removed.velocity * removed.mass) / mass;

    Body {
        id: survivor.id,
        mass,
        radius: radius_for_mass(mass),
        position: Point2::from(position),
        velocity,
        acceleration: survivor.acceleration,
    }
}

/// Resolve candidate pairs against the snapshot they were detected in
///
/// Handles overlapping candidates by:
/// 1. Sorting by separation (closest first, stable for ties)
/// 2. Reserving both bodies of every pair that fuses
/// 3. Skipping pairs where either body is already reserved
///
/// Three or more mutually overlapping bodies therefore resolve through
/// pairwise nearest-first matching, not a simultaneous N-way merge.
///
/// Fails with `NotFound` if a candidate names a body absent from `state`.
pub fn resolve_fusions(
    state: &SimulationState,
    mut candidates: Vec<FusionCandidate>,
) -> Result<FusionOutcome, SimulationError> {
    candidates.sort_by(|a, b| a.separation.total_cmp(&b.separation));

    let mut reserved: HashSet<BodyId> = HashSet::new();
    let mut merged: HashMap<BodyId, Body> = HashMap::new();
    let mut outcome = FusionOutcome::default();

    for candidate in candidates {
        if reserved.contains(&candidate.body_a) || reserved.contains(&candidate.body_b) {
            continue;
        }

        let a = state.get(candidate.body_a)?;
        let b = state.get(candidate.body_b)?;
        let (survivor, removed) = select_survivor(a, b);
        let fused = merge_bodies(survivor, removed);

        debug!(
            "body {} fused into {} (separation {:.4}, mass {:.3})",
            removed.id, survivor.id, candidate.separation, fused.mass
        );

        reserved.insert(survivor.id);
        reserved.insert(removed.id);
        outcome.fusion_ids.push(survivor.id);
        outcome.removal_ids.push(removed.id);
        outcome.fused_pairs.push(FusedPair {
            removed: removed.id,
            survivor: survivor.id,
        });
        merged.insert(survivor.id, fused);
    }

    outcome.bodies = state
        .bodies()
        .iter()
        .map(|body| match merged.remove(&body.id) {
            Some(fused) => Arc::new(fused),
            None => Arc::clone(body),
        })
        .collect();

    Ok(outcome)
}

/// Drop every body whose id is in `removal_ids`, keeping relative order
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use coalesce::body::{Body, BodyId};
/// use coalesce::collisions::apply_removals;
/// use nalgebra::{Point2, Vector2};
///
/// let bodies: Vec<Arc<Body>> = (0..4)
///     .map(|i| Arc::new(Body::new(BodyId(i), 1.0, Point2::new(i as f64, 0.0), Vector2::zeros())))
///     .collect();
///
/// let kept = apply_removals(&[BodyId(2), BodyId(0)], &bodies);
/// let ids: Vec<u32> = kept.iter().map(|b| b.id.0).collect();
/// assert_eq!(ids, vec![1, 3]);
/// ```
pub fn apply_removals(removal_ids: &[BodyId], bodies: &[Arc<Body>]) -> Vec<Arc<Body>> {
    let removed: HashSet<BodyId> = removal_ids.iter().copied().collect();

    bodies
        .iter()
        .filter(|b| !removed.contains(&b.id))
        .cloned()
        .collect()
}

/// Detects and resolves fusions in a snapshot
///
/// # Examples
///
/// ```
/// use coalesce::collisions::{FusionCriteria, FusionResolver};
/// use coalesce::state::SimulationState;
/// use nalgebra::{Point2, Vector2};
///
/// let (state, light) = SimulationState::empty()
///     .with_added_body(10.0, Point2::new(0.0, 0.0), Vector2::zeros()).unwrap();
/// let (state, heavy) = state.with_added_body(20.0, Point2::new(0.1, 0.0), Vector2::zeros()).unwrap();
///
/// let resolver = FusionResolver::new(FusionCriteria::default());
/// let outcome = resolver.resolve(&state).unwrap();
///
/// assert_eq!(outcome.fusion_ids, vec![heavy]);
/// assert_eq!(outcome.removal_ids, vec![light]);
/// ```
#[derive(Debug, Clone)]
pub struct FusionResolver<D = DirectDetector> {
    pub detector: D,
    pub criteria: FusionCriteria,
}

impl Default for FusionResolver<DirectDetector> {
    fn default() -> Self {
        Self::new(FusionCriteria::default())
    }
}

impl FusionResolver<DirectDetector> {
    pub fn new(criteria: FusionCriteria) -> Self {
        Self {
            detector: DirectDetector,
            criteria,
        }
    }
}

impl<D: FusionDetector> FusionResolver<D> {
    pub fn with_detector(detector: D, criteria: FusionCriteria) -> Self {
        Self { detector, criteria }
    }

    /// Detect candidate pairs in `state` and resolve them
    pub fn resolve(&self, state: &SimulationState) -> Result<FusionOutcome, SimulationError> {
        let candidates = self.detector.detect(state, &self.criteria);
        if candidates.is_empty() {
            return Ok(FusionOutcome {
                bodies: state.bodies().to_vec(),
                ..FusionOutcome::default()
            });
        }

        resolve_fusions(state, candidates)
    }
}
