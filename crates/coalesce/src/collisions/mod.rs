//! Fusion detection and resolution
//!
//! Bodies that overlap closely enough fuse into the heavier of the two,
//! conserving mass and momentum. Detection lists candidate pairs; resolution
//! walks them nearest-first and lets each body take part in at most one
//! fusion per step.

pub mod detection;
pub mod resolution;


pub use detection::{DirectDetector, FusionCandidate, FusionCriteria, FusionDetector};
pub use resolution::{
    FusedPair, FusionOutcome, FusionResolver, apply_removals, merge_bodies, resolve_fusions,
    select_survivor,
};
