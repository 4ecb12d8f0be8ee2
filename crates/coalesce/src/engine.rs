//! Per-frame simulation pipeline
//!
//! Each call to [`SimulationEngine::step`] runs:
//!
//! 1. Integrate every body from the old snapshot
//! 2. Detect and resolve fusions on the integrated bodies
//! 3. Drop the absorbed bodies
//! 4. Advance time and frame
//!
//! The old snapshot is never modified. The fusion bookkeeping is handed back
//! alongside the new snapshot so a presentation layer can drive its own
//! merge and vanish effects without reaching into the physics.

use log::{info, trace};
use nalgebra::{Point2, Vector2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::body::{Body, BodyId};
use crate::collisions::{FusedPair, FusionCriteria, FusionResolver, apply_removals};
use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::forces::{ForceModel, SoftenedGravity};
use crate::integrator::{Integrator, TaylorStep};
use crate::state::SimulationState;

/// Fusion bookkeeping for one frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FusionEvents {
    /// Survivors that grew this frame
    pub fusion_ids: Vec<BodyId>,
    /// Bodies that vanished this frame
    pub removal_ids: Vec<BodyId>,
    pub fused_pairs: Vec<FusedPair>,
}

impl FusionEvents {
    pub fn is_empty(&self) -> bool {
        self.fused_pairs.is_empty()
    }

    /// The body that absorbed `removed` this frame, if any
    pub fn survivor_of(&self, removed: BodyId) -> Option<BodyId> {
        self.fused_pairs
            .iter()
            .find(|pair| pair.removed == removed)
            .map(|pair| pair.survivor)
    }
}

/// Everything produced by one step
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Snapshot for the next frame
    pub state: SimulationState,
    /// Post-fusion bodies before removal, at the old time and frame
    ///
    /// Absorbed bodies are still present here at their integrated
    /// positions, for drawing a last frame before they vanish.
    pub merged: SimulationState,
    pub events: FusionEvents,
}

/// Drives the integrate → fuse → remove → advance pipeline
pub struct SimulationEngine {
    config: SimulationConfig,
    force: Box<dyn ForceModel>,
    integrator: Box<dyn Integrator>,
    resolver: FusionResolver,
}

impl SimulationEngine {
    /// Creates an engine with softened gravity and the Taylor step
    ///
    /// Fails with `Configuration` if `config` does not validate.
    ///
    /// # Examples
    ///
    /// ```
    /// use coalesce::config::SimulationConfig;
    /// use coalesce::engine::SimulationEngine;
    ///
    /// let engine = SimulationEngine::new(SimulationConfig::default().with_seed(7)).unwrap();
    /// let state = engine.initialize_seeded().unwrap();
    /// let outcome = engine.step(&state).unwrap();
    ///
    /// assert_eq!(outcome.state.frame(), 1);
    /// assert_eq!(
    ///     outcome.state.body_count() + outcome.events.removal_ids.len(),
    ///     state.body_count()
    /// );
    /// ```
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        let force = SoftenedGravity::new(config.g, config.softening);
        Self::with_models(config, Box::new(force), Box::new(TaylorStep))
    }

    /// Creates an engine with a custom force model and integrator
    pub fn with_models(
        config: SimulationConfig,
        force: Box<dyn ForceModel>,
        integrator: Box<dyn Integrator>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let criteria = FusionCriteria {
            divisor: config.fusion_divisor,
        };

        Ok(Self {
            config,
            force,
            integrator,
            resolver: FusionResolver::new(criteria),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn force(&self) -> &dyn ForceModel {
        self.force.as_ref()
    }

    /// Creates the initial snapshot using `rng`
    ///
    /// Bodies get ids `0..num_bodies`. Each body samples its mass, then its
    /// position, then its velocity. With `center_mass` set, body 0 still
    /// draws its samples but is then pinned at the origin, at rest, with
    /// `center_mass_value` as its mass.
    pub fn initialize<R: Rng>(&self, rng: &mut R) -> Result<SimulationState, SimulationError> {
        let c = &self.config;

        let bodies = (0..c.num_bodies)
            .map(|i| {
                let mass = rng.random_range(c.min_mass..=c.max_mass);
                let position = Point2::new(
                    rng.random_range(-c.x_lim..=c.x_lim),
                    rng.random_range(-c.y_lim..=c.y_lim),
                );
                let velocity = Vector2::new(
                    rng.random_range(-c.max_velocity..=c.max_velocity),
                    rng.random_range(-c.max_velocity..=c.max_velocity),
                );

                let id = BodyId(i as u32);
                if c.center_mass && i == 0 {
                    Body::new(id, c.center_mass_value, Point2::origin(), Vector2::zeros())
                } else {
                    Body::new(id, mass, position, velocity)
                }
            })
            .collect();

        let state = SimulationState::from_bodies(bodies, 0.0, 0)?;
        info!(
            "initialized {} bodies (anchor: {}, total mass {:.1})",
            state.body_count(),
            c.center_mass,
            state.total_mass()
        );
        Ok(state)
    }

    /// Creates the initial snapshot from the configured seed
    ///
    /// Without a seed the generator is seeded from OS entropy.
    pub fn initialize_seeded(&self) -> Result<SimulationState, SimulationError> {
        let mut rng = match self.config.seed {
            Some(seed) => ChaChaRng::seed_from_u64(seed),
            None => ChaChaRng::from_os_rng(),
        };
        info!("seeding initial state with {:?}", self.config.seed);
        self.initialize(&mut rng)
    }

    /// Advances one frame
    ///
    /// Either the whole step succeeds or an error is returned; `state` is
    /// left untouched in both cases.
    pub fn step(&self, state: &SimulationState) -> Result<StepOutcome, SimulationError> {
        let integrated = self
            .integrator
            .advance(state, self.config.dt, self.force.as_ref());
        let carrier = state.with_bodies(integrated)?;

        let outcome = self.resolver.resolve(&carrier)?;
        let merged = carrier.with_bodies(outcome.bodies)?;

        let remaining = apply_removals(&outcome.removal_ids, merged.bodies());
        let next = merged.with_bodies(remaining)?.advanced(self.config.dt);

        trace!(
            "frame {} at t={:.3}: {} bodies, {} fusions",
            next.frame(),
            next.time(),
            next.body_count(),
            outcome.fused_pairs.len()
        );

        Ok(StepOutcome {
            state: next,
            merged,
            events: FusionEvents {
                fusion_ids: outcome.fusion_ids,
                removal_ids: outcome.removal_ids,
                fused_pairs: outcome.fused_pairs,
            },
        })
    }

    /// Applies `step` `frames` times
    ///
    /// # Returns
    ///
    /// The final snapshot and the fusion events of every frame, in order
    pub fn run(
        &self,
        state: &SimulationState,
        frames: u64,
    ) -> Result<(SimulationState, Vec<FusionEvents>), SimulationError> {
        let mut current = state.clone();
        // Grows with the frames actually stepped; `frames` may be huge
        let mut history = Vec::new();

        for _ in 0..frames {
            let outcome = self.step(&current)?;
            history.push(outcome.events);
            current = outcome.state;
        }

        Ok((current, history))
    }
}
