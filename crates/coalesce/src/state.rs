use std::collections::HashMap;
use std::sync::Arc;

use nalgebra::{Point2, Vector2};

use crate::body::{Body, BodyId};
use crate::error::SimulationError;

/// Immutable snapshot of the simulation at one frame
///
/// Body records are reference counted, so deriving a new snapshot only
/// copies pointers for the bodies it does not touch. No method mutates
/// `self`; every transformation returns a fresh snapshot.
#[derive(Debug, Clone)]
pub struct SimulationState {
    time: f64,
    frame: u64,
    bodies: Vec<Arc<Body>>,
    index: HashMap<BodyId, usize>,
    /// Next id handed out by `with_added_body`; never decreases
    ///
    /// Wider than `BodyId` so that a body holding `u32::MAX` leaves the
    /// counter past the end instead of wrapping.
    next_id: u64,
}

fn build_index(bodies: &[Arc<Body>]) -> Result<HashMap<BodyId, usize>, SimulationError> {
    let mut index = HashMap::with_capacity(bodies.len());
    for (i, body) in bodies.iter().enumerate() {
        if index.insert(body.id, i).is_some() {
            return Err(SimulationError::DuplicateId(body.id));
        }
    }
    Ok(index)
}

impl SimulationState {
    /// Creates an empty snapshot at time zero
    pub fn empty() -> Self {
        Self {
            time: 0.0,
            frame: 0,
            bodies: Vec::new(),
            index: HashMap::new(),
            next_id: 0,
        }
    }

    /// Creates a snapshot from owned bodies
    ///
    /// Fails with `DuplicateId` if two bodies share an id.
    ///
    /// # Examples
    ///
    /// ```
    /// use coalesce::body::{Body, BodyId};
    /// use coalesce::state::SimulationState;
    /// use nalgebra::{Point2, Vector2};
    ///
    /// let bodies = vec![
    ///     Body::new(BodyId(0), 10.0, Point2::new(0.0, 0.0), Vector2::zeros()),
    ///     Body::new(BodyId(1), 20.0, Point2::new(5.0, 0.0), Vector2::zeros()),
    /// ];
    /// let state = SimulationState::from_bodies(bodies, 0.0, 0).unwrap();
    ///
    /// assert_eq!(state.body_count(), 2);
    /// assert_eq!(state.get(BodyId(1)).unwrap().mass, 20.0);
    /// ```
    pub fn from_bodies(bodies: Vec<Body>, time: f64, frame: u64) -> Result<Self, SimulationError> {
        let shared = bodies.into_iter().map(Arc::new).collect();
        Self::assemble(shared, time, frame, 0)
    }

    fn assemble(
        bodies: Vec<Arc<Body>>,
        time: f64,
        frame: u64,
        next_id: u64,
    ) -> Result<Self, SimulationError> {
        let index = build_index(&bodies)?;
        let next_id = bodies
            .iter()
            .map(|b| u64::from(b.id.0) + 1)
            .fold(next_id, u64::max);

        Ok(Self {
            time,
            frame,
            bodies,
            index,
            next_id,
        })
    }

    /// Simulation time of this snapshot
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of steps taken to reach this snapshot
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Bodies in stable order
    pub fn bodies(&self) -> &[Arc<Body>] {
        &self.bodies
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().map(|b| b.as_ref())
    }

    /// Id the next `with_added_body` will hand out, `None` once exhausted
    pub fn next_id(&self) -> Option<BodyId> {
        u32::try_from(self.next_id).ok().map(BodyId)
    }

    /// Looks up a body by id in O(1)
    ///
    /// A missing id means a caller holds a stale reference, so it is
    /// reported as `NotFound` rather than silently ignored.
    pub fn get(&self, id: BodyId) -> Result<&Body, SimulationError> {
        self.index
            .get(&id)
            .map(|&i| self.bodies[i].as_ref())
            .ok_or(SimulationError::NotFound(id))
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Returns a snapshot with the body of matching id substituted
    ///
    /// Order is preserved and the id index is shared unchanged.
    pub fn with_replaced_body(&self, body: Body) -> Result<Self, SimulationError> {
        let &slot = self
            .index
            .get(&body.id)
            .ok_or(SimulationError::NotFound(body.id))?;

        let mut bodies = self.bodies.clone();
        bodies[slot] = Arc::new(body);

        Ok(Self {
            time: self.time,
            frame: self.frame,
            bodies,
            index: self.index.clone(),
            next_id: self.next_id,
        })
    }

    /// Returns a snapshot without the body of the given id
    pub fn with_removed_body(&self, id: BodyId) -> Result<Self, SimulationError> {
        if !self.contains(id) {
            return Err(SimulationError::NotFound(id));
        }

        let bodies = self
            .bodies
            .iter()
            .filter(|b| b.id != id)
            .cloned()
            .collect();
        Self::assemble(bodies, self.time, self.frame, self.next_id)
    }

    /// Returns a snapshot with one more body and the id it was given
    ///
    /// Ids are handed out monotonically and never reused, even after the
    /// body holding an id has been removed. Fails with `IdsExhausted` once
    /// `u32::MAX` has been handed out.
    ///
    /// # Examples
    ///
    /// ```
    /// use coalesce::state::SimulationState;
    /// use nalgebra::{Point2, Vector2};
    ///
    /// let state = SimulationState::empty();
    /// let (state, first) = state.with_added_body(10.0, Point2::new(1.0, 0.0), Vector2::zeros()).unwrap();
    /// let state = state.with_removed_body(first).unwrap();
    /// let (state, second) = state.with_added_body(5.0, Point2::origin(), Vector2::zeros()).unwrap();
    ///
    /// assert_ne!(first, second);
    /// assert_eq!(state.body_count(), 1);
    /// ```
    pub fn with_added_body(
        &self,
        mass: f64,
        position: Point2<f64>,
        velocity: Vector2<f64>,
    ) -> Result<(Self, BodyId), SimulationError> {
        let id = self.next_id().ok_or(SimulationError::IdsExhausted)?;
        let mut bodies = self.bodies.clone();
        let mut index = self.index.clone();
        index.insert(id, bodies.len());
        bodies.push(Arc::new(Body::new(id, mass, position, velocity)));

        let state = Self {
            time: self.time,
            frame: self.frame,
            bodies,
            index,
            next_id: self.next_id + 1,
        };
        Ok((state, id))
    }

    /// Returns a snapshot holding `bodies` at this snapshot's time and frame
    pub fn with_bodies(&self, bodies: Vec<Arc<Body>>) -> Result<Self, SimulationError> {
        Self::assemble(bodies, self.time, self.frame, self.next_id)
    }

    /// Returns the same bodies one frame later
    pub fn advanced(&self, dt: f64) -> Self {
        Self {
            time: self.time + dt,
            frame: self.frame + 1,
            ..self.clone()
        }
    }

    pub fn total_mass(&self) -> f64 {
        self.iter().map(|b| b.mass).sum()
    }

    /// Total linear momentum; unchanged by fusions
    pub fn total_momentum(&self) -> Vector2<f64> {
        self.iter()
            .map(|b| b.momentum())
            .fold(Vector2::zeros(), |acc, p| acc + p)
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.iter().map(|b| b.kinetic_energy()).sum()
    }

    /// Mass-weighted mean position, `None` for an empty snapshot
    pub fn center_of_mass(&self) -> Option<Point2<f64>> {
        let total = self.total_mass();
        if self.is_empty() || total <= 0.0 {
            return None;
        }

        let weighted = self
            .iter()
            .map(|b| b.position.coords * b.mass)
            .fold(Vector2::zeros(), |acc, p| acc + p);
        Some(Point2::from(weighted / total))
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for SimulationState {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
            && self.frame == other.frame
            && self.next_id == other.next_id
            && self.bodies == other.bodies
    }
}
