//! Direct-sum gravity with an additive softening offset (O(N²))

use crate::forces::{DEFAULT_SOFTENING, ForceModel, G};
use crate::state::SimulationState;
use nalgebra::Vector2;

/// Direct O(N²) gravitational acceleration
///
/// The force is attractive: body i is accelerated along `pos_j - pos_i`,
/// toward every other body j, with magnitude `G m_j / (|dr| + softening)²`.
///
/// The separation used in the force law is `|dr| + softening`, not the
/// Plummer form `sqrt(|dr|² + eps²)`. With a positive offset the
/// denominator never reaches zero, so coincident bodies exert no force
/// instead of a singular one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftenedGravity {
    /// Gravitational constant
    pub g: f64,
    /// Additive distance offset
    pub softening: f64,
}

impl SoftenedGravity {
    pub fn new(g: f64, softening: f64) -> Self {
        Self { g, softening }
    }

    /// Softened separation between two points
    fn softened_distance(&self, dr: &Vector2<f64>) -> f64 {
        dr.magnitude() + self.softening
    }
}

impl Default for SoftenedGravity {
    fn default() -> Self {
        Self::new(G, DEFAULT_SOFTENING)
    }
}

impl ForceModel for SoftenedGravity {
    fn acceleration(&self, idx: usize, state: &SimulationState) -> Vector2<f64> {
        let bodies = state.bodies();
        let body = &bodies[idx];

        bodies
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, other)| {
                let dr = other.position - body.position;
                let distance = self.softened_distance(&dr);
                if distance == 0.0 {
                    return Vector2::zeros();
                }
                // |a| = G m / d², along dr / d
                dr * (self.g * other.mass / (distance * distance * distance))
            })
            .fold(Vector2::zeros(), |acc, a| acc + a)
    }

    fn potential_energy(&self, state: &SimulationState) -> f64 {
        let bodies = state.bodies();

        bodies
            .iter()
            .enumerate()
            .flat_map(|(i, a)| {
                bodies[i + 1..].iter().map(move |b| {
                    let distance = self.softened_distance(&(a.position - b.position));
                    if distance == 0.0 {
                        0.0
                    } else {
                        -self.g * a.mass * b.mass / distance
                    }
                })
            })
            .sum()
    }
}
