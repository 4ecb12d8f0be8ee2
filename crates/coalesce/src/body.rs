use std::fmt;

use nalgebra::{Point2, Vector2};

/// Scale factor in `radius = RADIUS_SCALE * mass^(1/3)`
pub const RADIUS_SCALE: f64 = 3.0 / 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Radius of a body of the given mass
///
/// Radius is always derived from mass, both at creation and after a fusion.
///
/// # Examples
///
/// ```
/// use coalesce::body::radius_for_mass;
///
/// let r = radius_for_mass(27.0);
/// assert!((r - 9.0 / 7.0).abs() < 1e-12);
/// ```
pub fn radius_for_mass(mass: f64) -> f64 {
    RADIUS_SCALE * mass.cbrt()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub mass: f64,
    pub radius: f64, // derived, see `radius_for_mass`
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    /// Last computed acceleration; informational only
    pub acceleration: Vector2<f64>,
}

impl Body {
    /// Creates a body with zero acceleration and its radius derived from `mass`
    ///
    /// # Examples
    ///
    /// ```
    /// use coalesce::body::{Body, BodyId};
    /// use nalgebra::{Point2, Vector2};
    ///
    /// let body = Body::new(BodyId(3), 8.0, Point2::new(1.0, 2.0), Vector2::zeros());
    /// assert_eq!(body.id, BodyId(3));
    /// assert!((body.radius - 6.0 / 7.0).abs() < 1e-12);
    /// ```
    pub fn new(id: BodyId, mass: f64, position: Point2<f64>, velocity: Vector2<f64>) -> Self {
        Body {
            id,
            mass,
            radius: radius_for_mass(mass),
            position,
            velocity,
            acceleration: Vector2::zeros(),
        }
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (self.position - other.position).magnitude()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }
}
