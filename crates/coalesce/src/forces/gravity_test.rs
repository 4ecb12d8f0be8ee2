use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::body::{Body, BodyId};
use crate::forces::{ForceModel, G, SoftenedGravity};
use crate::state::SimulationState;

fn make_pair(distance: f64, mass_a: f64, mass_b: f64) -> SimulationState {
    let bodies = vec![
        Body::new(BodyId(0), mass_a, Point2::new(0.0, 0.0), Vector2::zeros()),
        Body::new(BodyId(1), mass_b, Point2::new(distance, 0.0), Vector2::zeros()),
    ];
    SimulationState::from_bodies(bodies, 0.0, 0).unwrap()
}

#[test]
fn test_defaults() {
    let gravity = SoftenedGravity::default();
    assert_eq!(gravity.g, G);
    assert_eq!(gravity.softening, 2.0);
}

#[test]
fn test_acceleration_points_toward_other_body() {
    let state = make_pair(10.0, 10.0, 20.0);
    let gravity = SoftenedGravity::default();

    let a0 = gravity.acceleration(0, &state);
    let a1 = gravity.acceleration(1, &state);

    assert!(a0.x > 0.0);
    assert!(a1.x < 0.0);
    assert_eq!(a0.y, 0.0);
    assert_eq!(a1.y, 0.0);
}

#[test]
fn test_acceleration_magnitude_uses_additive_softening() {
    let state = make_pair(10.0, 10.0, 20.0);
    let gravity = SoftenedGravity::new(4.0, 2.0);

    let a0 = gravity.acceleration(0, &state);

    // G * m_other / (r + softening)²
    let expected = 4.0 * 20.0 / (12.0 * 12.0);
    assert_relative_eq!(a0.magnitude(), expected, epsilon = 1e-12);
}

#[test]
fn test_newton_third_law() {
    let state = make_pair(7.0, 10.0, 40.0);
    let gravity = SoftenedGravity::default();

    let f0 = gravity.acceleration(0, &state) * 10.0;
    let f1 = gravity.acceleration(1, &state) * 40.0;

    assert_relative_eq!(f0.x, -f1.x, epsilon = 1e-12);
}

#[test]
fn test_coincident_bodies_feel_no_force() {
    let state = make_pair(0.0, 10.0, 20.0);
    let gravity = SoftenedGravity::default();

    let a0 = gravity.acceleration(0, &state);
    assert_eq!(a0, Vector2::zeros());
    assert!(a0.x.is_finite());
}

#[test]
fn test_zero_softening_stays_finite_for_coincident_bodies() {
    let state = make_pair(0.0, 10.0, 20.0);
    let gravity = SoftenedGravity::new(4.0, 0.0);

    let a0 = gravity.acceleration(0, &state);
    assert_eq!(a0, Vector2::zeros());
}

#[test]
fn test_lone_body_has_no_acceleration() {
    let bodies = vec![Body::new(BodyId(0), 10.0, Point2::new(3.0, 3.0), Vector2::zeros())];
    let state = SimulationState::from_bodies(bodies, 0.0, 0).unwrap();

    let gravity = SoftenedGravity::default();
    assert_eq!(gravity.acceleration(0, &state), Vector2::zeros());
}

#[test]
fn test_accelerations_follow_body_order() {
    let state = make_pair(10.0, 10.0, 20.0);
    let gravity = SoftenedGravity::default();

    let all = gravity.accelerations(&state);

    assert_eq!(all.len(), 2);
    assert_eq!(all[0], gravity.acceleration(0, &state));
    assert_eq!(all[1], gravity.acceleration(1, &state));
}

#[test]
fn test_potential_energy() {
    let state = make_pair(10.0, 10.0, 20.0);
    let gravity = SoftenedGravity::new(4.0, 2.0);

    let expected = -4.0 * 10.0 * 20.0 / 12.0;
    assert_relative_eq!(gravity.potential_energy(&state), expected, epsilon = 1e-12);
}
