use std::sync::Arc;

use nalgebra::{Point2, Vector2};

use crate::body::{Body, BodyId};
use crate::error::SimulationError;
use crate::state::SimulationState;

fn make_test_state() -> SimulationState {
    let bodies = vec![
        Body::new(BodyId(0), 10.0, Point2::new(0.0, 0.0), Vector2::new(1.0, 0.0)),
        Body::new(BodyId(1), 20.0, Point2::new(10.0, 0.0), Vector2::new(0.0, 1.0)),
        Body::new(BodyId(2), 30.0, Point2::new(0.0, 10.0), Vector2::new(-1.0, 0.0)),
    ];
    SimulationState::from_bodies(bodies, 1.5, 3).unwrap()
}

#[test]
fn test_empty_state() {
    let state = SimulationState::empty();

    assert_eq!(state.time(), 0.0);
    assert_eq!(state.frame(), 0);
    assert!(state.is_empty());
    assert_eq!(state.next_id(), Some(BodyId(0)));
}

#[test]
fn test_from_bodies_keeps_order_and_counters() {
    let state = make_test_state();

    let ids: Vec<u32> = state.iter().map(|b| b.id.0).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(state.time(), 1.5);
    assert_eq!(state.frame(), 3);
    assert_eq!(state.next_id(), Some(BodyId(3)));
}

#[test]
fn test_from_bodies_rejects_duplicate_ids() {
    let bodies = vec![
        Body::new(BodyId(4), 1.0, Point2::origin(), Vector2::zeros()),
        Body::new(BodyId(4), 2.0, Point2::new(1.0, 1.0), Vector2::zeros()),
    ];

    let result = SimulationState::from_bodies(bodies, 0.0, 0);
    assert_eq!(result, Err(SimulationError::DuplicateId(BodyId(4))));
}

#[test]
fn test_get_body() {
    let state = make_test_state();

    let body = state.get(BodyId(1)).unwrap();
    assert_eq!(body.mass, 20.0);
    assert!(state.contains(BodyId(2)));
}

#[test]
fn test_get_missing_body() {
    let state = make_test_state();

    assert_eq!(
        state.get(BodyId(999)).err(),
        Some(SimulationError::NotFound(BodyId(999)))
    );
    assert!(!state.contains(BodyId(999)));
}

#[test]
fn test_with_replaced_body_leaves_original_untouched() {
    let state = make_test_state();
    let mut heavier = *state.get(BodyId(1)).unwrap();
    heavier.mass = 99.0;

    let replaced = state.with_replaced_body(heavier).unwrap();

    assert_eq!(replaced.get(BodyId(1)).unwrap().mass, 99.0);
    assert_eq!(state.get(BodyId(1)).unwrap().mass, 20.0);
    assert_eq!(replaced.body_count(), 3);
    assert_eq!(replaced.bodies()[1].id, BodyId(1));
}

#[test]
fn test_with_replaced_body_shares_untouched_records() {
    let state = make_test_state();
    let mut moved = *state.get(BodyId(0)).unwrap();
    moved.position = Point2::new(5.0, 5.0);

    let replaced = state.with_replaced_body(moved).unwrap();

    assert!(Arc::ptr_eq(&state.bodies()[1], &replaced.bodies()[1]));
    assert!(Arc::ptr_eq(&state.bodies()[2], &replaced.bodies()[2]));
    assert!(!Arc::ptr_eq(&state.bodies()[0], &replaced.bodies()[0]));
}

#[test]
fn test_with_replaced_body_unknown_id() {
    let state = make_test_state();
    let stranger = Body::new(BodyId(7), 1.0, Point2::origin(), Vector2::zeros());

    assert_eq!(
        state.with_replaced_body(stranger),
        Err(SimulationError::NotFound(BodyId(7)))
    );
}

#[test]
fn test_with_removed_body() {
    let state = make_test_state();

    let removed = state.with_removed_body(BodyId(1)).unwrap();

    let ids: Vec<u32> = removed.iter().map(|b| b.id.0).collect();
    assert_eq!(ids, vec![0, 2]);
    assert_eq!(removed.get(BodyId(2)).unwrap().mass, 30.0);
    assert!(removed.get(BodyId(1)).is_err());
    assert_eq!(state.body_count(), 3);
}

#[test]
fn test_with_removed_body_unknown_id() {
    let state = make_test_state();

    assert_eq!(
        state.with_removed_body(BodyId(999)),
        Err(SimulationError::NotFound(BodyId(999)))
    );
}

#[test]
fn test_ids_are_not_reused_after_removal() {
    let state = make_test_state();

    let state = state.with_removed_body(BodyId(2)).unwrap();
    let (state, id) = state.with_added_body(5.0, Point2::origin(), Vector2::zeros()).unwrap();

    assert_eq!(id, BodyId(3));
    assert_eq!(state.get(id).unwrap().mass, 5.0);
    assert_eq!(state.next_id(), Some(BodyId(4)));
}

#[test]
fn test_ids_exhausted_after_max_id() {
    let last = Body::new(BodyId(u32::MAX), 1.0, Point2::origin(), Vector2::zeros());
    let state = SimulationState::from_bodies(vec![last], 0.0, 0).unwrap();

    assert_eq!(state.next_id(), None);
    assert_eq!(
        state
            .with_added_body(5.0, Point2::origin(), Vector2::zeros())
            .unwrap_err(),
        SimulationError::IdsExhausted
    );

    // Removing the holder does not free its id
    let state = state.with_removed_body(BodyId(u32::MAX)).unwrap();
    assert_eq!(state.next_id(), None);
}

#[test]
fn test_last_id_can_be_handed_out() {
    let body = Body::new(BodyId(u32::MAX - 1), 1.0, Point2::origin(), Vector2::zeros());
    let state = SimulationState::from_bodies(vec![body], 0.0, 0).unwrap();

    let (state, id) = state
        .with_added_body(2.0, Point2::origin(), Vector2::zeros())
        .unwrap();

    assert_eq!(id, BodyId(u32::MAX));
    assert_eq!(state.next_id(), None);
}

#[test]
fn test_advanced() {
    let state = make_test_state();

    let next = state.advanced(0.5);

    assert!((next.time() - 2.0).abs() < 1e-15);
    assert_eq!(next.frame(), 4);
    assert_eq!(next.bodies(), state.bodies());
    assert_eq!(state.frame(), 3);
}

#[test]
fn test_with_bodies_keeps_time_and_frame() {
    let state = make_test_state();
    let subset = state.bodies()[..2].to_vec();

    let next = state.with_bodies(subset).unwrap();

    assert_eq!(next.body_count(), 2);
    assert_eq!(next.time(), state.time());
    assert_eq!(next.frame(), state.frame());
    assert_eq!(next.next_id(), state.next_id());
}

#[test]
fn test_total_mass() {
    let state = make_test_state();
    assert_eq!(state.total_mass(), 60.0);
}

#[test]
fn test_total_momentum() {
    let state = make_test_state();

    // (10, 0) + (0, 20) + (-30, 0)
    let p = state.total_momentum();
    assert!((p.x + 20.0).abs() < 1e-12);
    assert!((p.y - 20.0).abs() < 1e-12);
}

#[test]
fn test_center_of_mass() {
    let state = make_test_state();

    let com = state.center_of_mass().unwrap();
    assert!((com.x - 200.0 / 60.0).abs() < 1e-12);
    assert!((com.y - 300.0 / 60.0).abs() < 1e-12);
    assert!(SimulationState::empty().center_of_mass().is_none());
}

#[test]
fn test_value_equality() {
    assert_eq!(make_test_state(), make_test_state());
    assert_ne!(make_test_state(), make_test_state().advanced(0.1));
}
