//! Tests for FSM AI components.

use super::fsm::{AIConfig, AIState, AlertCooldown, NavPath, PatrolRoute};
use crate::nav::NodeId;
use bevy::prelude::*;

#[test]
fn test_ai_state_default() {
    let state = AIState::default();
    assert!(matches!(state, AIState::Patrol));
}

#[test]
fn test_ai_config_default() {
    let config = AIConfig::default();
    assert_eq!(config.move_speed, 3.5);
    assert_eq!(config.stopping_distance, 0.3);
    assert_eq!(config.alert_duration, 6.0);
    assert_eq!(config.alert_cooldown, 3.0);
}

#[test]
fn test_nav_path_cursor() {
    let mut path = NavPath::default();
    assert!(path.is_exhausted());
    assert_eq!(path.current_waypoint(), None);

    path.follow(vec![Vec3::X, Vec3::Y]);
    assert!(!path.is_exhausted());
    assert_eq!(path.current_waypoint(), Some(Vec3::X));

    path.advance();
    assert_eq!(path.current_waypoint(), Some(Vec3::Y));

    path.advance();
    assert!(path.is_exhausted());
    assert_eq!(path.current_waypoint(), None);

    // advance после конца — no-op, не паника
    path.advance();
    assert!(path.is_exhausted());
}

#[test]
fn test_patrol_route_cycles() {
    let mut route = PatrolRoute::new(vec![NodeId(0), NodeId(1), NodeId(2)]);

    assert_eq!(route.current_node(), Some(NodeId(0)));
    route.advance();
    route.advance();
    assert_eq!(route.current_node(), Some(NodeId(2)));
    route.advance();
    // Циклически обратно к началу
    assert_eq!(route.current_node(), Some(NodeId(0)));
}

#[test]
fn test_empty_patrol_route() {
    let mut route = PatrolRoute::default();
    assert_eq!(route.current_node(), None);
    route.advance();
    assert_eq!(route.current_node(), None);
}

#[test]
fn test_alert_cooldown() {
    let mut cooldown = AlertCooldown::default();
    assert!(cooldown.ready());

    cooldown.reset(3.0);
    assert!(!cooldown.ready());

    cooldown.tick(1.5);
    assert!(!cooldown.ready());

    cooldown.tick(1.5);
    assert!(cooldown.ready());

    // Не уходит в минус
    cooldown.tick(10.0);
    assert_eq!(cooldown.remaining, 0.0);
}
