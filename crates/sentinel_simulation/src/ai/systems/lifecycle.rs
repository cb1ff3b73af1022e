//! Lifecycle hooks: AlertChannel ↔ живые агенты.
//!
//! Канал должен отражать только реально существующих агентов:
//! spawn с Agent = onActivate, despawn/удаление Agent = onDeactivate.

use bevy::prelude::*;

use crate::ai::{Agent, AlertChannel};

/// Система: регистрация новых агентов в канале
pub fn register_activated_agents(
    mut channel: ResMut<AlertChannel>,
    activated: Query<Entity, Added<Agent>>,
) {
    for entity in activated.iter() {
        channel.register(entity);
    }
}

/// Система: снятие уничтоженных/деактивированных агентов
pub fn unregister_deactivated_agents(
    mut channel: ResMut<AlertChannel>,
    mut deactivated: RemovedComponents<Agent>,
) {
    for entity in deactivated.read() {
        channel.unregister(entity);
    }
}
