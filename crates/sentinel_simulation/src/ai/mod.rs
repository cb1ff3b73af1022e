//! AI decision-making module
//!
//! Vision-driven FSM для охранных агентов (Patrol/Chase/Alert/Return),
//! координация погони через AlertChannel, движение вдоль A*-путей.

use bevy::prelude::*;

pub mod alert;
pub mod components;
pub mod events;
pub mod los;
pub mod systems;

pub use alert::{AlertChannel, AlertEvent};
pub use components::*;
pub use events::SensorEvent;
pub use los::{vantage_node, LineOfSight};

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate. Порядок выполнения:
/// 1. register_activated_agents / unregister_deactivated_agents —
///    синхронизация AlertChannel с живыми агентами
/// 2. apply_sensor_events — SensorEvent → VisionSensor
/// 3. ai_fsm_transitions — обновление FSM state + path запросы + alerts
/// 4. ai_advance_along_path — движение/поворот вдоль текущего пути
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AlertChannel>()
            .init_resource::<LineOfSight>()
            .add_event::<SensorEvent>()
            .add_systems(
                FixedUpdate,
                (
                    systems::register_activated_agents,
                    systems::unregister_deactivated_agents,
                    systems::apply_sensor_events,
                    systems::ai_fsm_transitions,
                    systems::ai_advance_along_path,
                )
                    .chain(), // Последовательное выполнение для детерминизма
            );
    }
}
