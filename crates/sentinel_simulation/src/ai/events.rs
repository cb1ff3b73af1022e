//! Sensor события от host-слоя.
//!
//! Vision cone / FOV геометрия (радиус, угол, raycast) живёт снаружи:
//! host считает видимость и шлёт события, core только обновляет
//! VisionSensor компонент и реагирует.

use bevy::prelude::*;

/// События vision-сенсора
#[derive(Event, Debug, Clone)]
pub enum SensorEvent {
    /// Цель видна наблюдателю (позиция в мире на этот tick)
    TargetSpotted { observer: Entity, position: Vec3 },

    /// Цель потеряна (вышла из FOV / перекрыта)
    TargetLost { observer: Entity },
}
