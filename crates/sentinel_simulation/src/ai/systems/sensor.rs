//! Применение SensorEvent от host-слоя к VisionSensor компонентам.

use bevy::prelude::*;

use crate::ai::{SensorEvent, VisionSensor};

/// Система: SensorEvent → VisionSensor
///
/// События на неизвестные entity (despawned между тиками) молча
/// пропускаются — stale ссылка не должна ничего ронять.
pub fn apply_sensor_events(
    mut sensors: Query<&mut VisionSensor>,
    mut events: EventReader<SensorEvent>,
) {
    for event in events.read() {
        match *event {
            SensorEvent::TargetSpotted { observer, position } => {
                let Ok(mut sensor) = sensors.get_mut(observer) else {
                    continue;
                };
                sensor.can_see_target = true;
                sensor.target_position = Some(position);
            }
            SensorEvent::TargetLost { observer } => {
                let Ok(mut sensor) = sensors.get_mut(observer) else {
                    continue;
                };
                sensor.can_see_target = false;
                // target_position НЕ трогаем — это last-known для Alert
            }
        }
    }
}
