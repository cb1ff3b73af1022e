//! Движение вдоль пути: fixed speed, bounded turn rate.

use bevy::prelude::*;

use crate::ai::{AIConfig, Agent, NavPath};

/// Система: продвижение агента к текущему waypoint'у пути.
///
/// Скорость фиксированная (config.move_speed), ориентация — slerp к
/// направлению движения с ограничением turn_rate: никакого мгновенного
/// разворота. Внутри stopping_distance курсор переходит к следующему
/// waypoint'у.
pub fn ai_advance_along_path(
    mut agents: Query<(&mut Transform, &mut NavPath, &AIConfig), With<Agent>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut path, config) in agents.iter_mut() {
        let Some(waypoint) = path.current_waypoint() else {
            continue; // нет пути — стоим, FSM решит что дальше
        };

        let to_waypoint = waypoint - transform.translation;
        let distance = to_waypoint.length();

        if distance <= config.stopping_distance {
            path.advance();
            continue;
        }

        let direction = to_waypoint / distance;

        // Поворот: только по yaw (граф плоский по Y)
        let flat = Vec3::new(direction.x, 0.0, direction.z);
        if flat.length_squared() > 1e-6 {
            let desired = Transform::default().looking_to(flat, Vec3::Y).rotation;
            let angle = transform.rotation.angle_between(desired);
            if angle > 1e-4 {
                let t = (config.turn_rate * delta / angle).min(1.0);
                let current = transform.rotation;
                transform.rotation = current.slerp(desired, t);
            }
        }

        // Не перескакиваем waypoint на больших delta
        let step = config.move_speed * delta;
        if step >= distance {
            transform.translation = waypoint;
        } else {
            transform.translation += direction * step;
        }
    }
}
