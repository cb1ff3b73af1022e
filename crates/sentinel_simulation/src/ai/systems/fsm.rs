//! FSM transitions: Patrol / Chase / Alert / Return.
//!
//! Вся transition-логика в одной системе — одна точка аудита.
//! Приоритеты на tick:
//! 1. Цель видна → Chase (из любого state)
//! 2. Pending alert → Alert (игнорируется только в Chase)
//! 3. Иначе — обычный переход текущего state
//!
//! "Нет пути" нигде не ошибка: агент стоит на месте и переоценивает
//! на следующем relevant transition.

use bevy::prelude::*;

use crate::ai::{
    vantage_node, AIConfig, AIState, Agent, AlertChannel, AlertCooldown, LineOfSight, NavPath,
    PatrolRoute, VisionSensor,
};
use crate::nav::{find_path, NavGraph, NodeId};

/// Система: AI FSM transitions
pub fn ai_fsm_transitions(
    mut agents: Query<
        (
            Entity,
            &Transform,
            &VisionSensor,
            &mut AIState,
            &mut NavPath,
            &mut PatrolRoute,
            &mut AlertCooldown,
            &AIConfig,
        ),
        With<Agent>,
    >,
    graph: Res<NavGraph>,
    los: Res<LineOfSight>,
    mut channel: ResMut<AlertChannel>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, transform, sensor, mut state, mut path, mut route, mut cooldown, config) in
        agents.iter_mut()
    {
        cooldown.tick(delta);

        let position = transform.translation;
        let pending = channel.take_pending(entity);

        // Видимость перекрывает всё: любой state → Chase.
        // canSeeTarget без позиции (цель исчезла между тиками) видимостью
        // не считается — ниже отработает fallback на last-known.
        let visible = if sensor.can_see_target {
            sensor.target_position
        } else {
            None
        };

        if let Some(target) = visible {
            chase_tick(
                entity,
                position,
                target,
                &mut state,
                &mut path,
                &mut cooldown,
                config,
                &graph,
                &mut channel,
                delta,
            );
            continue;
        }

        // Входящий alert: Chase-агент уже видит цель и не перенаправляется,
        // остальные немедленно бросают что делали
        if let Some(alert) = pending {
            if !matches!(*state, AIState::Chase { .. }) {
                *state = enter_alert(
                    entity,
                    position,
                    alert.position,
                    alert.duration,
                    &mut path,
                    &graph,
                    &los,
                );
                continue;
            }
        }

        let new_state = match state.as_ref() {
            AIState::Patrol => {
                if path.is_exhausted() {
                    start_next_patrol_leg(entity, position, &mut route, &mut path, &graph, &los);
                }
                AIState::Patrol
            }

            AIState::Chase { last_seen, .. } => {
                // Видимость потеряна → ищем у last-known позиции
                enter_alert(
                    entity,
                    position,
                    *last_seen,
                    config.search_duration,
                    &mut path,
                    &graph,
                    &los,
                )
            }

            AIState::Alert {
                target,
                search_timer,
                search_duration,
            } => {
                let elapsed = search_timer + delta;
                if path.is_exhausted() && elapsed >= *search_duration {
                    enter_return(entity, position, &mut route, &mut path, &graph)
                } else {
                    AIState::Alert {
                        target: *target,
                        search_timer: elapsed,
                        search_duration: *search_duration,
                    }
                }
            }

            AIState::Return => {
                if path.is_exhausted() {
                    crate::logger::log_info(&format!("AI: {:?} Return → Patrol", entity));
                    AIState::Patrol
                } else {
                    AIState::Return
                }
            }
        };

        if *state != new_state {
            *state = new_state;
        }
    }
}

/// Chase tick: запись last_seen, broadcast на входе (rate-limited),
/// периодический repath к цели.
fn chase_tick(
    entity: Entity,
    position: Vec3,
    target: Vec3,
    state: &mut AIState,
    path: &mut NavPath,
    cooldown: &mut AlertCooldown,
    config: &AIConfig,
    graph: &NavGraph,
    channel: &mut AlertChannel,
    delta: f32,
) {
    let entering = !matches!(*state, AIState::Chase { .. });
    if entering {
        crate::logger::log_info(&format!("AI: {:?} → Chase (target {:?})", entity, target));

        // Rate limit: повторный вход в Chase внутри cooldown-окна
        // канал не флудит
        if cooldown.ready() {
            channel.broadcast(target, config.alert_duration);
            cooldown.reset(config.alert_cooldown);
        }
    }

    let repath_timer = match *state {
        AIState::Chase { repath_timer, .. } => repath_timer - delta,
        _ => 0.0, // немедленный repath при входе
    };

    if repath_timer <= 0.0 {
        request_route(position, target, path, graph);
        *state = AIState::Chase {
            last_seen: target,
            repath_timer: config.repath_interval,
        };
    } else {
        *state = AIState::Chase {
            last_seen: target,
            repath_timer,
        };
    }
}

/// Вход в Alert: маршрут к точке откуда last-known позиция видна.
///
/// Предпочтение: vantage-нода (видит target) → нода ближайшая к
/// target → нода ближайшая к агенту. Пустой граф → стоим, остаёмся
/// в Alert и ждём таймер.
fn enter_alert(
    entity: Entity,
    position: Vec3,
    target: Vec3,
    search_duration: f32,
    path: &mut NavPath,
    graph: &NavGraph,
    los: &LineOfSight,
) -> AIState {
    crate::logger::log_info(&format!(
        "AI: {:?} → Alert (last known {:?})",
        entity, target
    ));

    let goal = vantage_node(graph, los, target)
        .or_else(|| graph.nearest_node(target))
        .or_else(|| graph.nearest_node(position));

    match (graph.nearest_node(position), goal) {
        (Some(start), Some(goal)) => {
            let node_path = find_path(graph, start, goal);
            follow_node_path(path, graph, &node_path);
        }
        _ => path.clear(),
    }

    AIState::Alert {
        target,
        search_timer: 0.0,
        search_duration,
    }
}

/// Вход в Return: путь к ближайшей (Euclidean) patrol-ноде.
///
/// Patrol-индекс переставляется на неё, чтобы после возвращения обход
/// продолжился с этого места, а не телепортом через всю карту.
fn enter_return(
    entity: Entity,
    position: Vec3,
    route: &mut PatrolRoute,
    path: &mut NavPath,
    graph: &NavGraph,
) -> AIState {
    crate::logger::log_info(&format!("AI: {:?} Alert → Return", entity));

    let nearest_patrol = route
        .nodes
        .iter()
        .enumerate()
        .filter_map(|(i, &id)| graph.position(id).map(|p| (i, id, position.distance(p))))
        .min_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));

    match (graph.nearest_node(position), nearest_patrol) {
        (Some(start), Some((index, goal, _))) => {
            route.current = index;
            let node_path = find_path(graph, start, goal);
            follow_node_path(path, graph, &node_path);
        }
        _ => path.clear(), // нет графа или patrol-список пуст — стоим
    }

    AIState::Return
}

/// Patrol: путь к текущей patrol-ноде, индекс двигается сразу после
/// запроса (cyclic, как и при неудаче — чтобы не зациклиться на одной
/// недостижимой ноде).
///
/// Если waypoint не виден с текущей позиции или прямой запрос пуст —
/// сначала indirect маршрут через vantage-ноду waypoint'а, потом
/// fallback на прямой.
fn start_next_patrol_leg(
    entity: Entity,
    position: Vec3,
    route: &mut PatrolRoute,
    path: &mut NavPath,
    graph: &NavGraph,
    los: &LineOfSight,
) {
    let Some(next) = route.current_node() else {
        return; // patrol-маршрут пуст — не патрулируем
    };
    let Some(waypoint_pos) = graph.position(next) else {
        // Маршрут ссылается на несуществующую ноду — пропускаем её
        route.advance();
        return;
    };
    let Some(start) = graph.nearest_node(position) else {
        return;
    };

    let direct = find_path(graph, start, next);

    let chosen = if los.is_visible(position, waypoint_pos) && !direct.is_empty() {
        direct
    } else {
        let indirect = vantage_node(graph, los, waypoint_pos)
            .map(|via| {
                let mut node_path = find_path(graph, start, via);
                if node_path.is_empty() {
                    return node_path;
                }
                // Достраиваем хвост от vantage до самого waypoint'а
                let tail = find_path(graph, via, next);
                if tail.len() > 1 {
                    node_path.extend_from_slice(&tail[1..]);
                }
                node_path
            })
            .unwrap_or_default();

        if indirect.is_empty() {
            direct
        } else {
            indirect
        }
    };

    if chosen.is_empty() {
        crate::logger::log_warning(&format!(
            "AI: {:?} patrol-нода {:?} недостижима",
            entity, next
        ));
        path.clear();
    } else {
        follow_node_path(path, graph, &chosen);
    }

    route.advance();
}

/// Путь к цели через ближайшие ноды графа (Chase repath)
fn request_route(position: Vec3, target: Vec3, path: &mut NavPath, graph: &NavGraph) {
    let (Some(start), Some(goal)) = (graph.nearest_node(position), graph.nearest_node(target))
    else {
        path.clear(); // пустой граф — стоим на месте
        return;
    };

    let node_path = find_path(graph, start, goal);
    follow_node_path(path, graph, &node_path);
}

/// NodeId-путь → waypoint-позиции в NavPath
fn follow_node_path(path: &mut NavPath, graph: &NavGraph, node_path: &[NodeId]) {
    let waypoints = node_path
        .iter()
        .filter_map(|&id| graph.position(id))
        .collect();
    path.follow(waypoints);
}
