//! Sentinel Simulation Core
//!
//! Headless ECS-симуляция охранных NPC на Bevy 0.16:
//! - patrol по статическому waypoint-графу (nav::graph)
//! - A* pathfinding с per-call scratch arena (nav::astar)
//! - vision-driven FSM: Patrol / Chase / Alert / Return (ai)
//! - координация погони через AlertChannel broadcast (ai::alert)
//!
//! Рендер, физика, FOV-геометрия и spawn префабов живут в host-слое:
//! core потребляет VisionSensor/SensorEvent и LineOfSight предикат,
//! производит Transform и state transitions.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod logger;
pub mod nav;

// Re-export основных типов для удобства
pub use ai::{
    vantage_node, AIConfig, AIPlugin, AIState, Agent, AgentBundle, AlertChannel, AlertCooldown,
    AlertEvent, LineOfSight, NavPath, PatrolRoute, SensorEvent, VisionSensor,
};
pub use nav::{find_path, NavGraph, NavGraphData, NavNode, NavNodeData, NodeId};

/// Fixed timestep симуляции (60Hz, легче считать интервалы)
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            // Граф по умолчанию пустой: агенты просто не патрулируют,
            // пока host не вставит реальный NavGraph
            .init_resource::<NavGraph>()
            .add_plugins(AIPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции.
///
/// Время двигается вручную ровно на один fixed tick за update —
/// прогоны не зависят от wall clock и полностью воспроизводимы.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();

    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_micros(
            16_667, // чуть больше 1/60с, FixedUpdate срабатывает каждый update
        )))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
        .insert_resource(DeterministicRng::new(seed))
        .init_resource::<NavGraph>()
        .add_plugins(AIPlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
/// (Debug-сериализация, отсортировано по Entity ID)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
