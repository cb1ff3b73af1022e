//! FSM AI components (state machine, sensor signal, path, patrol route).

use bevy::prelude::*;

use crate::nav::NodeId;

/// Marker охранного агента.
///
/// Добавление компонента = onActivate (регистрация в AlertChannel),
/// удаление/despawn = onDeactivate (снятие). См. systems::lifecycle.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Agent;

/// Per-tick сигнал vision-сенсора (пишется хостом или через SensorEvent).
///
/// target_position сохраняет last-known позицию и после потери цели —
/// это fallback для Alert, когда цель исчезла между тиками.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct VisionSensor {
    pub can_see_target: bool,
    pub target_position: Option<Vec3>,
}

/// AI FSM состояния.
///
/// Tagged enum вместо class-иерархии со state-объектами: вся
/// transition-логика в одной системе (systems::fsm), аудируется в
/// одном месте, никакого virtual dispatch.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum AIState {
    /// Patrol — циклический обход patrol-нод
    Patrol,

    /// Chase — цель видна, преследуем
    Chase {
        /// Последняя виденная позиция цели
        last_seen: Vec3,
        /// Время до следующего repath к цели (секунды)
        repath_timer: f32,
    },

    /// Alert — цель потеряна или получен alert от союзника,
    /// ищем у last-known позиции
    Alert {
        /// Позиция вокруг которой ищем
        target: Vec3,
        /// Накопленное время поиска (секунды)
        search_timer: f32,
        /// Бюджет поиска (секунды): из alert duration или config
        search_duration: f32,
    },

    /// Return — путь назад к ближайшей patrol-ноде
    Return,
}

impl Default for AIState {
    fn default() -> Self {
        Self::Patrol
    }
}

/// Текущий путь (позиции нод) + курсор.
///
/// Пустой путь / exhausted курсор — легальное состояние "стоим на
/// месте", не ошибка.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct NavPath {
    pub waypoints: Vec<Vec3>,
    pub cursor: usize,
}

impl NavPath {
    pub fn follow(&mut self, waypoints: Vec<Vec3>) {
        self.waypoints = waypoints;
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.cursor = 0;
    }

    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.waypoints.get(self.cursor).copied()
    }

    pub fn advance(&mut self) {
        if self.cursor < self.waypoints.len() {
            self.cursor += 1;
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.waypoints.len()
    }
}

/// Циклический patrol-маршрут (ноды графа)
#[derive(Component, Debug, Clone, Default)]
pub struct PatrolRoute {
    pub nodes: Vec<NodeId>,
    pub current: usize,
}

impl PatrolRoute {
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self { nodes, current: 0 }
    }

    pub fn current_node(&self) -> Option<NodeId> {
        self.nodes.get(self.current).copied()
    }

    /// Следующая нода в cyclic-порядке
    pub fn advance(&mut self) {
        if !self.nodes.is_empty() {
            self.current = (self.current + 1) % self.nodes.len();
        }
    }
}

/// Rate limiter на broadcast: агент не флудит канал каждый tick
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AlertCooldown {
    pub remaining: f32,
}

impl AlertCooldown {
    pub fn ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn tick(&mut self, delta: f32) {
        self.remaining = (self.remaining - delta).max(0.0);
    }

    pub fn reset(&mut self, cooldown: f32) {
        self.remaining = cooldown;
    }
}

/// Параметры AI
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AIConfig {
    /// Скорость движения (м/с)
    pub move_speed: f32,
    /// Дистанция "waypoint достигнут" (метры)
    pub stopping_distance: f32,
    /// Максимальная скорость поворота (рад/с)
    pub turn_rate: f32,
    /// Минимальный интервал между broadcast alerts (секунды)
    pub alert_cooldown: f32,
    /// Срок рассылаемого alert = search budget получателя (секунды)
    pub alert_duration: f32,
    /// Бюджет поиска после потери цели (секунды)
    pub search_duration: f32,
    /// Интервал repath в Chase (секунды)
    pub repath_interval: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.5,
            stopping_distance: 0.3,
            turn_rate: std::f32::consts::TAU, // полный оборот за секунду
            alert_cooldown: 3.0,
            alert_duration: 6.0,
            search_duration: 4.0,
            repath_interval: 0.5,
        }
    }
}

/// Bundle для спавна охранного агента
#[derive(Bundle, Default)]
pub struct AgentBundle {
    pub agent: Agent,
    pub state: AIState,
    pub config: AIConfig,
    pub sensor: VisionSensor,
    pub path: NavPath,
    pub route: PatrolRoute,
    pub cooldown: AlertCooldown,
    pub transform: Transform,
}
