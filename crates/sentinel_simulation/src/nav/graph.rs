//! Waypoint-граф: ноды, рёбра, nearest-node запросы.
//!
//! Граф статический — строится один раз при загрузке уровня и живёт
//! всю сессию. Search-поля (gCost/hCost/parent) на нодах НЕ хранятся:
//! A* держит их в per-call scratch arena (см. nav::astar), поэтому
//! параллельные поиски не могут затереть друг другу состояние.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Идентификатор ноды — индекс в arena графа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Waypoint навигационного графа
#[derive(Debug, Clone)]
pub struct NavNode {
    pub position: Vec3,
    /// Соседи (рёбра взаимные, cost симметричный — Euclidean distance)
    pub neighbors: Vec<NodeId>,
}

/// Статический набор waypoint'ов и их связность
#[derive(Resource, Debug, Clone, Default)]
pub struct NavGraph {
    nodes: Vec<NavNode>,
}

impl NavGraph {
    pub fn add_node(&mut self, position: Vec3) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NavNode {
            position,
            neighbors: Vec::new(),
        });
        id
    }

    /// Соединяет две ноды взаимным ребром. Идемпотентно, self-loop — no-op.
    pub fn connect(&mut self, a: NodeId, b: NodeId) {
        if a == b || a.0 >= self.nodes.len() || b.0 >= self.nodes.len() {
            return;
        }

        if !self.nodes[a.0].neighbors.contains(&b) {
            self.nodes[a.0].neighbors.push(b);
        }
        if !self.nodes[b.0].neighbors.contains(&a) {
            self.nodes[b.0].neighbors.push(a);
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&NavNode> {
        self.nodes.get(id.0)
    }

    pub fn position(&self, id: NodeId) -> Option<Vec3> {
        self.nodes.get(id.0).map(|n| n.position)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NavNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Ближайшая к position нода (Euclidean).
    ///
    /// Tie-break: строгое `<`, при равных дистанциях выигрывает нода
    /// с меньшим id — стабильно и детерминированно.
    /// None только на пустом графе (caller трактует как "нет патруля",
    /// не как fatal).
    pub fn nearest_node(&self, position: Vec3) -> Option<NodeId> {
        let mut closest: Option<(NodeId, f32)> = None;

        for (i, node) in self.nodes.iter().enumerate() {
            let dist = position.distance(node.position);
            match closest {
                Some((_, best)) if dist >= best => {}
                _ => closest = Some((NodeId(i), dist)),
            }
        }

        closest.map(|(id, _)| id)
    }
}

/// Serde-описание графа (level data от host-слоя).
///
/// Механизм построения уровня вне core: host грузит NavGraphData
/// откуда хочет (json, embedded asset) и конвертит в NavGraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavGraphData {
    pub nodes: Vec<NavNodeData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavNodeData {
    pub position: [f32; 3],
    #[serde(default)]
    pub neighbors: Vec<usize>,
}

impl From<NavGraphData> for NavGraph {
    fn from(data: NavGraphData) -> Self {
        let mut graph = NavGraph::default();

        for node in &data.nodes {
            graph.add_node(Vec3::from_array(node.position));
        }

        for (i, node) in data.nodes.iter().enumerate() {
            for &j in &node.neighbors {
                if j >= data.nodes.len() {
                    crate::logger::log_warning(&format!(
                        "NavGraph: нода {} ссылается на несуществующего соседа {}",
                        i, j
                    ));
                    continue;
                }
                graph.connect(NodeId(i), NodeId(j));
            }
        }

        graph
    }
}
