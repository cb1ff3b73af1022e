//! Line-of-sight предикат + выбор vantage-нод.
//!
//! Core сам obstruction-геометрию не считает: host-слой инжектит
//! isVisible(from, to) (raycast по геометрии уровня), мы только
//! вызываем. Default — без препятствий, тесты подставляют свои стены.

use bevy::prelude::*;

use crate::nav::{NavGraph, NodeId};

/// Injected LOS предикат (внешний collaborator)
#[derive(Resource)]
pub struct LineOfSight {
    predicate: Box<dyn Fn(Vec3, Vec3) -> bool + Send + Sync>,
}

impl Default for LineOfSight {
    fn default() -> Self {
        Self::new(|_, _| true)
    }
}

impl LineOfSight {
    pub fn new(predicate: impl Fn(Vec3, Vec3) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
        }
    }

    pub fn is_visible(&self, from: Vec3, to: Vec3) -> bool {
        (self.predicate)(from, to)
    }
}

/// Vantage-нода: ближайшая к target нода, из которой target виден.
///
/// None — ни одна нода не видит target (или граф пуст); caller
/// откатывается на nearest_node. Tie-break как у nearest_node:
/// строгое `<`, при равенстве меньший id.
pub fn vantage_node(graph: &NavGraph, los: &LineOfSight, target: Vec3) -> Option<NodeId> {
    let mut best: Option<(NodeId, f32)> = None;

    for (id, node) in graph.iter() {
        if !los.is_visible(node.position, target) {
            continue;
        }
        let dist = node.position.distance(target);
        match best {
            Some((_, d)) if dist >= d => {}
            _ => best = Some((id, dist)),
        }
    }

    best.map(|(id, _)| id)
}
