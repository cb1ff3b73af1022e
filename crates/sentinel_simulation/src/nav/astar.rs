//! A* pathfinder на waypoint-графе.
//!
//! Состояние поиска (gCost/hCost/parent/closed) живёт в per-call
//! scratch arena, индексируемой NodeId — каждая search начинается с
//! чистого листа, утечка состояния между вызовами невозможна.
//!
//! Open set — плоский Vec с линейным сканом минимума: граф маленький
//! (десятки нод), O(V²) приемлем, binary heap не окупается.

use super::graph::{NavGraph, NodeId};

/// Scratch-запись поиска для одной ноды
#[derive(Clone, Copy)]
struct SearchRecord {
    g: f32,
    h: f32,
    parent: Option<NodeId>,
    closed: bool,
}

impl SearchRecord {
    fn f(&self) -> f32 {
        self.g + self.h
    }
}

impl Default for SearchRecord {
    fn default() -> Self {
        Self {
            g: f32::INFINITY,
            h: f32::INFINITY,
            parent: None,
            closed: false,
        }
    }
}

/// Кратчайший путь start → goal (обе ноды включительно).
///
/// Пустой Vec — "пути нет": goal недостижим, id вне графа или граф
/// пуст. Это caller-visible сигнал, не ошибка.
///
/// Cost и heuristic — Euclidean distance (admissible + consistent,
/// закрытые ноды не переоткрываются). Tie-break: min fCost, затем
/// min hCost, затем порядок вставки в open set — детерминированно
/// при идентичных входах.
pub fn find_path(graph: &NavGraph, start: NodeId, goal: NodeId) -> Vec<NodeId> {
    let node_count = graph.len();

    let (Some(start_pos), Some(goal_pos)) = (graph.position(start), graph.position(goal)) else {
        crate::logger::log_warning("A*: start или goal нода вне графа");
        return Vec::new();
    };

    if start == goal {
        return vec![start];
    }

    let mut records = vec![SearchRecord::default(); node_count];
    let mut open: Vec<NodeId> = Vec::new();

    records[start.0].g = 0.0;
    records[start.0].h = start_pos.distance(goal_pos);
    open.push(start);

    while !open.is_empty() {
        // Линейный выбор: min fCost, при равенстве min hCost,
        // при полном равенстве — раньше вставленная нода
        let mut best = 0;
        for i in 1..open.len() {
            let candidate = &records[open[i].0];
            let current_best = &records[open[best].0];
            if candidate.f() < current_best.f()
                || (candidate.f() == current_best.f() && candidate.h < current_best.h)
            {
                best = i;
            }
        }

        // remove (не swap_remove): сохраняем порядок вставки для tie-break
        let current = open.remove(best);
        records[current.0].closed = true;

        if current == goal {
            return retrace(&records, start, goal);
        }

        let Some(node) = graph.node(current) else {
            continue;
        };
        let current_g = records[current.0].g;

        for &neighbor in &node.neighbors {
            if neighbor.0 >= node_count || records[neighbor.0].closed {
                continue;
            }
            let Some(neighbor_pos) = graph.position(neighbor) else {
                continue;
            };

            let tentative = current_g + node.position.distance(neighbor_pos);
            if tentative < records[neighbor.0].g {
                records[neighbor.0].g = tentative;
                records[neighbor.0].h = neighbor_pos.distance(goal_pos);
                records[neighbor.0].parent = Some(current);

                if !open.contains(&neighbor) {
                    open.push(neighbor);
                }
            }
        }
    }

    crate::logger::log_warning(&format!("A*: путь {:?} → {:?} не найден", start, goal));
    Vec::new()
}

/// Восстанавливает путь по parent-цепочке от goal к start и разворачивает
fn retrace(records: &[SearchRecord], start: NodeId, goal: NodeId) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = goal;

    while current != start {
        path.push(current);
        match records[current.0].parent {
            Some(parent) => current = parent,
            None => break,
        }
    }

    path.push(start);
    path.reverse();
    path
}
