//! Навигация: статический waypoint-граф + A* pathfinder.

pub mod astar;
pub mod graph;

pub use astar::find_path;
pub use graph::{NavGraph, NavGraphData, NavNode, NavNodeData, NodeId};
