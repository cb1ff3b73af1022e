//! AI systems (FSM transitions, movement, sensor intake, lifecycle)

pub mod fsm;
pub mod lifecycle;
pub mod movement;
pub mod sensor;

// Re-export all systems
pub use fsm::*;
pub use lifecycle::*;
pub use movement::*;
pub use sensor::*;
