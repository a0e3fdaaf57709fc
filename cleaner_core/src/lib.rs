//! Cleaner World Core - stepped grid simulation of cleaning agents.
//!
//! Cleaner agents wander a bounded grid and remove dirty markers until none
//! remain:
//! 1. **Grid**: multi-occupancy lattice with 4-connected neighbourhoods
//! 2. **Scheduler**: fresh random activation order every tick
//! 3. **Model**: initialization, `step()`, counters and per-tick reporting

pub mod config;
pub mod entity;
pub mod grid;
pub mod metrics;
pub mod model;
pub mod scheduler;

// Re-export key types for convenience
pub use config::{ModelConfig, StartCell};
pub use entity::{Activation, Behavior, CleanerAgent, DirtyMarker, Entity, WorldView};
pub use grid::Grid;
pub use metrics::{DataCollector, TickRecord};
pub use model::{EntityView, SimulationModel, TickOutcome};
pub use scheduler::Scheduler;

pub use cleaner_env::{Coord, EntityId, EntityKind, SimError, SimResult};
