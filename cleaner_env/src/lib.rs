//! Cleaner World Environment Layer
//!
//! Shared vocabulary for the simulation crates:
//! - **Types**: entity ids, grid coordinates, entity kinds
//! - **Errors**: the `SimError` taxonomy every layer propagates
//! - **Randomness**: `SimContext`, the single seeded source a run draws from
//!
//! By deriving all entropy from one 64-bit seed, any run can be replayed
//! exactly from its seed number.

mod context;
mod error;
mod types;

pub use context::{derive_seed, SimContext};
pub use error::{SimError, SimResult};
pub use types::{Coord, EntityId, EntityKind};
