//! Error types for the cleaner world.

use crate::types::{Coord, EntityId};
use thiserror::Error;

/// Errors surfaced by the grid, the scheduler and model initialization.
///
/// All of these are contract violations. Nothing retries; they propagate to
/// whoever is driving the simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Placement or move target lies outside the grid.
    #[error("Coordinate {coord} is outside the {width}x{height} grid")]
    OutOfBounds {
        coord: Coord,
        width: u32,
        height: u32,
    },

    /// Entity is not tracked by the grid or the scheduler.
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// The requested dirty markers cannot all be placed on empty cells.
    #[error("Cannot place {requested} dirty markers on a grid of {cells} cells")]
    DegenerateInit { requested: u64, cells: u64 },

    /// Configuration rejected before any world is built.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SimError {
    /// Creates an out-of-bounds error.
    pub fn out_of_bounds(coord: Coord, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            coord,
            width,
            height,
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Convenience alias used across the workspace.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimError::out_of_bounds(Coord::new(5, -1), 5, 5);
        assert_eq!(
            err.to_string(),
            "Coordinate (5, -1) is outside the 5x5 grid"
        );

        let err = SimError::DegenerateInit {
            requested: 4,
            cells: 4,
        };
        assert!(err.to_string().contains("4 dirty markers"));
    }
}
