//! Model configuration.

use cleaner_env::{Coord, SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Where the cleaners are stacked at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartCell {
    /// `(W-1, W-1)`: the width is used for both axes. Out of bounds when the
    /// grid is wider than it is tall.
    #[default]
    Mirrored,

    /// `(W-1, H-1)`, the far corner of the grid.
    FarCorner,
}

impl StartCell {
    /// Resolves the start cell for a `width` x `height` grid.
    pub fn resolve(&self, width: u32, height: u32) -> Coord {
        let last_x = i64::from(width) - 1;
        match self {
            StartCell::Mirrored => Coord::new(last_x, last_x),
            StartCell::FarCorner => Coord::new(last_x, i64::from(height) - 1),
        }
    }
}

/// Configuration for a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Grid width (cells along x)
    pub width: u32,

    /// Grid height (cells along y)
    pub height: u32,

    /// Number of cleaner agents
    pub agent_count: u32,

    /// Fraction of cells seeded with a dirty marker, in [0, 1]
    pub dirty_fraction: f64,

    /// Tick budget the driver should respect
    pub tick_budget: u64,

    /// Initial cleaner placement rule
    pub start_cell: StartCell,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            width: 25,
            height: 25,
            agent_count: 10,
            dirty_fraction: 0.2,
            tick_budget: 100,
            start_cell: StartCell::Mirrored,
        }
    }
}

impl ModelConfig {
    /// Creates a config from the positional construction parameters.
    pub fn new(
        width: u32,
        height: u32,
        agent_count: u32,
        dirty_fraction: f64,
        tick_budget: u64,
    ) -> Self {
        Self {
            width,
            height,
            agent_count,
            dirty_fraction,
            tick_budget,
            start_cell: StartCell::default(),
        }
    }

    /// Sets the start cell rule.
    pub fn with_start_cell(mut self, start_cell: StartCell) -> Self {
        self.start_cell = start_cell;
        self
    }

    /// Total number of cells, `W * H`.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Number of dirty markers to seed: `floor(W * H * dirty_fraction)`.
    pub fn dirty_count(&self) -> u64 {
        (self.cell_count() as f64 * self.dirty_fraction).floor() as u64
    }

    /// Rejects configurations no world can be built from.
    pub fn validate(&self) -> SimResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::invalid_config(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.dirty_fraction.is_finite() || !(0.0..=1.0).contains(&self.dirty_fraction) {
            return Err(SimError::invalid_config(format!(
                "dirty_fraction must be within [0, 1], got {}",
                self.dirty_fraction
            )));
        }
        Ok(())
    }
}
