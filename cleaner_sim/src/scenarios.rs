//! Named run presets.

use cleaner_core::{ModelConfig, StartCell};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// 25x25 grid, 10 cleaners, 20% dirty, 100 ticks
    Classic,

    /// 5x5 grid, one cleaner, a single dirty cell
    SingleSpeck,

    /// Nothing to clean; cleaners wander until the budget runs out
    Spotless,

    /// 2x2 grid fully dirty; initialization must refuse it
    Saturated,

    /// 10x10 grid, 20 cleaners, half the cells dirty
    Crowded,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Classic,
            ScenarioId::SingleSpeck,
            ScenarioId::Spotless,
            ScenarioId::Saturated,
            ScenarioId::Crowded,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Classic => "classic",
            ScenarioId::SingleSpeck => "single_speck",
            ScenarioId::Spotless => "spotless",
            ScenarioId::Saturated => "saturated",
            ScenarioId::Crowded => "crowded",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Classic => "25x25 grid, 10 cleaners, 20% dirty, 100 ticks",
            ScenarioId::SingleSpeck => "5x5 grid, 1 cleaner, 1 dirty cell, up to 500 ticks",
            ScenarioId::Spotless => "10x10 grid, 5 cleaners, nothing dirty",
            ScenarioId::Saturated => "2x2 grid, every cell dirty: must be rejected at init",
            ScenarioId::Crowded => "10x10 grid, 20 cleaners, 50% dirty, 1000 ticks",
        }
    }

    /// Model configuration for this scenario.
    pub fn config(&self) -> ModelConfig {
        match self {
            ScenarioId::Classic => ModelConfig::default(),
            ScenarioId::SingleSpeck => ModelConfig::new(5, 5, 1, 0.04, 500),
            ScenarioId::Spotless => ModelConfig::new(10, 10, 5, 0.0, 50),
            ScenarioId::Saturated => ModelConfig::new(2, 2, 1, 1.0, 10),
            ScenarioId::Crowded => {
                ModelConfig::new(10, 10, 20, 0.5, 1000).with_start_cell(StartCell::FarCorner)
            }
        }
    }

    /// True if the scenario is expected to fail initialization.
    pub fn expects_rejection(&self) -> bool {
        matches!(self, ScenarioId::Saturated)
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" | "default" => Ok(ScenarioId::Classic),
            "single_speck" | "singlespeck" | "speck" => Ok(ScenarioId::SingleSpeck),
            "spotless" | "clean" => Ok(ScenarioId::Spotless),
            "saturated" => Ok(ScenarioId::Saturated),
            "crowded" => Ok(ScenarioId::Crowded),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
