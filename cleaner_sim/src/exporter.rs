//! JSON/CSV exporter for external visualization.
//!
//! Captures the world after every tick as a list of entity positions so a
//! renderer can draw markers and cleaners without linking the simulation.

use cleaner_core::{DataCollector, EntityKind, SimulationModel, TickRecord};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors raised while writing exports.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A single frame of simulation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimFrame {
    /// Ticks completed when the frame was taken
    pub tick: u64,

    /// Dirty markers left
    pub dirty_cells: u64,

    /// Every live entity
    pub entities: Vec<EntityPosition>,
}

/// Position of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPosition {
    pub id: u64,
    pub kind: EntityKind,
    pub x: i64,
    pub y: i64,
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Grid dimensions
    pub width: u32,
    pub height: u32,

    /// All frames
    pub frames: Vec<SimFrame>,

    /// Reporting series (agent movements, clean fraction per tick)
    pub series: Vec<TickRecord>,

    /// Whether the run cleaned everything
    pub fully_cleaned: bool,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            width: 0,
            height: 0,
            frames: Vec::new(),
            series: Vec::new(),
            fully_cleaned: false,
        }
    }

    /// Captures the current state of `model` as a frame.
    pub fn capture(&mut self, model: &SimulationModel) {
        self.width = model.config().width;
        self.height = model.config().height;

        let entities = model
            .entities()
            .map(|view| EntityPosition {
                id: view.id.as_u64(),
                kind: view.kind,
                x: view.coord.x,
                y: view.coord.y,
            })
            .collect();

        self.frames.push(SimFrame {
            tick: model.tick(),
            dirty_cells: model.dirty_cells(),
            entities,
        });
    }

    /// Finalizes the export with the run's reporting series.
    pub fn finalize(&mut self, series: &[TickRecord], fully_cleaned: bool) {
        self.series = series.to_vec();
        self.fully_cleaned = fully_cleaned;
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

/// Writes the reporting series as CSV.
pub fn write_series_csv(series: &[TickRecord], path: impl AsRef<Path>) -> Result<(), ExportError> {
    let mut collector = DataCollector::new();
    for record in series {
        collector.collect(record.agent_movements, record.clean_fraction);
    }
    let mut file = File::create(path)?;
    file.write_all(collector.to_csv().as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleaner_core::{Coord, ModelConfig};

    #[test]
    fn test_capture_frames() {
        let config = ModelConfig::new(3, 3, 1, 0.0, 5);
        let mut model = SimulationModel::from_layout(config, 4, &[Coord::new(0, 0)]).unwrap();
        let mut export = SimExport::new("test", 4);

        export.capture(&model);
        model.step().unwrap();
        export.capture(&model);

        assert_eq!(export.frames.len(), 2);
        assert_eq!(export.width, 3);
        assert_eq!(export.frames[0].tick, 0);
        assert_eq!(export.frames[0].entities.len(), 2);
        assert_eq!(
            export.frames[0].entities[0],
            EntityPosition {
                id: 0,
                kind: EntityKind::DirtyMarker,
                x: 0,
                y: 0
            }
        );
        assert_eq!(export.frames[1].tick, 1);
    }

    #[test]
    fn test_write_and_read_back() {
        let config = ModelConfig::new(4, 4, 2, 0.25, 5);
        let mut model = SimulationModel::new(config, 8).unwrap();
        let mut export = SimExport::new("roundtrip", 8);
        export.capture(&model);
        model.step().unwrap();
        export.finalize(model.collector().records(), model.dirty_cells() == 0);

        let path = std::env::temp_dir().join(format!("cleaner_export_{}.json", std::process::id()));
        export.write_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: SimExport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.frames.len(), 1);
        assert_eq!(parsed.series.len(), 1);
        assert!(text.contains("\"cleaner\""));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_series_csv() {
        let mut collector = DataCollector::new();
        collector.collect(0, 0.75);
        collector.collect(1, 1.0);

        let path = std::env::temp_dir().join(format!("cleaner_series_{}.csv", std::process::id()));
        write_series_csv(collector.records(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("tick,agent_movements,clean_fraction"));

        let _ = std::fs::remove_file(&path);
    }
}
