//! Cleaner World Simulation Harness
//!
//! Runs the cleaner world under named scenarios with reproducible seeds,
//! and exports per-tick frames and reporting series for external
//! visualization.
//!
//! # Usage
//!
//! ```ignore
//! use cleaner_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let report = ScenarioRunner::new(42).run(ScenarioId::SingleSpeck);
//! assert!(report.passed);
//! ```

mod exporter;
mod runner;
pub mod scenarios;

pub use exporter::{write_series_csv, EntityPosition, ExportError, SimExport, SimFrame};
pub use runner::{drive, RunReport, ScenarioRunner};
