//! Per-tick reporting.
//!
//! The model records one `TickRecord` at the start of every `step()`. The
//! collector is an in-memory table that external presentation code (plots,
//! dashboards) reads after the run.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Reporting snapshot for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    /// Tick index, starting at 0
    pub tick: u64,

    /// Cumulative cleaner moves at the start of the tick
    pub agent_movements: u64,

    /// Fraction of cells without a dirty marker, in [0, 1]
    pub clean_fraction: f64,
}

/// Time series of tick records, keyed by tick index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataCollector {
    records: Vec<TickRecord>,
}

impl DataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the record for the next tick.
    pub fn collect(&mut self, agent_movements: u64, clean_fraction: f64) {
        let tick = self.records.len() as u64;
        self.records.push(TickRecord {
            tick,
            agent_movements,
            clean_fraction,
        });
    }

    pub fn records(&self) -> &[TickRecord] {
        &self.records
    }

    /// Record for a given tick.
    pub fn get(&self, tick: u64) -> Option<&TickRecord> {
        usize::try_from(tick).ok().and_then(|i| self.records.get(i))
    }

    pub fn latest(&self) -> Option<&TickRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The series as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records)
    }

    /// The series as CSV with a header row.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("tick,agent_movements,clean_fraction\n");
        for r in &self.records {
            // Writing to a String cannot fail
            let _ = writeln!(out, "{},{},{}", r.tick, r.agent_movements, r.clean_fraction);
        }
        out
    }
}
