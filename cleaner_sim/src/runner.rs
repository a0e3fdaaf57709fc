//! Scenario runner - builds a model and drives it to completion.

use crate::scenarios::ScenarioId;

use cleaner_core::{ModelConfig, SimError, SimResult, SimulationModel, TickRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Scenario name (or "custom" for a loaded config)
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Whether the run ended the way the scenario expects
    pub passed: bool,

    /// Whether every dirty marker was removed
    pub fully_cleaned: bool,

    /// Ticks executed
    pub total_ticks: u64,

    /// Dirty markers at initialization
    pub initial_dirty: u64,

    /// Dirty markers left at the end
    pub dirty_remaining: u64,

    /// Cumulative cleaner moves
    pub total_agent_movements: u64,

    /// Clean fraction at the last refresh
    pub final_clean_fraction: f64,

    /// Failure message if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    /// Per-tick reporting series
    #[serde(skip)]
    pub series: Vec<TickRecord>,
}

impl RunReport {
    fn rejected(scenario: &str, seed: u64, err: &SimError, expected: bool) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            passed: expected,
            fully_cleaned: false,
            total_ticks: 0,
            initial_dirty: 0,
            dirty_remaining: 0,
            total_agent_movements: 0,
            final_clean_fraction: 0.0,
            failure_reason: if expected { None } else { Some(err.to_string()) },
            series: Vec::new(),
        }
    }
}

/// Runs scenarios under a fixed seed.
pub struct ScenarioRunner {
    /// Seed for every model this runner builds
    seed: u64,

    /// Replaces the scenario's own configuration when set
    config_override: Option<ModelConfig>,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            config_override: None,
        }
    }

    /// Uses `config` instead of the scenario presets.
    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config_override = Some(config);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> RunReport {
        self.run_observed(scenario, |_| {})
    }

    /// Runs a scenario, calling `observe` after initialization and after
    /// every tick so presentation code can sample the world.
    pub fn run_observed<F>(&self, scenario: ScenarioId, observe: F) -> RunReport
    where
        F: FnMut(&SimulationModel),
    {
        let (name, config) = match &self.config_override {
            Some(config) => ("custom", config.clone()),
            None => (scenario.name(), scenario.config()),
        };
        let expects_rejection = self.config_override.is_none() && scenario.expects_rejection();

        info!("Starting scenario: {} (seed={})", name, self.seed);
        debug!("  {:?}", config);

        let model = match SimulationModel::new(config, self.seed) {
            Ok(model) => model,
            Err(err) => {
                let expected = expects_rejection && matches!(err, SimError::DegenerateInit { .. });
                if expected {
                    info!("  Initialization rejected as expected: {}", err);
                } else {
                    warn!("  Initialization failed: {}", err);
                }
                return RunReport::rejected(name, self.seed, &err, expected);
            }
        };

        if expects_rejection {
            let mut report = self.finish(name, model, observe);
            report.passed = false;
            report.failure_reason = Some("initialization should have been rejected".to_string());
            return report;
        }

        self.finish(name, model, observe)
    }

    fn finish<F>(&self, name: &str, mut model: SimulationModel, mut observe: F) -> RunReport
    where
        F: FnMut(&SimulationModel),
    {
        let initial_dirty = model.dirty_cells();
        observe(&model);

        let outcome = drive(&mut model, &mut observe);
        let budget_exhausted = model.running() && model.tick() >= model.config().tick_budget;
        if budget_exhausted {
            warn!(
                "  Tick budget of {} exhausted with {} dirty cells left",
                model.config().tick_budget,
                model.dirty_cells()
            );
        }

        info!(
            "  {} ticks | {} cleaned | {} left | {} moves | clean={:.3}",
            model.tick(),
            initial_dirty - model.dirty_cells(),
            model.dirty_cells(),
            model.total_agent_movements(),
            model.clean_fraction()
        );

        RunReport {
            scenario: name.to_string(),
            seed: self.seed,
            passed: outcome.is_ok(),
            fully_cleaned: model.dirty_cells() == 0,
            total_ticks: model.tick(),
            initial_dirty,
            dirty_remaining: model.dirty_cells(),
            total_agent_movements: model.total_agent_movements(),
            final_clean_fraction: model.clean_fraction(),
            failure_reason: outcome.err().map(|e| e.to_string()),
            series: model.collector().records().to_vec(),
        }
    }
}

/// Steps the model until it is clean or out of ticks.
///
/// `running()` is refreshed at the start of each step, so the tick after the
/// last marker is cleaned still executes before the loop sees `false`.
pub fn drive<F>(model: &mut SimulationModel, observe: &mut F) -> SimResult<()>
where
    F: FnMut(&SimulationModel),
{
    while !model.is_finished() {
        model.step()?;
        observe(&*model);

        if model.tick() % 100 == 0 {
            debug!(
                "  tick={} | dirty={} | moves={}",
                model.tick(),
                model.dirty_cells(),
                model.total_agent_movements()
            );
        }
    }
    Ok(())
}
