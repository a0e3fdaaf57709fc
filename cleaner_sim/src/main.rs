//! Cleaner World Simulator CLI
//!
//! Run the cleaner world under a scenario preset or a JSON config file.

use clap::Parser;
use cleaner_core::ModelConfig;
use cleaner_env::derive_seed;
use cleaner_sim::scenarios::ScenarioId;
use cleaner_sim::{write_series_csv, RunReport, ScenarioRunner, SimExport};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Cleaner World simulation CLI
#[derive(Parser, Debug)]
#[command(name = "cleaner-sim")]
#[command(about = "Run the cleaner world grid simulation", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of consecutive seeds to run (batch mode)
    #[arg(long, default_value = "1")]
    seeds: u64,

    /// Scenario to run (classic, single_speck, spotless, saturated, crowded, all)
    #[arg(short = 'S', long, default_value = "classic")]
    scenario: String,

    /// Load the model configuration from a JSON file instead of a preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override grid width
    #[arg(long)]
    width: Option<u32>,

    /// Override grid height
    #[arg(long)]
    height: Option<u32>,

    /// Override cleaner count
    #[arg(short, long)]
    agents: Option<u32>,

    /// Override dirty fraction
    #[arg(long)]
    dirty: Option<f64>,

    /// Override tick budget
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Export per-tick frames to a JSON file for visualization
    #[arg(long)]
    export: Option<PathBuf>,

    /// Write the reporting series (movements, clean fraction) as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl Args {
    fn has_overrides(&self) -> bool {
        self.width.is_some()
            || self.height.is_some()
            || self.agents.is_some()
            || self.dirty.is_some()
            || self.ticks.is_some()
    }

    fn apply_overrides(&self, mut config: ModelConfig) -> ModelConfig {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(agents) = self.agents {
            config.agent_count = agents;
        }
        if let Some(dirty) = self.dirty {
            config.dirty_fraction = dirty;
        }
        if let Some(ticks) = self.ticks {
            config.tick_budget = ticks;
        }
        config
    }
}

fn load_config(path: &PathBuf) -> Result<ModelConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("cannot parse {}: {}", path.display(), e))
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    if !args.json {
        info!("Cleaner World Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    // Parse scenarios
    let scenarios: Vec<ScenarioId> = if args.scenario == "all" {
        ScenarioId::all()
    } else {
        match args.scenario.parse() {
            Ok(scenario) => vec![scenario],
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!("Available scenarios: classic, single_speck, spotless, saturated, crowded, all");
                std::process::exit(1);
            }
        }
    };

    // Resolve a custom configuration, if any
    let custom_config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => Some(args.apply_overrides(config)),
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None if args.has_overrides() => {
            let base = scenarios.first().map(ScenarioId::config).unwrap_or_default();
            Some(args.apply_overrides(base))
        }
        None => None,
    };

    if custom_config.is_some() && scenarios.len() > 1 {
        eprintln!("Error: --config and overrides only support a single scenario, not 'all'");
        std::process::exit(1);
    }

    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    } else {
        args.seed
    };

    let exporting = args.export.is_some() || args.csv.is_some();
    if exporting && (scenarios.len() > 1 || args.seeds > 1) {
        eprintln!("Error: --export/--csv only support a single scenario and seed");
        std::process::exit(1);
    }

    let mut all_results: Vec<RunReport> = Vec::new();

    for seed_offset in 0..args.seeds {
        let seed = derive_seed(base_seed, seed_offset);

        let mut runner = ScenarioRunner::new(seed);
        if let Some(config) = &custom_config {
            runner = runner.with_config(config.clone());
        }

        for scenario in &scenarios {
            let mut export = SimExport::new(scenario.name(), seed);
            let result = if exporting {
                runner.run_observed(*scenario, |model| export.capture(model))
            } else {
                runner.run(*scenario)
            };

            if let Some(path) = &args.export {
                export.finalize(&result.series, result.fully_cleaned);
                match export.write_to_file(path) {
                    Ok(()) => info!("Exported {} frames to {}", export.frames.len(), path.display()),
                    Err(e) => error!("Failed to write export: {}", e),
                }
            }
            if let Some(path) = &args.csv {
                match write_series_csv(&result.series, path) {
                    Ok(()) => info!("Wrote {} ticks to {}", result.series.len(), path.display()),
                    Err(e) => error!("Failed to write series: {}", e),
                }
            }

            if !args.json {
                if result.passed {
                    info!("✓ {} (seed={}) PASSED", result.scenario, seed);
                } else {
                    error!(
                        "✗ {} (seed={}) FAILED: {}",
                        result.scenario,
                        seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }

            all_results.push(result);
        }
    }

    // Summary
    let total = all_results.len();
    let failed_count = all_results.iter().filter(|r| !r.passed).count();
    let passed = total - failed_count;

    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to render summary: {}", e),
        }
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if failed_count == 0 {
            info!("✅ All {} runs passed!", total);
        } else {
            error!("❌ {}/{} runs failed!", failed_count, total);

            for result in all_results.iter().filter(|r| !r.passed) {
                error!(
                    "  - {} seed={}: {}",
                    result.scenario,
                    result.seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
}
