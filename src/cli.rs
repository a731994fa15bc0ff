//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, ScenarioConfig};

#[derive(Debug, Parser)]
#[command(name = "arbitrage-sim")]
#[command(
    version,
    about = "Monte Carlo evaluation of battery energy-arbitrage policies"
)]
#[command(
    long_about = "Samples many synthetic days of building demand, solar generation and spot price,\n\
    runs every dispatch variant against each day, and reports profits and ratios\n\
    to the perfect-foresight offline policy.\n\
    \nExamples:\n  \
    arbitrage-sim --trials 10000\n  \
    arbitrage-sim --preset small_battery --seed 7\n  \
    arbitrage-sim --scenario office.toml --worst-trace-out worst.csv"
)]
pub struct CliArgs {
    /// Load the scenario from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Built-in preset (baseline, small_battery, large_battery, cloudy_winter)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Override the number of simulated days
    #[arg(long)]
    pub trials: Option<usize>,

    /// Override the master random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the battery capacity in kWh
    #[arg(long, value_name = "KWH")]
    pub capacity: Option<f64>,

    /// Write the static-table variant's worst-case day as CSV
    #[arg(long, value_name = "PATH")]
    pub worst_trace_out: Option<PathBuf>,

    /// Write one CSV row of profits per trial
    #[arg(long, value_name = "PATH")]
    pub trials_out: Option<PathBuf>,
}

impl CliArgs {
    /// Resolves the scenario source: `--scenario`, then `--preset`, then
    /// the baseline preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or parsed, or the
    /// preset name is unknown.
    pub fn load_scenario(&self) -> Result<ScenarioConfig, ConfigError> {
        if let Some(path) = &self.scenario {
            ScenarioConfig::from_toml_file(path)
        } else if let Some(name) = &self.preset {
            ScenarioConfig::from_preset(name)
        } else {
            Ok(ScenarioConfig::baseline())
        }
    }

    /// Applies `--trials`, `--seed`, and `--capacity` on top of `cfg`.
    pub fn apply_overrides(&self, cfg: &mut ScenarioConfig) {
        if let Some(trials) = self.trials {
            cfg.simulation.trials = trials;
        }
        if let Some(seed) = self.seed {
            cfg.simulation.seed = seed;
        }
        if let Some(capacity) = self.capacity {
            cfg.simulation.battery_capacity_kwh = capacity;
        }
    }
}
