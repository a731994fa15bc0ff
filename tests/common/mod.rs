//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use rand::SeedableRng;
use rand::rngs::StdRng;

use arbitrage_sim::config::{EnvironmentConfig, ScenarioConfig};
use arbitrage_sim::environment::{
    DailyTrace, HourRecord, Season, TraceGenerator, WeatherProfile, WeatherSampler,
};

/// Battery capacity used by the hand-built regression traces (kWh).
pub const SMALL_CAPACITY_KWH: f64 = 100.0;

/// Clear spring day, sunrise 6, sunset 19.
pub fn default_weather() -> WeatherProfile {
    WeatherProfile::new(Season::Spring, 0.0, 70.0, 50.0, 6, 19)
}

/// Builds a trace from `(demand_kwh, solar_kwh, price)` rows with nobody present.
pub fn trace_from(rows: &[(f64, f64, f64)]) -> DailyTrace {
    let records = rows
        .iter()
        .enumerate()
        .map(|(hour, &(demand_kwh, solar_kwh, price))| HourRecord {
            hour,
            demand_kwh,
            attendance: 0,
            solar_kwh,
            price,
        })
        .collect();
    DailyTrace::new(default_weather(), records).expect("fixture trace should be valid")
}

/// Baseline environment (100 employees, default tariff).
pub fn baseline_environment() -> EnvironmentConfig {
    ScenarioConfig::baseline().environment()
}

/// Baseline scenario with a small trial count and the given seed.
pub fn small_scenario(trials: usize, seed: u64) -> ScenarioConfig {
    let mut cfg = ScenarioConfig::baseline();
    cfg.simulation.trials = trials;
    cfg.simulation.seed = seed;
    cfg
}

/// `n` generated days drawn from one seeded stream.
pub fn generated_traces(n: usize, seed: u64) -> Vec<DailyTrace> {
    let generator = TraceGenerator::new(&baseline_environment());
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let weather = WeatherSampler.sample(&mut rng);
            generator.generate(&weather, &mut rng)
        })
        .collect()
}

/// Unique path in the system temp directory for file-output tests.
pub fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("arbitrage-sim-{}-{name}", std::process::id()))
}
