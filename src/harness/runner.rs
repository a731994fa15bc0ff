//! Monte Carlo evaluation loop.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::config::{PredictorConfig, ScenarioConfig};
use crate::dispatch::{
    AdaptivePredictor, OfflinePredictor, PolicyKind, RandomPredictor, StaticTablePredictor,
    greedy_profit, run_policy,
};
use crate::environment::{DailyTrace, TraceGenerator, WeatherSampler};

use super::stats::{EvaluationReport, VariantAccumulator, ratio_is_degenerate};

/// Odd 64-bit constant used to spread trial indices across the seed space.
const TRIAL_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed of trial `trial`'s private RNG stream.
pub fn trial_seed(master_seed: u64, trial: usize) -> u64 {
    master_seed ^ (trial as u64).wrapping_mul(TRIAL_SEED_MIX)
}

/// One simulated day and every variant's profit on it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome {
    pub trial: usize,
    pub trace: DailyTrace,
    /// Indexed by [`PolicyKind::index`].
    pub profits: [f64; 5],
}

impl TrialOutcome {
    pub fn profit(&self, kind: PolicyKind) -> f64 {
        self.profits[kind.index()]
    }
}

/// Runs every dispatch variant against the same sampled day, many times over.
#[derive(Debug, Clone)]
pub struct EvaluationHarness {
    seed: u64,
    capacity_kwh: f64,
    ratio_epsilon: f64,
    sampler: WeatherSampler,
    generator: TraceGenerator,
    static_table: StaticTablePredictor,
    adaptive: AdaptivePredictor,
    random_band: PredictorConfig,
}

impl EvaluationHarness {
    /// Builds the harness from a scenario. The scenario should already have
    /// passed [`ScenarioConfig::validate`].
    pub fn new(cfg: &ScenarioConfig) -> Self {
        let env = cfg.environment();
        let generator = TraceGenerator::new(&env);
        let static_table = StaticTablePredictor::from_tariff(generator.tariff());
        Self {
            seed: cfg.simulation.seed,
            capacity_kwh: cfg.simulation.battery_capacity_kwh,
            ratio_epsilon: cfg.simulation.ratio_epsilon,
            sampler: WeatherSampler,
            adaptive: AdaptivePredictor::new(&env),
            generator,
            static_table,
            random_band: cfg.predictor.clone(),
        }
    }

    /// Runs one trial on its own RNG stream.
    ///
    /// The result depends only on the master seed and `trial`, so trials may
    /// be run in any order.
    pub fn run_trial(&self, trial: usize) -> TrialOutcome {
        let mut rng = StdRng::seed_from_u64(trial_seed(self.seed, trial));
        let weather = self.sampler.sample(&mut rng);
        let trace = self.generator.generate(&weather, &mut rng);
        let mut random = RandomPredictor::from_config(&self.random_band, &mut rng);

        let cap = self.capacity_kwh;
        let mut profits = [0.0; 5];
        profits[PolicyKind::Offline.index()] =
            run_policy(&trace, &mut OfflinePredictor::new(&trace), cap).profit;
        profits[PolicyKind::StaticTable.index()] =
            run_policy(&trace, &mut self.static_table.clone(), cap).profit;
        profits[PolicyKind::Adaptive.index()] =
            run_policy(&trace, &mut self.adaptive.clone(), cap).profit;
        profits[PolicyKind::Random.index()] = run_policy(&trace, &mut random, cap).profit;
        profits[PolicyKind::Greedy.index()] = greedy_profit(&trace);

        debug!(
            trial,
            season = %weather.season,
            offline = profits[0],
            static_table = profits[1],
            adaptive = profits[2],
            random = profits[3],
            greedy = profits[4],
            "trial complete"
        );

        TrialOutcome {
            trial,
            trace,
            profits,
        }
    }

    pub fn run(&self, num_trials: usize) -> EvaluationReport {
        self.run_with(num_trials, |_| {})
    }

    /// Runs `num_trials` trials, handing each outcome to `observe` before it
    /// is folded into the statistics.
    pub fn run_with<F>(&self, num_trials: usize, mut observe: F) -> EvaluationReport
    where
        F: FnMut(&TrialOutcome),
    {
        info!(
            trials = num_trials,
            seed = self.seed,
            capacity_kwh = self.capacity_kwh,
            "starting evaluation"
        );

        let mut accumulators: Vec<VariantAccumulator> =
            PolicyKind::ALL.iter().map(|&k| VariantAccumulator::new(k)).collect();
        let progress_every = (num_trials / 10).max(1);

        for trial in 0..num_trials {
            let outcome = self.run_trial(trial);
            observe(&outcome);

            let offline = outcome.profit(PolicyKind::Offline);
            if ratio_is_degenerate(offline, self.ratio_epsilon) {
                warn!(
                    trial,
                    offline_profit = offline,
                    "offline profit near zero, ratios skipped for this trial"
                );
            }
            for acc in &mut accumulators {
                acc.record(
                    trial,
                    &outcome.trace,
                    offline,
                    outcome.profit(acc.kind()),
                    self.ratio_epsilon,
                );
            }

            if (trial + 1) % progress_every == 0 {
                info!(completed = trial + 1, total = num_trials, "progress");
            }
        }

        let summaries = accumulators.into_iter().map(VariantAccumulator::finish).collect();
        let report = EvaluationReport {
            trials: num_trials,
            seed: self.seed,
            capacity_kwh: self.capacity_kwh,
            summaries,
        };
        info!(ordering = ?report.ordering(), "evaluation finished");
        report
    }
}
