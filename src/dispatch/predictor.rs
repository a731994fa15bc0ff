//! Next-hour price predictors, one per dispatch variant.
//!
//! Each predictor answers one question per hour: what will the price be in
//! the next hour? The control loop in [`super::policy`] turns the answer into
//! a sell-or-pre-buy decision.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{EnvironmentConfig, PredictorConfig};
use crate::environment::{DailyTrace, DemandBand, Tariff};

/// Source of next-hour price predictions for the dispatch control loop.
pub trait PricePredictor {
    /// Predicts the price of `hour + 1` from what is observable at `hour`.
    ///
    /// # Arguments
    ///
    /// * `hour` - Hour of day of the current record
    /// * `current_demand_kwh` - Realized demand of the current hour
    /// * `people` - Head count of the current hour
    fn predict_next_price(&mut self, hour: usize, current_demand_kwh: f64, people: u32) -> f64;

    /// Whether the battery is topped up on the last hour of the trace when
    /// the prediction does not favour selling.
    fn prebuys_on_final_hour(&self) -> bool {
        true
    }
}

/// Perfect-foresight predictor: reads the actual next price from the trace.
#[derive(Debug, Clone, Copy)]
pub struct OfflinePredictor<'a> {
    trace: &'a DailyTrace,
}

impl<'a> OfflinePredictor<'a> {
    pub fn new(trace: &'a DailyTrace) -> Self {
        Self { trace }
    }
}

impl PricePredictor for OfflinePredictor<'_> {
    fn predict_next_price(&mut self, hour: usize, _current_demand_kwh: f64, _people: u32) -> f64 {
        self.trace.price_at(hour + 1).unwrap_or(0.0)
    }
}

/// Looks the next hour up in a fixed hour-of-day price table.
#[derive(Debug, Clone)]
pub struct StaticTablePredictor {
    table: Vec<f64>,
}

impl StaticTablePredictor {
    /// Wraps an arbitrary table; hours past its end predict 0.
    pub fn new(table: Vec<f64>) -> Self {
        Self { table }
    }

    /// Uses the tariff's tier prices, with 0 at hour 24.
    pub fn from_tariff(tariff: &Tariff) -> Self {
        Self::new(tariff.price_table().to_vec())
    }

    pub fn table(&self) -> &[f64] {
        &self.table
    }
}

impl PricePredictor for StaticTablePredictor {
    fn predict_next_price(&mut self, hour: usize, _current_demand_kwh: f64, _people: u32) -> f64 {
        self.table.get(hour + 1).copied().unwrap_or(0.0)
    }
}

/// Noise-free model of the environment driven by the current head count.
///
/// Infers the day's attendance from how many people are present now, then
/// projects the next hour's head count, demand, and price using the same
/// parameters the trace generator draws from.
#[derive(Debug, Clone)]
pub struct AdaptivePredictor {
    env: EnvironmentConfig,
    tariff: Tariff,
}

impl AdaptivePredictor {
    pub fn new(env: &EnvironmentConfig) -> Self {
        Self {
            env: env.clone(),
            tariff: Tariff::from_config(&env.price),
        }
    }

    /// Estimated total attendance given `people` present at `hour`.
    ///
    /// Inverts the band's expected present fraction and caps the result at
    /// the employee count. Night hours carry no signal, so the prior
    /// expectation is used.
    pub fn estimate_attendance(&self, hour: usize, people: u32) -> f64 {
        let w = &self.env.workforce;
        let present = f64::from(people);
        let fraction = match DemandBand::at(hour) {
            DemandBand::Core => 1.0,
            DemandBand::RampUp => w.prob_early * (hour as f64 - 6.0),
            DemandBand::RampDown => w.prob_stay_late * (20.0 - hour as f64),
            DemandBand::Night => 0.0,
        };
        let estimate = if fraction > 0.0 {
            present / fraction
        } else {
            w.expected_attendance()
        };
        estimate.min(f64::from(w.employees))
    }

    /// Expected head count at `next_hour` given the current count and the
    /// attendance estimate.
    pub fn expected_people(&self, next_hour: usize, people: f64, attendance: f64) -> f64 {
        let w = &self.env.workforce;
        match DemandBand::at(next_hour) {
            DemandBand::Night => 0.0,
            DemandBand::Core => attendance,
            DemandBand::RampUp => people.max(attendance * w.prob_early * (next_hour as f64 - 6.0)),
            DemandBand::RampDown => {
                people.min(attendance * w.prob_stay_late * (20.0 - next_hour as f64))
            }
        }
    }

    /// Expected demand at `next_hour` given the current and projected head counts.
    pub fn expected_demand_kwh(&self, next_hour: usize, people: f64, next_people: f64) -> f64 {
        let w = &self.env.workforce;
        let d = &self.env.demand;
        let c = w.consumption_per_employee_kwh;
        match DemandBand::at(next_hour) {
            DemandBand::Night => d.low_avg_kwh,
            DemandBand::RampUp | DemandBand::Core => d.high_no_people_avg_kwh + next_people * c,
            DemandBand::RampDown => {
                let leaving = (people - next_people).max(0.0);
                d.high_no_people_avg_kwh
                    + next_people * c
                    + w.departure_overlap * leaving * c
            }
        }
    }
}

impl PricePredictor for AdaptivePredictor {
    fn predict_next_price(&mut self, hour: usize, current_demand_kwh: f64, people: u32) -> f64 {
        let next_hour = hour + 1;
        let present = f64::from(people);
        let attendance = self.estimate_attendance(hour, people);
        let next_people = self.expected_people(next_hour, present, attendance);
        let demand = self.expected_demand_kwh(next_hour, present, next_people);
        self.tariff.price(next_hour, demand, current_demand_kwh)
    }

    fn prebuys_on_final_hour(&self) -> bool {
        false
    }
}

/// Uninformed baseline: predicts a uniform draw from a fixed price band.
#[derive(Debug, Clone)]
pub struct RandomPredictor {
    min: f64,
    max: f64,
    rng: StdRng,
}

impl RandomPredictor {
    /// Creates a predictor drawing from `[min, max)` with its own stream.
    ///
    /// An empty or inverted band always predicts `min`.
    pub fn new(min: f64, max: f64, rng: StdRng) -> Self {
        Self { min, max, rng }
    }

    /// Forks a dedicated stream off `rng` so later draws from `rng` are
    /// unaffected by how many predictions are made.
    pub fn from_config<R: Rng>(cfg: &PredictorConfig, rng: &mut R) -> Self {
        Self::new(cfg.random_min, cfg.random_max, StdRng::seed_from_u64(rng.random()))
    }
}

impl PricePredictor for RandomPredictor {
    fn predict_next_price(&mut self, _hour: usize, _current_demand_kwh: f64, _people: u32) -> f64 {
        if self.max > self.min {
            self.rng.random_range(self.min..self.max)
        } else {
            self.min
        }
    }

    fn prebuys_on_final_hour(&self) -> bool {
        false
    }
}
