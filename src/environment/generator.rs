//! Stochastic daily trace generation: attendance, demand, price, and solar.

use rand::Rng;

use crate::config::EnvironmentConfig;

use super::tariff::{HOURS_IN_DAY, Tariff};
use super::trace::{DailyTrace, HourRecord};
use super::types::{binomial, normal};
use super::weather::WeatherProfile;

/// Time-of-day demand band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemandBand {
    /// 20:00–07:00, nobody present.
    Night,
    /// 07:00–09:00, employees arriving.
    RampUp,
    /// 09:00–17:00, every attendee present.
    Core,
    /// 17:00–20:00, employees leaving.
    RampDown,
}

impl DemandBand {
    pub fn at(hour: usize) -> Self {
        match hour {
            7..9 => DemandBand::RampUp,
            9..17 => DemandBand::Core,
            17..20 => DemandBand::RampDown,
            _ => DemandBand::Night,
        }
    }
}

/// Generates [`DailyTrace`]s from a weather profile and an explicit RNG.
///
/// Hours are produced strictly in order: demand at hour `t` depends on the
/// head count realized at `t - 1`, and price depends on the demand delta.
#[derive(Debug, Clone)]
pub struct TraceGenerator {
    env: EnvironmentConfig,
    tariff: Tariff,
}

impl TraceGenerator {
    pub fn new(env: &EnvironmentConfig) -> Self {
        Self {
            env: env.clone(),
            tariff: Tariff::from_config(&env.price),
        }
    }

    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    /// Generates the 24 hourly records of one day.
    pub fn generate<R: Rng>(&self, weather: &WeatherProfile, rng: &mut R) -> DailyTrace {
        let w = &self.env.workforce;
        let attendance = binomial(rng, w.employees, w.prob_attend);

        let mut records = Vec::with_capacity(HOURS_IN_DAY);
        let mut present = 0_u32;
        let mut prev_demand_kwh = 0.0;

        for hour in 0..HOURS_IN_DAY {
            let (demand_kwh, now_present) = self.demand(hour, attendance, present, rng);
            let price = self.price(hour, demand_kwh, prev_demand_kwh, rng);
            let solar_kwh = self.solar(hour, weather, rng);

            records.push(HourRecord {
                hour,
                demand_kwh,
                attendance: now_present,
                solar_kwh,
                price,
            });

            present = now_present;
            prev_demand_kwh = demand_kwh;
        }

        DailyTrace::from_generated(*weather, records)
    }

    /// Draws demand for `hour` and returns it with the realized head count.
    ///
    /// Ramp bands never reverse direction: arrivals can only raise the count
    /// carried in from the previous hour, departures can only lower it.
    fn demand<R: Rng>(
        &self,
        hour: usize,
        attendance: u32,
        prev_present: u32,
        rng: &mut R,
    ) -> (f64, u32) {
        let w = &self.env.workforce;
        let d = &self.env.demand;

        let (demand_kwh, present) = match DemandBand::at(hour) {
            DemandBand::Night => (normal(rng, d.low_avg_kwh, d.low_variance.sqrt()), 0),
            DemandBand::Core => (self.occupied_demand(attendance, rng), attendance),
            DemandBand::RampUp => {
                let p = w.prob_early * (hour as f64 - 6.0);
                let present = binomial(rng, attendance, p).max(prev_present);
                let arrived = f64::from(present - prev_present);
                let kwh = self.occupied_demand(prev_present, rng)
                    + self.incremental_demand(arrived, rng);
                (kwh, present)
            }
            DemandBand::RampDown => {
                let p = w.prob_stay_late * (20.0 - hour as f64);
                let present = binomial(rng, attendance, p).min(prev_present);
                let left = f64::from(prev_present - present);
                let kwh = self.occupied_demand(present, rng)
                    + self.incremental_demand(left * w.departure_overlap, rng);
                (kwh, present)
            }
        };

        (demand_kwh.max(0.0), present)
    }

    /// Daytime demand with `people` present for the whole hour.
    fn occupied_demand<R: Rng>(&self, people: u32, rng: &mut R) -> f64 {
        let w = &self.env.workforce;
        let d = &self.env.demand;
        let n = f64::from(people);
        normal(
            rng,
            d.high_no_people_avg_kwh + n * w.consumption_per_employee_kwh,
            (d.high_no_people_variance + n * w.employee_variance).sqrt(),
        )
    }

    /// Extra demand from `people` (possibly fractional person-hours) changing mid-hour.
    fn incremental_demand<R: Rng>(&self, people: f64, rng: &mut R) -> f64 {
        if people <= 0.0 {
            return 0.0;
        }
        let w = &self.env.workforce;
        normal(
            rng,
            people * w.consumption_per_employee_kwh,
            (people * w.employee_variance).sqrt(),
        )
    }

    fn price<R: Rng>(&self, hour: usize, demand_kwh: f64, prev_demand_kwh: f64, rng: &mut R) -> f64 {
        let expected = self.tariff.price(hour, demand_kwh, prev_demand_kwh);
        normal(rng, expected, self.env.price.noise_std).max(0.0)
    }

    fn solar<R: Rng>(&self, hour: usize, weather: &WeatherProfile, rng: &mut R) -> f64 {
        let Some(progress) = weather.day_progress(hour) else {
            return 0.0;
        };
        let s = &self.env.solar;

        let cloud_effect = 1.0 - weather.cloud_cover * s.cloud_cover_multiplier;

        // Diurnal curve: low at sunrise and sunset, high mid-window.
        let (hi, lo) = (weather.high_temp_f, weather.low_temp_f);
        let mean_temp = (-(hi - lo) * (2.0 * std::f64::consts::PI * progress).cos() + hi + lo) / 2.0;
        let temp = normal(rng, mean_temp, s.temp_std_f);
        let temp_effect = 1.0 - (temp - s.temp_threshold_f).max(0.0) * s.temp_multiplier;

        let scale = cloud_effect * temp_effect;
        let mean = s.avg_generation_kwh * (std::f64::consts::PI * progress).sin() * scale;
        normal(rng, mean, s.noise_std * scale).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;
    use crate::environment::weather::{Season, WeatherSampler};
    use rand::{SeedableRng, rngs::StdRng};

    fn generator() -> TraceGenerator {
        TraceGenerator::new(&ScenarioConfig::baseline().environment())
    }

    fn clear_summer() -> WeatherProfile {
        WeatherProfile::new(Season::Summer, 0.0, 75.0, 60.0, 6, 20)
    }

    #[test]
    fn bands_partition_the_day() {
        assert_eq!(DemandBand::at(0), DemandBand::Night);
        assert_eq!(DemandBand::at(6), DemandBand::Night);
        assert_eq!(DemandBand::at(7), DemandBand::RampUp);
        assert_eq!(DemandBand::at(8), DemandBand::RampUp);
        assert_eq!(DemandBand::at(9), DemandBand::Core);
        assert_eq!(DemandBand::at(16), DemandBand::Core);
        assert_eq!(DemandBand::at(17), DemandBand::RampDown);
        assert_eq!(DemandBand::at(19), DemandBand::RampDown);
        assert_eq!(DemandBand::at(20), DemandBand::Night);
        assert_eq!(DemandBand::at(24), DemandBand::Night);
    }

    #[test]
    fn trace_has_24_ordered_non_negative_records() {
        let traces = generator();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let weather = WeatherSampler.sample(&mut rng);
            let trace = traces.generate(&weather, &mut rng);
            assert_eq!(trace.len(), HOURS_IN_DAY);
            for (i, r) in trace.records().iter().enumerate() {
                assert_eq!(r.hour, i);
                assert!(r.demand_kwh >= 0.0 && r.demand_kwh.is_finite());
                assert!(r.solar_kwh >= 0.0 && r.solar_kwh.is_finite());
                assert!(r.price >= 0.0 && r.price.is_finite());
            }
        }
    }

    #[test]
    fn same_seed_same_trace() {
        let traces = generator();
        let weather = clear_summer();
        let a = traces.generate(&weather, &mut StdRng::seed_from_u64(77));
        let b = traces.generate(&weather, &mut StdRng::seed_from_u64(77));
        assert_eq!(a, b);
    }

    #[test]
    fn no_solar_outside_daylight() {
        let traces = generator();
        let weather = clear_summer();
        let trace = traces.generate(&weather, &mut StdRng::seed_from_u64(3));
        for r in trace.records() {
            if !weather.is_daylight(r.hour) {
                assert_eq!(r.solar_kwh, 0.0, "hour {}", r.hour);
            }
        }
    }

    #[test]
    fn head_count_ramps_are_monotone() {
        let traces = generator();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..300 {
            let trace = traces.generate(&clear_summer(), &mut rng);
            let r = trace.records();
            assert_eq!(r[6].attendance, 0);
            assert!(r[7].attendance <= r[8].attendance);
            assert!(r[8].attendance <= r[9].attendance);
            assert!(r[16].attendance >= r[17].attendance);
            assert!(r[17].attendance >= r[18].attendance);
            assert!(r[18].attendance >= r[19].attendance);
            assert_eq!(r[20].attendance, 0);
            let core = r[9].attendance;
            assert!((9..17).all(|h| r[h].attendance == core));
        }
    }

    #[test]
    fn core_demand_exceeds_night_demand_on_average() {
        let traces = generator();
        let mut rng = StdRng::seed_from_u64(5);
        let (mut night, mut core) = (0.0, 0.0);
        for _ in 0..200 {
            let trace = traces.generate(&clear_summer(), &mut rng);
            night += trace.records()[2].demand_kwh;
            core += trace.records()[12].demand_kwh;
        }
        assert!(core > night);
    }
}
