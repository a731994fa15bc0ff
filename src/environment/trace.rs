//! Hourly records and the validated daily trace.

use std::fmt;

use thiserror::Error;

use super::weather::WeatherProfile;

/// One hour of the simulated day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourRecord {
    /// Hour of day, equal to the record's index in its trace.
    pub hour: usize,
    /// Building demand (kWh, >= 0).
    pub demand_kwh: f64,
    /// Employees present during this hour.
    pub attendance: u32,
    /// Solar generation (kWh, >= 0).
    pub solar_kwh: f64,
    /// Spot price (currency/kWh, >= 0).
    pub price: f64,
}

impl HourRecord {
    /// Solar minus demand: positive is surplus, negative is shortfall.
    pub fn net_kwh(&self) -> f64 {
        self.solar_kwh - self.demand_kwh
    }
}

impl fmt::Display for HourRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h={:>2} | demand={:>7.2} kWh  solar={:>7.2} kWh  people={:>3}  price={:.5}",
            self.hour, self.demand_kwh, self.solar_kwh, self.attendance, self.price,
        )
    }
}

/// Reasons a sequence of records is not a valid trace.
#[derive(Debug, Error, PartialEq)]
pub enum TraceError {
    #[error("trace has no records")]
    Empty,

    #[error("record {index} has hour {hour}, expected {index}")]
    HourOutOfOrder { index: usize, hour: usize },

    #[error("hour {hour}: {field} must be finite and >= 0, got {value}")]
    InvalidValue {
        hour: usize,
        field: &'static str,
        value: f64,
    },
}

/// A day of hourly records sharing one weather profile.
///
/// Record `i` always has `hour == i`; demand, solar, and price are finite and
/// non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTrace {
    weather: WeatherProfile,
    records: Vec<HourRecord>,
}

impl DailyTrace {
    /// Validates and wraps a record sequence.
    ///
    /// # Errors
    ///
    /// Returns a `TraceError` if the sequence is empty, hours are not exactly
    /// `0..len` in order, or any quantity is negative or non-finite.
    pub fn new(weather: WeatherProfile, records: Vec<HourRecord>) -> Result<Self, TraceError> {
        if records.is_empty() {
            return Err(TraceError::Empty);
        }
        for (index, r) in records.iter().enumerate() {
            if r.hour != index {
                return Err(TraceError::HourOutOfOrder {
                    index,
                    hour: r.hour,
                });
            }
            for (field, value) in [
                ("demand", r.demand_kwh),
                ("solar", r.solar_kwh),
                ("price", r.price),
            ] {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(TraceError::InvalidValue {
                        hour: r.hour,
                        field,
                        value,
                    });
                }
            }
        }
        Ok(Self { weather, records })
    }

    /// Wraps records produced by the generator, which upholds the invariants
    /// by construction.
    pub(crate) fn from_generated(weather: WeatherProfile, records: Vec<HourRecord>) -> Self {
        debug_assert!(Self::new(weather, records.clone()).is_ok());
        Self { weather, records }
    }

    pub fn weather(&self) -> &WeatherProfile {
        &self.weather
    }

    pub fn records(&self) -> &[HourRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a constructed trace; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Price of `hour`, if the trace covers it.
    pub fn price_at(&self, hour: usize) -> Option<f64> {
        self.records.get(hour).map(|r| r.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::weather::Season;

    fn weather() -> WeatherProfile {
        WeatherProfile::new(Season::Spring, 0.0, 70.0, 50.0, 6, 19)
    }

    fn rec(hour: usize) -> HourRecord {
        HourRecord {
            hour,
            demand_kwh: 100.0,
            attendance: 0,
            solar_kwh: 0.0,
            price: 0.2,
        }
    }

    #[test]
    fn accepts_consecutive_hours() {
        let trace = DailyTrace::new(weather(), (0..24).map(rec).collect());
        assert!(trace.is_ok());
        let trace = trace.ok();
        assert_eq!(trace.as_ref().map(DailyTrace::len), Some(24));
        assert_eq!(trace.as_ref().and_then(|t| t.price_at(23)), Some(0.2));
        assert_eq!(trace.as_ref().and_then(|t| t.price_at(24)), None);
    }

    #[test]
    fn keeps_the_weather_it_was_built_with() {
        let trace = DailyTrace::new(weather(), vec![rec(0)]);
        assert_eq!(
            trace.as_ref().map(|t| t.weather().season).ok(),
            Some(Season::Spring)
        );
        assert_eq!(trace.map(|t| *t.weather()).ok(), Some(weather()));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(DailyTrace::new(weather(), vec![]), Err(TraceError::Empty));
    }

    #[test]
    fn rejects_gap() {
        let err = DailyTrace::new(weather(), vec![rec(0), rec(2)]);
        assert_eq!(err, Err(TraceError::HourOutOfOrder { index: 1, hour: 2 }));
    }

    #[test]
    fn rejects_negative_price() {
        let mut bad = rec(0);
        bad.price = -0.01;
        let err = DailyTrace::new(weather(), vec![bad]);
        assert!(matches!(
            err,
            Err(TraceError::InvalidValue { field: "price", .. })
        ));
    }

    #[test]
    fn display_does_not_panic() {
        let s = format!("{}", rec(3));
        assert!(s.contains("h= 3"));
    }
}
