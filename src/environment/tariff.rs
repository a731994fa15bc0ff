//! Three-tier time-of-day tariff and the demand-driven price adjustment.
//!
//! Tier windows are fixed: peak 09:00–14:00, shoulder 06:00–09:00 and
//! 14:00–16:00, off-peak otherwise. Only the tier prices are configurable.

use crate::config::PriceConfig;

/// Hours in one simulated day.
pub const HOURS_IN_DAY: usize = 24;

/// Hours at which a tier begins (plus midnight). The demand adjustment is
/// not applied at these hours.
pub const BOUNDARY_HOURS: [usize; 5] = [0, 6, 9, 14, 16];

/// One of the three time-of-day price bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TariffTier {
    OffPeak,
    Shoulder,
    Peak,
}

impl TariffTier {
    /// Tier in force at `hour` (hours past 23 are off-peak).
    pub fn at(hour: usize) -> Self {
        match hour {
            9..14 => TariffTier::Peak,
            6..9 | 14..16 => TariffTier::Shoulder,
            _ => TariffTier::OffPeak,
        }
    }
}

/// Tier prices plus the demand-delta adjustment coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tariff {
    pub off_peak: f64,
    pub shoulder: f64,
    pub peak: f64,
    pub demand_log_coefficient: f64,
}

impl Tariff {
    pub fn from_config(cfg: &PriceConfig) -> Self {
        Self {
            off_peak: cfg.off_peak,
            shoulder: cfg.shoulder,
            peak: cfg.peak,
            demand_log_coefficient: cfg.demand_log_coefficient,
        }
    }

    /// Tier price at `hour`, before any adjustment or noise.
    pub fn base_price(&self, hour: usize) -> f64 {
        match TariffTier::at(hour) {
            TariffTier::Peak => self.peak,
            TariffTier::Shoulder => self.shoulder,
            TariffTier::OffPeak => self.off_peak,
        }
    }

    /// `±k·ln|Δdemand|`, signed by the direction of the change.
    ///
    /// Zero at boundary hours and when demand is unchanged; `ln(0)` is never
    /// evaluated.
    pub fn demand_adjustment(&self, hour: usize, demand_kwh: f64, prev_demand_kwh: f64) -> f64 {
        if BOUNDARY_HOURS.contains(&hour) {
            return 0.0;
        }
        let delta = demand_kwh - prev_demand_kwh;
        if delta > 0.0 {
            delta.ln() * self.demand_log_coefficient
        } else if delta < 0.0 {
            -(-delta).ln() * self.demand_log_coefficient
        } else {
            0.0
        }
    }

    /// Noise-free price for `hour` given this and the previous hour's demand.
    pub fn price(&self, hour: usize, demand_kwh: f64, prev_demand_kwh: f64) -> f64 {
        self.base_price(hour) + self.demand_adjustment(hour, demand_kwh, prev_demand_kwh)
    }

    /// Hour-of-day lookup of canonical tier prices for hours 0..=24.
    ///
    /// Hour 24 maps to 0: there is no next-day price to sell into.
    pub fn price_table(&self) -> [f64; HOURS_IN_DAY + 1] {
        let mut table = [0.0; HOURS_IN_DAY + 1];
        for (hour, slot) in table.iter_mut().enumerate().take(HOURS_IN_DAY) {
            *slot = self.base_price(hour);
        }
        table
    }
}

impl Default for Tariff {
    fn default() -> Self {
        Self::from_config(&PriceConfig::default())
    }
}
