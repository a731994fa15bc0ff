//! The stochastic environment: weather, tariff, and daily trace generation.

/// Synthetic daily trace generation.
pub mod generator;
/// Time-of-day tariff and demand-driven price adjustment.
pub mod tariff;
/// Hourly records and the validated daily trace.
pub mod trace;
pub mod types;
/// Seasonal weather sampling.
pub mod weather;

pub use generator::{DemandBand, TraceGenerator};
pub use tariff::{HOURS_IN_DAY, Tariff, TariffTier};
pub use trace::{DailyTrace, HourRecord, TraceError};
pub use weather::{Season, WeatherProfile, WeatherSampler};
