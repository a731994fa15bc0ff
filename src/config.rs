//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline experiment. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Trial count, seeding, and battery sizing.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Employee population and attendance behaviour.
    #[serde(default)]
    pub workforce: WorkforceConfig,
    /// Building demand bands.
    #[serde(default)]
    pub demand: DemandConfig,
    /// Solar array and weather sensitivity.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Tariff tiers and price noise.
    #[serde(default)]
    pub price: PriceConfig,
    /// Parameters of the uninformed random predictor.
    #[serde(default)]
    pub predictor: PredictorConfig,
}

/// The statistical environment: workforce, demand, solar, and price.
///
/// Shared by the trace generator and the adaptive predictor so that the
/// predictor's closed-form model mirrors the generator exactly.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentConfig {
    pub workforce: WorkforceConfig,
    pub demand: DemandConfig,
    pub solar: SolarConfig,
    pub price: PriceConfig,
}

/// Trial count, seeding, and battery sizing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of independent simulated days (must be > 0).
    pub trials: usize,
    /// Master random seed; each trial derives its own stream from it.
    pub seed: u64,
    /// Battery capacity shared by every policy (kWh, must be > 0).
    pub battery_capacity_kwh: f64,
    /// Offline profits with magnitude below this are excluded from ratio statistics.
    pub ratio_epsilon: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 100_000,
            seed: 42,
            battery_capacity_kwh: 180.0,
            ratio_epsilon: 1e-9,
        }
    }
}

/// Employee population and attendance behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkforceConfig {
    /// Number of employees that could attend on a given day.
    pub employees: u32,
    /// Probability that an employee attends at all.
    pub prob_attend: f64,
    /// Per-hour arrival probability increment during the morning ramp.
    pub prob_early: f64,
    /// Per-hour stay probability increment during the evening ramp.
    pub prob_stay_late: f64,
    /// Mean hourly consumption of one present employee (kWh).
    pub consumption_per_employee_kwh: f64,
    /// Variance contributed by one present employee (kWh²).
    pub employee_variance: f64,
    /// Fraction of the hour that employees leaving during the evening ramp are still present.
    pub departure_overlap: f64,
}

impl Default for WorkforceConfig {
    fn default() -> Self {
        Self {
            employees: 100,
            prob_attend: 0.9,
            prob_early: 0.3,
            prob_stay_late: 0.15,
            consumption_per_employee_kwh: 0.2,
            employee_variance: 0.05 * 0.05,
            departure_overlap: 0.5,
        }
    }
}

impl WorkforceConfig {
    /// Expected number of attendees on an average day.
    pub fn expected_attendance(&self) -> f64 {
        f64::from(self.employees) * self.prob_attend
    }
}

/// Building demand bands.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// Night-time mean demand: security, climate control (kWh).
    pub low_avg_kwh: f64,
    /// Night-time demand variance.
    pub low_variance: f64,
    /// Daytime demand with nobody present: night load plus lighting (kWh).
    pub high_no_people_avg_kwh: f64,
    /// Daytime unoccupied demand variance.
    pub high_no_people_variance: f64,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            low_avg_kwh: 100.0,
            low_variance: 10.0 * 10.0,
            high_no_people_avg_kwh: 150.0,
            high_no_people_variance: 10.0 * 10.0 + 5.0 * 5.0,
        }
    }
}

/// Solar array and weather sensitivity.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Mean generation at solar noon under clear, cool skies (kWh).
    pub avg_generation_kwh: f64,
    /// Generation noise standard deviation before weather scaling (kWh).
    pub noise_std: f64,
    /// Fractional output lost at full cloud cover.
    pub cloud_cover_multiplier: f64,
    /// Standard deviation of the hourly temperature around the diurnal curve (°F).
    pub temp_std_f: f64,
    /// Fractional output lost per °F above the threshold.
    pub temp_multiplier: f64,
    /// Panel temperature above which output degrades (°F).
    pub temp_threshold_f: f64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            avg_generation_kwh: 200.0,
            noise_std: 50.0,
            cloud_cover_multiplier: 0.3,
            temp_std_f: 3.0,
            temp_multiplier: 0.00143,
            temp_threshold_f: 77.0,
        }
    }
}

/// Tariff tiers and price noise.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceConfig {
    /// Off-peak tier price (currency/kWh).
    pub off_peak: f64,
    /// Shoulder tier price (currency/kWh).
    pub shoulder: f64,
    /// Peak tier price (currency/kWh).
    pub peak: f64,
    /// Gaussian price noise standard deviation.
    pub noise_std: f64,
    /// Scale of the `ln |Δdemand|` price adjustment.
    pub demand_log_coefficient: f64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            off_peak: 0.18524,
            shoulder: 0.26202,
            peak: 0.37729,
            noise_std: 0.005,
            demand_log_coefficient: 0.02,
        }
    }
}

/// Parameters of the uninformed random predictor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredictorConfig {
    /// Lower bound of the uniform prediction band.
    pub random_min: f64,
    /// Upper bound (exclusive) of the uniform prediction band.
    pub random_max: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        let price = PriceConfig::default();
        Self {
            random_min: price.off_peak,
            random_max: price.peak,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.trials"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline experiment (180 kWh battery, 100 000 trials).
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the small-battery preset: a third of the baseline capacity.
    pub fn small_battery() -> Self {
        Self {
            simulation: SimulationConfig {
                battery_capacity_kwh: 60.0,
                ..SimulationConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the large-battery preset: roughly a full day of night load.
    pub fn large_battery() -> Self {
        Self {
            simulation: SimulationConfig {
                battery_capacity_kwh: 1_000.0,
                ..SimulationConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the cloudy-winter preset: weak solar, noisier prices, lower attendance.
    pub fn cloudy_winter() -> Self {
        Self {
            workforce: WorkforceConfig {
                prob_attend: 0.75,
                ..WorkforceConfig::default()
            },
            solar: SolarConfig {
                avg_generation_kwh: 120.0,
                cloud_cover_multiplier: 0.6,
                ..SolarConfig::default()
            },
            price: PriceConfig {
                noise_std: 0.02,
                ..PriceConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "small_battery", "large_battery", "cloudy_winter"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "small_battery" => Ok(Self::small_battery()),
            "large_battery" => Ok(Self::large_battery()),
            "cloudy_winter" => Ok(Self::cloudy_winter()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Returns the environment sections as one value for the generator and predictors.
    pub fn environment(&self) -> EnvironmentConfig {
        EnvironmentConfig {
            workforce: self.workforce.clone(),
            demand: self.demand.clone(),
            solar: self.solar.clone(),
            price: self.price.clone(),
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.trials == 0 {
            errors.push(ConfigError::new("simulation.trials", "must be > 0"));
        }
        if !(s.battery_capacity_kwh.is_finite() && s.battery_capacity_kwh > 0.0) {
            errors.push(ConfigError::new(
                "simulation.battery_capacity_kwh",
                "must be finite and > 0",
            ));
        }
        if !(s.ratio_epsilon >= 0.0) {
            errors.push(ConfigError::new("simulation.ratio_epsilon", "must be >= 0"));
        }

        let w = &self.workforce;
        for (field, p) in [
            ("workforce.prob_attend", w.prob_attend),
            ("workforce.prob_early", w.prob_early),
            ("workforce.prob_stay_late", w.prob_stay_late),
            ("workforce.departure_overlap", w.departure_overlap),
        ] {
            if !(0.0..=1.0).contains(&p) {
                errors.push(ConfigError::new(field, "must be in [0.0, 1.0]"));
            }
        }
        // The morning ramp reaches 2 * prob_early and the evening ramp 3 * prob_stay_late.
        if w.prob_early * 2.0 > 1.0 {
            errors.push(ConfigError::new("workforce.prob_early", "must be <= 0.5"));
        }
        if w.prob_stay_late * 3.0 > 1.0 {
            errors.push(ConfigError::new(
                "workforce.prob_stay_late",
                "must be <= 1/3",
            ));
        }

        let non_negative = [
            (
                "workforce.consumption_per_employee_kwh",
                w.consumption_per_employee_kwh,
            ),
            ("workforce.employee_variance", w.employee_variance),
            ("demand.low_avg_kwh", self.demand.low_avg_kwh),
            ("demand.low_variance", self.demand.low_variance),
            (
                "demand.high_no_people_avg_kwh",
                self.demand.high_no_people_avg_kwh,
            ),
            (
                "demand.high_no_people_variance",
                self.demand.high_no_people_variance,
            ),
            (
                "solar.avg_generation_kwh",
                self.solar.avg_generation_kwh,
            ),
            ("solar.noise_std", self.solar.noise_std),
            ("solar.temp_std_f", self.solar.temp_std_f),
            ("solar.temp_multiplier", self.solar.temp_multiplier),
            ("price.off_peak", self.price.off_peak),
            ("price.noise_std", self.price.noise_std),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError::new(field, "must be finite and >= 0"));
            }
        }

        let sol = &self.solar;
        if !(0.0..=1.0).contains(&sol.cloud_cover_multiplier) {
            errors.push(ConfigError::new(
                "solar.cloud_cover_multiplier",
                "must be in [0.0, 1.0]",
            ));
        }

        let p = &self.price;
        if p.shoulder < p.off_peak {
            errors.push(ConfigError::new("price.shoulder", "must be >= price.off_peak"));
        }
        if p.peak < p.shoulder {
            errors.push(ConfigError::new("price.peak", "must be >= price.shoulder"));
        }

        let pr = &self.predictor;
        if !(pr.random_min.is_finite() && pr.random_max.is_finite())
            || pr.random_min >= pr.random_max
        {
            errors.push(ConfigError::new(
                "predictor.random_min",
                "must be finite and < predictor.random_max",
            ));
        }

        errors
    }
}
