//! Seasonal weather sampling: cloud cover, temperature range, daylight window.

use std::fmt;

use rand::Rng;

use super::types::{normal, pick, unit_triangular};

/// Meteorological season; each is drawn with probability 1/4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// All seasons in quartile order.
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    /// Maps a uniform draw in [0, 1) onto a season by quartile.
    pub fn from_quartile(u: f64) -> Self {
        if u < 0.25 {
            Season::Winter
        } else if u < 0.5 {
            Season::Spring
        } else if u < 0.75 {
            Season::Summer
        } else {
            Season::Autumn
        }
    }

    /// Statistical parameters of this season's weather.
    pub fn params(self) -> &'static SeasonParams {
        match self {
            Season::Winter => &WINTER,
            Season::Spring => &SPRING,
            Season::Summer => &SUMMER,
            Season::Autumn => &AUTUMN,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        };
        f.write_str(name)
    }
}

/// Weather distribution of one season.
///
/// Cloud cover is a three-way mixture selected by a uniform draw `u`:
/// partial cover (triangular on [0, 1]) when `u < partial_below`, full cover
/// when `u < full_below`, clear sky otherwise.
#[derive(Debug, Clone, Copy)]
pub struct SeasonParams {
    pub partial_below: f64,
    pub full_below: f64,
    /// Mode of the triangular partial-cover branch.
    pub partial_mode: f64,
    /// Mean and standard deviation of the daily high (°F).
    pub high_temp_f: (f64, f64),
    /// Mean and standard deviation of the daily low (°F).
    pub low_temp_f: (f64, f64),
    pub sunrise_hours: &'static [usize],
    pub sunset_hours: &'static [usize],
}

const WINTER: SeasonParams = SeasonParams {
    partial_below: 0.45,
    full_below: 0.65,
    partial_mode: 0.7,
    high_temp_f: (60.0, 25.0),
    low_temp_f: (40.0, 16.0),
    sunrise_hours: &[6, 7],
    sunset_hours: &[17, 18],
};

const SPRING: SeasonParams = SeasonParams {
    partial_below: 0.35,
    full_below: 0.5,
    partial_mode: 0.4,
    high_temp_f: (70.0, 25.0),
    low_temp_f: (45.0, 36.0),
    sunrise_hours: &[6, 7],
    sunset_hours: &[18, 19, 20],
};

const SUMMER: SeasonParams = SeasonParams {
    partial_below: 0.2,
    full_below: 0.25,
    partial_mode: 0.1,
    high_temp_f: (80.0, 36.0),
    low_temp_f: (55.0, 16.0),
    sunrise_hours: &[5, 6],
    sunset_hours: &[20, 21],
};

const AUTUMN: SeasonParams = SeasonParams {
    partial_below: 0.35,
    full_below: 0.5,
    partial_mode: 0.5,
    high_temp_f: (65.0, 25.0),
    low_temp_f: (43.0, 16.0),
    sunrise_hours: &[6, 7],
    sunset_hours: &[18, 19, 20],
};

/// One simulated day's weather. Immutable once sampled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherProfile {
    pub season: Season,
    /// Fraction of the sky covered, in [0, 1].
    pub cloud_cover: f64,
    /// Daily high (°F), always >= `low_temp_f`.
    pub high_temp_f: f64,
    /// Daily low (°F).
    pub low_temp_f: f64,
    /// First hour with solar generation (inclusive).
    pub sunrise_hour: usize,
    /// Last hour with solar generation (inclusive).
    pub sunset_hour: usize,
}

impl WeatherProfile {
    /// Builds a profile, swapping an inverted temperature pair and clamping
    /// cloud cover into [0, 1].
    pub fn new(
        season: Season,
        cloud_cover: f64,
        high_temp_f: f64,
        low_temp_f: f64,
        sunrise_hour: usize,
        sunset_hour: usize,
    ) -> Self {
        let (high_temp_f, low_temp_f) = if high_temp_f < low_temp_f {
            (low_temp_f, high_temp_f)
        } else {
            (high_temp_f, low_temp_f)
        };
        Self {
            season,
            cloud_cover: cloud_cover.clamp(0.0, 1.0),
            high_temp_f,
            low_temp_f,
            sunrise_hour,
            sunset_hour,
        }
    }

    /// Whether `hour` lies inside the inclusive daylight window.
    pub fn is_daylight(&self, hour: usize) -> bool {
        hour >= self.sunrise_hour && hour <= self.sunset_hour
    }

    /// Fraction of the daylight window elapsed at `hour`, or `None` at night.
    pub fn day_progress(&self, hour: usize) -> Option<f64> {
        if !self.is_daylight(hour) {
            return None;
        }
        let span = self.sunset_hour.saturating_sub(self.sunrise_hour);
        if span == 0 {
            return Some(0.0);
        }
        Some((hour - self.sunrise_hour) as f64 / span as f64)
    }
}

/// Draws one [`WeatherProfile`] per simulated day.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeatherSampler;

impl WeatherSampler {
    /// Samples a season, then that season's cloud cover, temperatures and
    /// daylight window. Never fails.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> WeatherProfile {
        let season = Season::from_quartile(rng.random::<f64>());
        let p = season.params();

        let cloudy = rng.random::<f64>();
        let cloud_cover = if cloudy < p.partial_below {
            unit_triangular(rng, p.partial_mode)
        } else if cloudy < p.full_below {
            1.0
        } else {
            0.0
        };

        let high = normal(rng, p.high_temp_f.0, p.high_temp_f.1);
        let low = normal(rng, p.low_temp_f.0, p.low_temp_f.1);

        let sunrise = pick(rng, p.sunrise_hours).unwrap_or(6);
        let sunset = pick(rng, p.sunset_hours).unwrap_or(18);

        WeatherProfile::new(season, cloud_cover, high, low, sunrise, sunset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn inverted_temperatures_are_swapped() {
        let w = WeatherProfile::new(Season::Winter, 0.2, 30.0, 50.0, 6, 18);
        assert_eq!(w.high_temp_f, 50.0);
        assert_eq!(w.low_temp_f, 30.0);
    }

    #[test]
    fn quartiles_map_to_seasons() {
        assert_eq!(Season::from_quartile(0.0), Season::Winter);
        assert_eq!(Season::from_quartile(0.3), Season::Spring);
        assert_eq!(Season::from_quartile(0.6), Season::Summer);
        assert_eq!(Season::from_quartile(0.99), Season::Autumn);
    }

    #[test]
    fn day_progress_spans_window() {
        let w = WeatherProfile::new(Season::Summer, 0.0, 80.0, 60.0, 6, 20);
        assert_eq!(w.day_progress(5), None);
        assert_eq!(w.day_progress(6), Some(0.0));
        assert_eq!(w.day_progress(13), Some(0.5));
        assert_eq!(w.day_progress(20), Some(1.0));
        assert_eq!(w.day_progress(21), None);
    }

    #[test]
    fn samples_respect_season_tables() {
        let mut rng = StdRng::seed_from_u64(2024);
        let sampler = WeatherSampler;
        for _ in 0..2_000 {
            let w = sampler.sample(&mut rng);
            let p = w.season.params();
            assert!((0.0..=1.0).contains(&w.cloud_cover));
            assert!(w.high_temp_f >= w.low_temp_f);
            assert!(p.sunrise_hours.contains(&w.sunrise_hour));
            assert!(p.sunset_hours.contains(&w.sunset_hour));
        }
    }

    #[test]
    fn every_season_appears() {
        let mut rng = StdRng::seed_from_u64(11);
        let sampler = WeatherSampler;
        let mut seen = [false; 4];
        for _ in 0..400 {
            let season = sampler.sample(&mut rng).season;
            let idx = Season::ALL.iter().position(|s| *s == season).unwrap_or(0);
            seen[idx] = true;
        }
        assert_eq!(seen, [true; 4]);
    }
}
