//! Sampling helpers shared by the weather sampler and trace generator.

use rand::Rng;
use rand_distr::{Binomial, Distribution, Normal, Triangular};

/// Draws from `N(mean, std_dev)`.
///
/// A `std_dev` that is not positive and finite yields exactly `mean`
/// without consuming randomness.
pub fn normal<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    if !(std_dev.is_finite() && std_dev > 0.0) {
        return mean;
    }
    match Normal::new(mean, std_dev) {
        Ok(dist) => dist.sample(rng),
        Err(_) => mean,
    }
}

/// Draws a head count from `Bin(trials, p)`.
///
/// `p` is clamped to [0, 1]; a NaN probability yields 0.
pub fn binomial<R: Rng>(rng: &mut R, trials: u32, p: f64) -> u32 {
    match Binomial::new(u64::from(trials), p.clamp(0.0, 1.0)) {
        Ok(dist) => u32::try_from(dist.sample(rng)).unwrap_or(trials),
        Err(_) => 0,
    }
}

/// Draws from a triangular distribution on [0, 1] with the given mode.
///
/// The mode is clamped into the unit interval; a NaN mode yields 0.
pub fn unit_triangular<R: Rng>(rng: &mut R, mode: f64) -> f64 {
    match Triangular::new(0.0, 1.0, mode.clamp(0.0, 1.0)) {
        Ok(dist) => dist.sample(rng),
        Err(_) => 0.0,
    }
}

/// Picks one element of a non-empty slice uniformly.
///
/// Returns `None` for an empty slice.
pub fn pick<R: Rng, T: Copy>(rng: &mut R, options: &[T]) -> Option<T> {
    if options.is_empty() {
        return None;
    }
    Some(options[rng.random_range(0..options.len())])
}
