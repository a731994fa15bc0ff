//! Monte Carlo evaluation of every dispatch variant against offline profit.

/// Trial loop and per-trial seeding.
pub mod runner;
/// Profit and ratio aggregation.
pub mod stats;

pub use runner::{EvaluationHarness, TrialOutcome, trial_seed};
pub use stats::{
    EvaluationReport, RatioSample, VariantAccumulator, VariantSummary, WorstTrial,
    ratio_is_degenerate,
};
