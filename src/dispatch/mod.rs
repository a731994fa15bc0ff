//! Battery dispatch: the energy store, price predictors, and the control loop.

/// Ideal energy store.
pub mod battery;
/// Shared hourly control loop.
pub mod policy;
/// Next-hour price predictors.
pub mod predictor;

pub use battery::Battery;
pub use policy::{
    DispatchAction, DispatchOutcome, DispatchStep, PolicyKind, greedy_profit, run_policy,
};
pub use predictor::{
    AdaptivePredictor, OfflinePredictor, PricePredictor, RandomPredictor, StaticTablePredictor,
};
