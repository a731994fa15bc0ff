//! Monte Carlo evaluation of battery energy-arbitrage dispatch policies.

/// Command-line arguments.
pub mod cli;
/// TOML scenario configuration and presets.
pub mod config;
/// Battery, price predictors, and the dispatch control loop.
pub mod dispatch;
/// Weather, tariff, and stochastic trace generation.
pub mod environment;
/// Trial loop and report aggregation.
pub mod harness;
pub mod io;
