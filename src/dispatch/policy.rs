//! The shared hourly control loop and the greedy no-battery baseline.

use std::fmt;

use crate::environment::DailyTrace;

use super::battery::Battery;
use super::predictor::PricePredictor;

/// The dispatch variants compared by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Offline,
    StaticTable,
    Adaptive,
    Random,
    Greedy,
}

impl PolicyKind {
    /// Every variant, in report order. Also the index order of profit arrays.
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::Offline,
        PolicyKind::StaticTable,
        PolicyKind::Adaptive,
        PolicyKind::Random,
        PolicyKind::Greedy,
    ];

    /// Variants that decide without seeing future prices.
    pub const ONLINE: [PolicyKind; 3] = [
        PolicyKind::StaticTable,
        PolicyKind::Adaptive,
        PolicyKind::Random,
    ];

    /// Position of this variant in [`PolicyKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            PolicyKind::Offline => 0,
            PolicyKind::StaticTable => 1,
            PolicyKind::Adaptive => 2,
            PolicyKind::Random => 3,
            PolicyKind::Greedy => 4,
        }
    }

    /// Snake-case name used in reports and CSV headers.
    pub fn label(self) -> &'static str {
        match self {
            PolicyKind::Offline => "offline",
            PolicyKind::StaticTable => "static_table",
            PolicyKind::Adaptive => "adaptive",
            PolicyKind::Random => "random",
            PolicyKind::Greedy => "greedy",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trading decision taken at the end of an hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchAction {
    /// Sold the whole charge at the current price.
    Liquidate,
    /// Bought the free room at the current price.
    Prebuy,
    /// Neither sold nor bought.
    Hold,
}

/// State after one hour of the control loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchStep {
    pub hour: usize,
    pub action: DispatchAction,
    /// Battery charge carried into the next hour (kWh).
    pub charge_after: f64,
    /// Cumulative profit up to and including this hour.
    pub profit_after: f64,
}

/// Result of running one policy over one trace.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub profit: f64,
    pub steps: Vec<DispatchStep>,
}

/// Runs the hourly control loop over `trace` with a fresh, empty battery.
///
/// Each hour first covers demand from solar and storage (buying any
/// shortfall, selling any spill), then asks `predictor` for the next price:
/// if the current price is higher the battery is emptied into the market,
/// otherwise it is topped up. The top-up is skipped on the last record when
/// the predictor opts out via [`PricePredictor::prebuys_on_final_hour`].
///
/// # Panics
///
/// Panics if `capacity_kwh` is not a positive finite number.
pub fn run_policy<P>(trace: &DailyTrace, predictor: &mut P, capacity_kwh: f64) -> DispatchOutcome
where
    P: PricePredictor + ?Sized,
{
    let mut battery = Battery::new(capacity_kwh);
    let mut profit = 0.0;
    let mut steps = Vec::with_capacity(trace.len());
    let last = trace.len() - 1;

    for (i, r) in trace.records().iter().enumerate() {
        let shortfall = r.demand_kwh - r.solar_kwh - battery.charge_kwh();
        if shortfall > 0.0 {
            profit -= shortfall * r.price;
            battery.drain();
        } else {
            let net = r.net_kwh();
            if net >= 0.0 {
                profit += battery.charge(net) * r.price;
            } else {
                battery.discharge(-net);
            }
        }

        let predicted = predictor.predict_next_price(r.hour, r.demand_kwh, r.attendance);

        let action = if r.price > predicted {
            profit += battery.drain() * r.price;
            DispatchAction::Liquidate
        } else if i == last && !predictor.prebuys_on_final_hour() {
            DispatchAction::Hold
        } else {
            profit -= battery.fill() * r.price;
            DispatchAction::Prebuy
        };

        steps.push(DispatchStep {
            hour: r.hour,
            action,
            charge_after: battery.charge_kwh(),
            profit_after: profit,
        });
    }

    DispatchOutcome { profit, steps }
}

/// Profit with no battery: every hour's net energy is traded at spot price.
pub fn greedy_profit(trace: &DailyTrace) -> f64 {
    trace.records().iter().map(|r| r.net_kwh() * r.price).sum()
}
