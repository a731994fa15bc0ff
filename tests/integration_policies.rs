//! Integration tests for the dispatch variants on hand-built and generated days.

mod common;

use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

use arbitrage_sim::config::PredictorConfig;
use arbitrage_sim::dispatch::{
    AdaptivePredictor, DispatchAction, OfflinePredictor, PricePredictor, RandomPredictor,
    StaticTablePredictor, greedy_profit, run_policy,
};
use arbitrage_sim::environment::{DailyTrace, Tariff};

use common::SMALL_CAPACITY_KWH as B;

fn static_table() -> StaticTablePredictor {
    StaticTablePredictor::from_tariff(&Tariff::default())
}

fn adaptive() -> AdaptivePredictor {
    AdaptivePredictor::new(&common::baseline_environment())
}

fn random(seed: u64) -> RandomPredictor {
    RandomPredictor::from_config(&PredictorConfig::default(), &mut StdRng::seed_from_u64(seed))
}

fn offline_profit(trace: &DailyTrace, capacity_kwh: f64) -> f64 {
    run_policy(trace, &mut OfflinePredictor::new(trace), capacity_kwh).profit
}

#[test]
fn shortfall_then_surplus_breaks_even() {
    let trace = common::trace_from(&[(10.0, 0.0, 1.0), (0.0, 20.0, 0.5)]);
    assert_abs_diff_eq!(offline_profit(&trace, B), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(run_policy(&trace, &mut static_table(), B).profit, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(greedy_profit(&trace), 0.0, epsilon = 1e-12);
}

#[test]
fn cheap_hour_prebuy_pays_off() {
    let trace = common::trace_from(&[(0.0, 0.0, 0.1), (50.0, 0.0, 0.3)]);
    assert_abs_diff_eq!(offline_profit(&trace, B), 5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(run_policy(&trace, &mut static_table(), B).profit, 5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(run_policy(&trace, &mut adaptive(), B).profit, 5.0, epsilon = 1e-12);
}

#[test]
fn final_hour_prebuy_differs_by_variant() {
    let trace = common::trace_from(&[(0.0, 0.0, 0.1)]);

    let table = run_policy(&trace, &mut static_table(), B);
    assert_abs_diff_eq!(table.profit, -10.0, epsilon = 1e-12);
    assert_eq!(table.steps[0].action, DispatchAction::Prebuy);

    let model = run_policy(&trace, &mut adaptive(), B);
    assert_eq!(model.profit, 0.0);
    assert_eq!(model.steps[0].action, DispatchAction::Hold);

    let coin = run_policy(&trace, &mut random(1), B);
    assert_eq!(coin.profit, 0.0);
    assert_eq!(coin.steps[0].action, DispatchAction::Hold);

    assert_eq!(offline_profit(&trace, B), 0.0);
}

#[test]
fn charge_stays_within_capacity_on_generated_days() {
    let capacity = 180.0;
    for (i, trace) in common::generated_traces(100, 21).iter().enumerate() {
        let mut predictors: Vec<Box<dyn PricePredictor + '_>> = vec![
            Box::new(OfflinePredictor::new(trace)),
            Box::new(static_table()),
            Box::new(adaptive()),
            Box::new(random(i as u64)),
        ];
        for p in &mut predictors {
            let out = run_policy(trace, p.as_mut(), capacity);
            assert_eq!(out.steps.len(), 24);
            for s in &out.steps {
                assert!(
                    (0.0..=capacity).contains(&s.charge_after),
                    "trace {i} hour {}: charge {}",
                    s.hour,
                    s.charge_after
                );
            }
        }
    }
}

#[test]
fn greedy_is_deterministic() {
    let a = common::generated_traces(20, 8);
    let b = common::generated_traces(20, 8);
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(greedy_profit(x), greedy_profit(y));
    }
}

#[test]
fn offline_dominates_every_variant_on_generated_days() {
    for (i, trace) in common::generated_traces(300, 77).iter().enumerate() {
        let offline = offline_profit(trace, 180.0);
        let others = [
            run_policy(trace, &mut static_table(), 180.0).profit,
            run_policy(trace, &mut adaptive(), 180.0).profit,
            run_policy(trace, &mut random(i as u64), 180.0).profit,
            greedy_profit(trace),
        ];
        for profit in others {
            assert!(offline >= profit - 1e-6, "trace {i}: {profit} > offline {offline}");
        }
    }
}

#[test]
fn profit_decomposes_into_greedy_plus_carried_charge() {
    for trace in common::generated_traces(50, 3) {
        let out = run_policy(&trace, &mut adaptive(), 180.0);
        let prices: Vec<f64> = trace.records().iter().map(|r| r.price).collect();
        let carried: f64 = out
            .steps
            .iter()
            .enumerate()
            .map(|(t, s)| {
                let next = prices.get(t + 1).copied().unwrap_or(0.0);
                s.charge_after * (next - prices[t])
            })
            .sum();
        assert_abs_diff_eq!(out.profit, greedy_profit(&trace) + carried, epsilon = 1e-6);
    }
}
