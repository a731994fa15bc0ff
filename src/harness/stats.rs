//! Per-variant aggregation of trial profits into the final report.

use std::fmt;

use crate::dispatch::PolicyKind;
use crate::environment::DailyTrace;

/// The trial that produced a variant's largest ratio to offline profit.
#[derive(Debug, Clone, PartialEq)]
pub struct WorstTrial {
    pub trial: usize,
    pub ratio: f64,
    pub variant_profit: f64,
    pub offline_profit: f64,
    /// The day the ratio was observed on, kept for export.
    pub trace: DailyTrace,
}

/// Outcome of recording one trial into an accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatioSample {
    /// Ratio to offline profit was computed.
    Recorded(f64),
    /// Offline profit was too close to zero to divide by.
    Skipped,
    /// The variant is the offline reference itself.
    NotApplicable,
}

/// Whether `offline_profit` is too close to zero to divide by.
///
/// Exactly zero is always degenerate, even with a zero epsilon.
pub fn ratio_is_degenerate(offline_profit: f64, ratio_epsilon: f64) -> bool {
    offline_profit == 0.0 || offline_profit.abs() < ratio_epsilon
}

/// Running sums for one variant.
#[derive(Debug, Clone)]
pub struct VariantAccumulator {
    kind: PolicyKind,
    trials: usize,
    profit_sum: f64,
    gap_sum: f64,
    ratio_sum: f64,
    ratio_count: usize,
    min_ratio: Option<f64>,
    worst: Option<WorstTrial>,
    skipped_ratios: usize,
}

impl VariantAccumulator {
    pub fn new(kind: PolicyKind) -> Self {
        Self {
            kind,
            trials: 0,
            profit_sum: 0.0,
            gap_sum: 0.0,
            ratio_sum: 0.0,
            ratio_count: 0,
            min_ratio: None,
            worst: None,
            skipped_ratios: 0,
        }
    }

    pub fn kind(&self) -> PolicyKind {
        self.kind
    }

    /// Adds one trial's profits.
    ///
    /// Profit and gap are always accumulated. The ratio `variant / offline`
    /// is skipped when `|offline_profit| < ratio_epsilon`. The trace is
    /// cloned only when it sets a new worst ratio.
    pub fn record(
        &mut self,
        trial: usize,
        trace: &DailyTrace,
        offline_profit: f64,
        variant_profit: f64,
        ratio_epsilon: f64,
    ) -> RatioSample {
        self.trials += 1;
        self.profit_sum += variant_profit;
        self.gap_sum += offline_profit - variant_profit;

        if self.kind == PolicyKind::Offline {
            return RatioSample::NotApplicable;
        }
        if ratio_is_degenerate(offline_profit, ratio_epsilon) {
            self.skipped_ratios += 1;
            return RatioSample::Skipped;
        }

        let ratio = variant_profit / offline_profit;
        self.ratio_sum += ratio;
        self.ratio_count += 1;
        self.min_ratio = Some(self.min_ratio.map_or(ratio, |m| m.min(ratio)));

        if self.worst.as_ref().is_none_or(|w| ratio > w.ratio) {
            self.worst = Some(WorstTrial {
                trial,
                ratio,
                variant_profit,
                offline_profit,
                trace: trace.clone(),
            });
        }

        RatioSample::Recorded(ratio)
    }

    pub fn finish(self) -> VariantSummary {
        let mean = |sum: f64, n: usize| if n > 0 { sum / n as f64 } else { 0.0 };
        VariantSummary {
            kind: self.kind,
            trials: self.trials,
            mean_profit: mean(self.profit_sum, self.trials),
            mean_gap: mean(self.gap_sum, self.trials),
            mean_ratio: (self.ratio_count > 0).then(|| mean(self.ratio_sum, self.ratio_count)),
            min_ratio: self.min_ratio,
            worst: self.worst,
            skipped_ratios: self.skipped_ratios,
        }
    }
}

/// Aggregate statistics of one variant over every trial.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSummary {
    pub kind: PolicyKind,
    pub trials: usize,
    pub mean_profit: f64,
    /// Mean of `offline - variant`; stable even when ratios are not.
    pub mean_gap: f64,
    /// `None` for offline, or when every ratio was skipped.
    pub mean_ratio: Option<f64>,
    pub min_ratio: Option<f64>,
    /// Largest ratio observed.
    pub worst: Option<WorstTrial>,
    pub skipped_ratios: usize,
}

impl VariantSummary {
    pub fn worst_ratio(&self) -> Option<f64> {
        self.worst.as_ref().map(|w| w.ratio)
    }
}

/// Final result of an evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub trials: usize,
    pub seed: u64,
    pub capacity_kwh: f64,
    /// One summary per variant, in [`PolicyKind::ALL`] order.
    pub summaries: Vec<VariantSummary>,
}

impl EvaluationReport {
    pub fn summary(&self, kind: PolicyKind) -> Option<&VariantSummary> {
        self.summaries.iter().find(|s| s.kind == kind)
    }

    /// Variants sorted by ascending mean profit.
    pub fn ordering(&self) -> Vec<PolicyKind> {
        let mut ranked: Vec<&VariantSummary> = self.summaries.iter().collect();
        ranked.sort_by(|a, b| a.mean_profit.total_cmp(&b.mean_profit));
        ranked.into_iter().map(|s| s.kind).collect()
    }

    pub fn worst_case(&self, kind: PolicyKind) -> Option<&WorstTrial> {
        self.summary(kind).and_then(|s| s.worst.as_ref())
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Evaluation Report ---")?;
        writeln!(f, "Trials:            {}", self.trials)?;
        writeln!(f, "Seed:              {}", self.seed)?;
        writeln!(f, "Battery capacity:  {:.2} kWh", self.capacity_kwh)?;
        writeln!(f)?;
        writeln!(f, "Mean profit per variant:")?;
        for s in &self.summaries {
            writeln!(f, "  {:<14} {:>12.4}", s.kind.label(), s.mean_profit)?;
        }
        writeln!(f)?;
        writeln!(f, "Ratio to offline profit:")?;
        writeln!(
            f,
            "  {:<14} {:>10} {:>10} {:>10} {:>8}",
            "variant", "worst", "mean", "mean gap", "skipped"
        )?;
        let rows: Vec<&VariantSummary> = self
            .summaries
            .iter()
            .filter(|s| s.kind != PolicyKind::Offline)
            .collect();
        for (i, s) in rows.iter().enumerate() {
            write!(
                f,
                "  {:<14} {:>10} {:>10} {:>10.4} {:>8}",
                s.kind.label(),
                fmt_opt(s.worst_ratio()),
                fmt_opt(s.mean_ratio),
                s.mean_gap,
                s.skipped_ratios,
            )?;
            if i + 1 < rows.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
