//! arbitrage-sim entry point: CLI wiring, configuration, and the evaluation run.

use std::process;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use arbitrage_sim::cli::CliArgs;
use arbitrage_sim::dispatch::PolicyKind;
use arbitrage_sim::harness::EvaluationHarness;
use arbitrage_sim::io::export::{TrialsCsv, export_worst_trace};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = CliArgs::parse();

    let mut scenario = match cli.load_scenario() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };
    cli.apply_overrides(&mut scenario);

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let harness = EvaluationHarness::new(&scenario);
    let trials = scenario.simulation.trials;

    let report = match &cli.trials_out {
        Some(path) => {
            let mut out = match TrialsCsv::create(path) {
                Ok(out) => out,
                Err(e) => {
                    eprintln!("error: failed to create {}: {e}", path.display());
                    process::exit(1);
                }
            };
            let mut write_error = None;
            let report = harness.run_with(trials, |outcome| {
                if write_error.is_none() {
                    write_error = out.write(outcome).err();
                }
            });
            if let Some(e) = write_error.or_else(|| out.finish().err()) {
                eprintln!("error: failed to write trials CSV: {e}");
                process::exit(1);
            }
            info!(path = %path.display(), "per-trial profits written");
            report
        }
        None => harness.run(trials),
    };

    println!("{report}");

    if let Some(path) = &cli.worst_trace_out {
        match report.worst_case(PolicyKind::StaticTable) {
            Some(worst) => {
                if let Err(e) = export_worst_trace(worst, path) {
                    eprintln!("error: failed to write CSV: {e}");
                    process::exit(1);
                }
                info!(
                    path = %path.display(),
                    trial = worst.trial,
                    season = %worst.trace.weather().season,
                    "worst-case trace written"
                );
            }
            None => error!("no static_table ratio was recorded; worst-case trace not written"),
        }
    }
}
