//! CSV export of worst-case traces and per-trial profits.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::dispatch::PolicyKind;
use crate::harness::{TrialOutcome, WorstTrial};

/// Column header for the worst-case trace export.
const TRACE_HEADER: &str = "hour,demand_kwh,attendance,solar_kwh,price,\
                            offline_profit,variant_profit,ratio";

/// Column header for the per-trial profit export.
const TRIALS_HEADER: &str = "trial,offline,static_table,adaptive,random,greedy";

/// Exports a worst-case trial to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_worst_trace(worst: &WorstTrial, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_worst_trace(worst, io::BufWriter::new(file))
}

/// Writes a worst-case trial as CSV to any writer.
///
/// One row per hour of the trace. The trial-level profit and ratio columns
/// repeat on every row so each row is self-describing.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_worst_trace(worst: &WorstTrial, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(TRACE_HEADER.split(',').map(str::trim))?;

    for r in worst.trace.records() {
        wtr.write_record(&[
            r.hour.to_string(),
            format!("{:.4}", r.demand_kwh),
            r.attendance.to_string(),
            format!("{:.4}", r.solar_kwh),
            format!("{:.5}", r.price),
            format!("{:.4}", worst.offline_profit),
            format!("{:.4}", worst.variant_profit),
            format!("{:.6}", worst.ratio),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Incremental writer for per-trial profits, fed from
/// [`crate::harness::EvaluationHarness::run_with`].
pub struct TrialsCsv<W: Write> {
    wtr: csv::Writer<W>,
}

impl TrialsCsv<io::BufWriter<File>> {
    /// Creates the file at `path` and writes the header.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if file creation or writing fails.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Self::new(io::BufWriter::new(file))
    }
}

impl<W: Write> TrialsCsv<W> {
    /// Wraps `writer` and writes the header.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if writing fails.
    pub fn new(writer: W) -> io::Result<Self> {
        let mut wtr = csv::WriterBuilder::new().from_writer(writer);
        wtr.write_record(TRIALS_HEADER.split(','))?;
        Ok(Self { wtr })
    }

    /// Appends one row of profits in [`PolicyKind::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if writing fails.
    pub fn write(&mut self, outcome: &TrialOutcome) -> io::Result<()> {
        let mut row = Vec::with_capacity(PolicyKind::ALL.len() + 1);
        row.push(outcome.trial.to_string());
        row.extend(PolicyKind::ALL.iter().map(|&k| format!("{:.6}", outcome.profit(k))));
        self.wtr.write_record(&row)?;
        Ok(())
    }

    /// Flushes buffered rows and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if flushing fails.
    pub fn finish(self) -> io::Result<W> {
        self.wtr.into_inner().map_err(|e| e.into_error())
    }
}
