//! File output.

/// CSV export of worst-case traces and per-trial profits.
pub mod export;
