// src/progress.rs
use std::time::Duration;

use crate::scrape::StopReason;

/// Lightweight progress reporting for a scrape session.
/// Frontends implement this to surface status; the log file stays the source of truth.
pub trait Progress {
    /// Called once, before URL discovery, with the session budget.
    fn begin(&mut self, _budget: Duration) {}

    /// Called after each appended row with the running row count.
    fn sample_written(&mut self, _rows: usize) {}

    /// Called at the end, whatever the reason.
    fn finish(&mut self, _reason: &StopReason) {}
}

/// Console heartbeat for unattended runs: an INFO line every `every` rows.
pub struct RowTicker {
    every: usize,
    budget: Duration,
}

impl RowTicker {
    pub fn new(every: usize) -> Self {
        Self { every: every.max(1), budget: Duration::ZERO }
    }
}

impl Progress for RowTicker {
    fn begin(&mut self, budget: Duration) {
        self.budget = budget;
    }

    fn sample_written(&mut self, rows: usize) {
        if rows % self.every == 0 {
            logf!("{} rows written so far ({}s session).", rows, self.budget.as_secs());
        }
    }

    fn finish(&mut self, reason: &StopReason) {
        logd!("Session finished: {}", reason);
    }
}
