// src/scrape/poll.rs
use std::io::Write;

use crate::{
    browser::{Browser, BrowserError},
    config::{consts::MARKER_SELECTOR, options::ScrapeOptions},
    csv::SampleWriter,
    file::{now_local, timestamp},
    progress::Progress,
};

use super::{
    Sample, Session, StopReason,
    extract::{Reading, read_fields},
};

/// The steady-state loop: wait for the page, read, append, pause, repeat.
///
/// Returns when the budget runs out, the page stops looking like the game,
/// a stop is requested, or the browser/CSV fails. Never panics on page state.
pub fn poll<B: Browser, W: Write>(
    browser: &mut B,
    session: &Session,
    opts: &ScrapeOptions,
    writer: &mut SampleWriter<W>,
    mut progress: Option<&mut dyn Progress>,
) -> StopReason {
    let t = &opts.timing;
    let mut missing_streak = 0u32;

    loop {
        if session.cancelled() {
            return StopReason::Cancelled;
        }
        if session.expired() {
            return StopReason::DurationElapsed;
        }

        let wait = t.marker_wait.min(session.remaining());
        match session.wait_for(browser, MARKER_SELECTOR, wait, t.poll_step) {
            Ok(()) => {}
            Err(BrowserError::Cancelled) => return StopReason::Cancelled,
            // The clamped wait may simply have hit the end of the budget.
            Err(_) if session.expired() => return StopReason::DurationElapsed,
            Err(e) if e.is_lookup() => {
                logw!("The crash page changed or elements not found: {}", e);
                return StopReason::PageChanged(e.to_string());
            }
            Err(e) => return StopReason::Fault(e.to_string()),
        }

        let reading = match read_fields(browser) {
            Ok(r) => r,
            Err(e) => return StopReason::Fault(e.to_string()),
        };

        match reading {
            Reading::Complete(fields) if fields.multiplier.is_empty() => {
                missing_streak = 0;
                logd!("Value X empty, waiting before retrying.");
                session.pause(t.empty_pause, t.poll_step);
            }
            Reading::Complete(fields) => {
                missing_streak = 0;
                let sample = Sample::new(timestamp(&now_local()), fields);
                if let Err(e) = writer.append(&sample) {
                    return StopReason::Fault(format!("CSV write failed: {e}"));
                }
                logf!("Data extracted and written: {}", sample.to_row().join(","));
                if let Some(p) = progress.as_deref_mut() {
                    p.sample_written(writer.rows());
                }
                session.pause(t.row_pause, t.poll_step);
            }
            Reading::Missing(labels) => {
                missing_streak += 1;
                logw!(
                    "Fields not found ({}/{}): {}",
                    missing_streak,
                    opts.max_missing_cycles,
                    labels.join(", ")
                );
                if missing_streak >= opts.max_missing_cycles {
                    return StopReason::PageChanged(format!(
                        "{} consecutive cycles with missing fields",
                        missing_streak
                    ));
                }
                session.pause(t.empty_pause, t.poll_step);
            }
        }
    }
}
