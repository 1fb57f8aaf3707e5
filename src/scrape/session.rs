// src/scrape/session.rs
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::DateTime;
use chrono_tz::Tz;

use crate::browser::{Browser, BrowserError};
use crate::file::now_local;

const MIN_STEP: Duration = Duration::from_millis(1);

/// Shared "please stop" switch. Set from the signal listener, read by the loop.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self { Self::default() }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One bounded run against one target page. The budget is fixed at creation.
#[derive(Debug)]
pub struct Session {
    started: Instant,
    pub started_at: DateTime<Tz>,
    pub duration: Duration,
    pub target_url: Option<String>,
    stop: StopFlag,
}

impl Session {
    pub fn begin(duration: Duration, stop: StopFlag) -> Self {
        Self {
            started: Instant::now(),
            started_at: now_local(),
            duration,
            target_url: None,
            stop,
        }
    }

    pub fn elapsed(&self) -> Duration { self.started.elapsed() }

    pub fn remaining(&self) -> Duration { self.duration.saturating_sub(self.elapsed()) }

    pub fn expired(&self) -> bool { self.elapsed() >= self.duration }

    pub fn cancelled(&self) -> bool { self.stop.is_set() }

    /// Sleep for `d`, never past the end of the budget, waking every `step`
    /// to check for cancellation. Returns false if cut short by a stop request.
    pub fn pause(&self, d: Duration, step: Duration) -> bool {
        let until = Instant::now() + d.min(self.remaining());
        let step = step.max(MIN_STEP);
        loop {
            if self.cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= until {
                return true;
            }
            std::thread::sleep(step.min(until - now));
        }
    }

    /// Return once `selector` matches, checking every `step`. Fails with
    /// `Timeout` after `timeout`, or `Cancelled` as soon as a stop is requested.
    pub fn wait_for<B: Browser + ?Sized>(
        &self,
        browser: &mut B,
        selector: &str,
        timeout: Duration,
        step: Duration,
    ) -> Result<(), BrowserError> {
        let started = Instant::now();
        let step = step.max(MIN_STEP);
        loop {
            if self.cancelled() {
                return Err(BrowserError::Cancelled);
            }
            if browser.exists(selector)? {
                return Ok(());
            }
            let waited = started.elapsed();
            if waited >= timeout {
                return Err(BrowserError::Timeout { selector: s!(selector), after: waited });
            }
            std::thread::sleep(step.min(timeout - waited));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_is_clamped_to_budget() {
        let s = Session::begin(Duration::from_millis(50), StopFlag::new());
        let t0 = Instant::now();
        assert!(s.pause(Duration::from_secs(5), Duration::from_millis(5)));
        assert!(t0.elapsed() < Duration::from_secs(1));
        assert!(s.expired());
    }

    #[test]
    fn stop_request_cuts_pause_short() {
        let stop = StopFlag::new();
        let s = Session::begin(Duration::from_secs(60), stop.clone());
        stop.request();
        assert!(!s.pause(Duration::from_secs(5), Duration::from_millis(5)));
        assert!(s.cancelled());
    }

    #[test]
    fn remaining_never_underflows() {
        let s = Session::begin(Duration::ZERO, StopFlag::new());
        assert_eq!(s.remaining(), Duration::ZERO);
        assert!(s.expired());
    }
}
