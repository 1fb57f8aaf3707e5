// src/scrape/mod.rs
//! # Scrape session
//!
//! One session = discover the game URL, then poll it until the budget runs
//! out. Everything that can go wrong is reduced to a [`StopReason`] and a log
//! line; nothing propagates past [`run`], and the browser is always released.
//!
//! ```text
//! run ─┬─ discover::discover_url   landing page → iframe src (one retry)
//!      ├─ goto + settle, SampleWriter::create (header once)
//!      ├─ poll::poll               RUNNING until StopReason
//!      └─ Browser::quit            on every path
//! ```
mod discover;
mod extract;
mod poll;
mod sample;
mod session;

use std::fmt;
use std::io;

use thiserror::Error;

use crate::{
    browser::{Browser, BrowserError},
    config::options::ScrapeOptions,
    csv::SampleWriter,
    file::SessionPaths,
    progress::Progress,
};

pub use discover::{DISCOVERY_ATTEMPTS, discover_url, resolve_frame_src};
pub use extract::{FIELDS, Reading, read_fields};
pub use poll::poll;
pub use sample::{Fields, Sample, strip_unit};
pub use session::{Session, StopFlag};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("could not find crash game URL after {attempts} attempts: {last}")]
    UrlNotFound { attempts: u32, last: BrowserError },

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("output: {0}")]
    Io(#[from] io::Error),

    #[error("stop requested")]
    Cancelled,
}

/// Why the session left RUNNING.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    DurationElapsed,
    /// Marker element gone, or fields missing for too many cycles in a row.
    PageChanged(String),
    /// Termination requested from outside.
    Cancelled,
    Fault(String),
}

impl StopReason {
    pub fn is_fault(&self) -> bool {
        matches!(self, StopReason::Fault(_))
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::DurationElapsed => write!(f, "duration elapsed"),
            StopReason::PageChanged(why) => write!(f, "page changed ({why})"),
            StopReason::Cancelled => write!(f, "cancelled"),
            StopReason::Fault(why) => write!(f, "fault: {why}"),
        }
    }
}

/// What a finished session produced.
#[derive(Debug)]
pub struct Summary {
    pub reason: StopReason,
    pub target_url: Option<String>,
    pub rows: usize,
}

/// Run one full session. Absorbs every failure into the log and the summary.
pub fn run<B: Browser>(
    browser: &mut B,
    opts: &ScrapeOptions,
    session: &mut Session,
    paths: &SessionPaths,
    mut progress: Option<&mut dyn Progress>,
) -> Summary {
    logf!("Scraping will run for {} seconds.", opts.duration.as_secs());
    if let Some(p) = progress.as_deref_mut() {
        p.begin(opts.duration);
    }

    let (reason, rows) = match discover_url(browser, &opts.timing, session) {
        Ok(url) => {
            session.target_url = Some(url.clone());
            let sink = progress.as_mut().map(|p| &mut **p as &mut dyn Progress);
            fetch(browser, &url, opts, session, paths, sink)
        }
        Err(ScrapeError::Cancelled) => {
            logw!("Stop requested while searching for the game URL.");
            (StopReason::Cancelled, 0)
        }
        Err(e) => {
            loge!("Error in scraping process: {}", e);
            (StopReason::Fault(e.to_string()), 0)
        }
    };

    close(browser);

    if let Some(p) = progress.as_deref_mut() {
        p.finish(&reason);
    }
    Summary { reason, target_url: session.target_url.clone(), rows }
}

fn fetch<B: Browser>(
    browser: &mut B,
    url: &str,
    opts: &ScrapeOptions,
    session: &Session,
    paths: &SessionPaths,
    progress: Option<&mut dyn Progress>,
) -> (StopReason, usize) {
    logf!("Fetching data from URL: {}", url);
    if let Err(e) = browser.goto(url) {
        loge!("Error while fetching data: {}", e);
        return (StopReason::Fault(e.to_string()), 0);
    }
    if !session.pause(opts.timing.page_settle, opts.timing.poll_step) {
        logw!("Stop requested, leaving before the first read.");
        return (StopReason::Cancelled, 0);
    }

    let mut writer = match SampleWriter::create(&paths.csv) {
        Ok(w) => w,
        Err(e) => {
            loge!("Error while fetching data: cannot create {}: {}", paths.csv.display(), e);
            return (StopReason::Fault(e.to_string()), 0);
        }
    };
    logf!("Writing scraped data to: {}", paths.csv.display());

    let reason = poll(browser, session, opts, &mut writer, progress);
    match &reason {
        StopReason::Fault(why) => loge!("Error while fetching data: {}", why),
        StopReason::PageChanged(_) => logw!("Stopped polling: {}", reason),
        StopReason::Cancelled => logw!("Stop requested, leaving the polling loop."),
        StopReason::DurationElapsed => logf!("Data fetching completed successfully."),
    }
    (reason, writer.rows())
}

fn close<B: Browser>(browser: &mut B) {
    logf!("Closing the browser session.");
    match browser.quit() {
        Ok(()) => logf!("Browser session closed successfully."),
        Err(e) => logw!("Browser session did not close cleanly: {}", e),
    }
}
