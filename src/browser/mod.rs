// src/browser/mod.rs
//! Blocking browser seam.
//!
//! The scraper only ever needs five things from a browser: load a page, check
//! whether a selector matches, read an attribute or the text of the first
//! match, and shut down. Keeping that behind a small synchronous trait lets
//! the session logic run against the real WebDriver client in production and
//! against scripted pages in tests. Bounded waits are built on top of
//! `exists` by [`crate::scrape::Session::wait_for`], which also watches the
//! stop flag.

mod webdriver;

use std::time::Duration;

use thiserror::Error;

pub use webdriver::WebDriverBrowser;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("no element matches `{0}`")]
    NotFound(String),

    #[error("timed out after {after:?} waiting for `{selector}`")]
    Timeout { selector: String, after: Duration },

    #[error("webdriver: {0}")]
    Driver(String),

    /// Stop requested while waiting.
    #[error("stop requested")]
    Cancelled,
}

impl BrowserError {
    /// Lookup failures (absent or never appeared), as opposed to driver faults.
    pub fn is_lookup(&self) -> bool {
        matches!(self, BrowserError::NotFound(_) | BrowserError::Timeout { .. })
    }
}

/// Every call blocks the caller until it completes or times out.
pub trait Browser {
    fn goto(&mut self, url: &str) -> Result<(), BrowserError>;

    /// One lookup, no waiting: does at least one element match `selector` now?
    fn exists(&mut self, selector: &str) -> Result<bool, BrowserError>;

    /// Attribute of the first match. `Ok(None)` when the element exists but the
    /// attribute does not.
    fn attr(&mut self, selector: &str, name: &str) -> Result<Option<String>, BrowserError>;

    /// Rendered text of the first match.
    fn text(&mut self, selector: &str) -> Result<String, BrowserError>;

    /// Release the session. Calling it twice is a no-op.
    fn quit(&mut self) -> Result<(), BrowserError>;
}
