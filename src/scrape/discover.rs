// src/scrape/discover.rs
//
// Landing page → game iframe → absolute game URL. One retry, then give up.

use std::time::Duration;

use crate::{
    browser::{Browser, BrowserError},
    config::{
        consts::{GAME_FRAME_ATTR, GAME_FRAME_SELECTOR, LANDING_URL, SITE_ORIGIN},
        options::Timing,
    },
};

use super::{ScrapeError, Session};

pub const DISCOVERY_ATTEMPTS: u32 = 2;

/// Resolve the game URL from the landing page.
///
/// The first lookup failure (frame absent, timed out, or without `src`) earns
/// one reload and a shorter wait. Driver faults are returned as-is. A stop
/// request at any point ends discovery with [`ScrapeError::Cancelled`].
pub fn discover_url<B: Browser>(
    browser: &mut B,
    timing: &Timing,
    session: &Session,
) -> Result<String, ScrapeError> {
    if session.cancelled() {
        return Err(ScrapeError::Cancelled);
    }
    logf!("Searching for the crash game URL.");

    let first = browser
        .goto(LANDING_URL)
        .and_then(|_| read_frame_src(browser, session, timing, timing.frame_wait));

    let err = match first {
        Ok(url) => {
            logf!("Found crash game URL: {}", url);
            return Ok(url);
        }
        Err(BrowserError::Cancelled) => return Err(ScrapeError::Cancelled),
        Err(e) if e.is_lookup() => e,
        Err(e) => return Err(e.into()),
    };

    logw!("Encountered an issue loading {}, retrying: {}", LANDING_URL, err);
    if !session.pause(timing.retry_backoff, timing.poll_step) {
        return Err(ScrapeError::Cancelled);
    }
    browser.goto(LANDING_URL)?;
    if !session.pause(timing.reload_settle, timing.poll_step) {
        return Err(ScrapeError::Cancelled);
    }

    match read_frame_src(browser, session, timing, timing.frame_retry_wait) {
        Ok(url) => {
            logf!("Found crash game URL on retry: {}", url);
            Ok(url)
        }
        Err(BrowserError::Cancelled) => Err(ScrapeError::Cancelled),
        Err(e) if e.is_lookup() => Err(ScrapeError::UrlNotFound {
            attempts: DISCOVERY_ATTEMPTS,
            last: e,
        }),
        Err(e) => Err(e.into()),
    }
}

fn read_frame_src<B: Browser>(
    browser: &mut B,
    session: &Session,
    timing: &Timing,
    wait: Duration,
) -> Result<String, BrowserError> {
    session.wait_for(browser, GAME_FRAME_SELECTOR, wait, timing.poll_step)?;
    match browser.attr(GAME_FRAME_SELECTOR, GAME_FRAME_ATTR)? {
        Some(src) if !src.trim().is_empty() => Ok(resolve_frame_src(src.trim())),
        _ => Err(BrowserError::NotFound(format!("{GAME_FRAME_SELECTOR}[{GAME_FRAME_ATTR}]"))),
    }
}

/// Origin-relative `src` gets the site origin; protocol-relative gets https.
pub fn resolve_frame_src(src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{src}")
    } else if src.starts_with('/') {
        format!("{SITE_ORIGIN}{src}")
    } else {
        s!(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_frame_src_variants() {
        assert_eq!(resolve_frame_src("/games-frame/crash?x=1"), "https://1xbet.com/games-frame/crash?x=1");
        assert_eq!(resolve_frame_src("//cdn.example.com/g"), "https://cdn.example.com/g");
        assert_eq!(resolve_frame_src("https://other.site/g"), "https://other.site/g");
    }
}
