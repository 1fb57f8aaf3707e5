// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

/* ---------------- Scraper side ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Wall-clock budget for the whole session, counted from session start.
    pub duration: Duration,
    /// Route CSV + log under the live-prediction tree instead of the working root.
    /// Internal switch; never exposed on the command line.
    pub live_prediction: bool,
    pub out_dir: PathBuf,
    /// Consecutive cycles with a missing field before the page is considered changed.
    pub max_missing_cycles: u32,
    pub timing: Timing,
    pub webdriver: WebDriverOptions,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(DEFAULT_DURATION_SECS),
            live_prediction: false,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            max_missing_cycles: 10,
            timing: Timing::default(),
            webdriver: WebDriverOptions::default(),
        }
    }
}

/// Every sleep and bounded wait the scraper performs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timing {
    pub frame_wait: Duration,
    pub frame_retry_wait: Duration,
    pub retry_backoff: Duration,
    pub reload_settle: Duration,
    pub page_settle: Duration,
    pub marker_wait: Duration,
    pub empty_pause: Duration,
    pub row_pause: Duration,
    /// Poll step for bounded waits and interruptible pauses.
    pub poll_step: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            frame_wait: Duration::from_secs(30),
            frame_retry_wait: Duration::from_secs(10),
            retry_backoff: Duration::from_secs(2),
            reload_settle: Duration::from_secs(5),
            page_settle: Duration::from_secs(5),
            marker_wait: Duration::from_secs(30),
            empty_pause: Duration::from_secs(3),
            row_pause: Duration::from_millis(800),
            poll_step: Duration::from_millis(100),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebDriverOptions {
    pub server_url: String,
    pub headless: bool,
    pub window_w: u32,
    pub window_h: u32,
    pub lang: String,
}

impl Default for WebDriverOptions {
    fn default() -> Self {
        Self {
            server_url: s!(DEFAULT_WEBDRIVER_URL),
            headless: false,
            window_w: WINDOW_W,
            window_h: WINDOW_H,
            lang: s!(BROWSER_LANG),
        }
    }
}

impl WebDriverOptions {
    /// Chrome command-line switches for a session.
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--window-size={},{}", self.window_w, self.window_h),
            format!("--lang={}", self.lang),
            s!("--incognito"),
            s!("--no-sandbox"),
            s!("--disable-dev-shm-usage"),
            s!("--disable-gpu"),
        ];
        if self.headless {
            args.push(s!("--headless=new"));
        }
        args
    }
}

/* ---------------- Dashboard side ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardOptions {
    pub duration: Duration,
    /// Scraper output root, handed to the child as `SCRAPER_OUT_DIR`.
    pub out_dir: PathBuf,
    pub logs_dir: PathBuf,
    /// Scraper executable; started with no arguments.
    pub scraper: PathBuf,
    pub max_log_lines: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(DEFAULT_DURATION_SECS),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            logs_dir: PathBuf::from(DEFAULT_OUT_DIR).join(LOG_SUBDIR),
            scraper: default_scraper_path(),
            max_log_lines: MAX_LOG_LINES,
        }
    }
}

/// `crash_scraper` next to the running executable, else whatever is on PATH.
pub fn default_scraper_path() -> PathBuf {
    let file = format!("{}{}", SCRAPER_BIN, std::env::consts::EXE_SUFFIX);
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&file)))
        .filter(|p| p.is_file())
        .unwrap_or_else(|| PathBuf::from(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_switch_is_opt_in() {
        let mut wd = WebDriverOptions::default();
        assert!(!wd.chrome_args().iter().any(|a| a.starts_with("--headless")));
        wd.headless = true;
        assert!(wd.chrome_args().iter().any(|a| a.starts_with("--headless")));
    }

    #[test]
    fn window_size_and_lang_are_forwarded() {
        let wd = WebDriverOptions { window_w: 800, window_h: 600, ..WebDriverOptions::default() };
        let args = wd.chrome_args();
        assert!(args.contains(&s!("--window-size=800,600")));
        assert!(args.contains(&s!("--lang=fr-FR")));
    }

    #[test]
    fn defaults_match_documented_session() {
        let o = ScrapeOptions::default();
        assert_eq!(o.duration, Duration::from_secs(3600));
        assert!(!o.live_prediction);
        assert_eq!(o.timing.row_pause, Duration::from_millis(800));
        assert_eq!(DashboardOptions::default().max_log_lines, 500);
    }
}
