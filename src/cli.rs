// src/cli.rs
//
// Command line + environment for both binaries. Every value has a default,
// so both programs also start with no arguments at all.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, builder::FalseyValueParser};

use crate::config::{
    consts::{DEFAULT_DURATION_SECS, DEFAULT_OUT_DIR, DEFAULT_WEBDRIVER_URL, LOG_SUBDIR},
    options::{DashboardOptions, ScrapeOptions, WebDriverOptions, default_scraper_path},
};

#[derive(Debug, Parser)]
#[command(name = "crash_scraper", version, about = "Timed crash-game scraper (CSV + session log)")]
pub struct ScraperArgs {
    /// Session length in seconds
    #[arg(long, env = "SCRAPING_DURATION", default_value_t = DEFAULT_DURATION_SECS)]
    pub duration: u64,

    /// WebDriver server (chromedriver) URL
    #[arg(long, env = "WEBDRIVER_URL", default_value = DEFAULT_WEBDRIVER_URL)]
    pub webdriver: String,

    /// Run the browser without a window
    #[arg(long, env = "SCRAPER_HEADLESS", value_parser = FalseyValueParser::new())]
    pub headless: bool,

    /// Root for the CSV and the logs/ folder
    #[arg(long, env = "SCRAPER_OUT_DIR", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,
}

impl ScraperArgs {
    pub fn into_options(self) -> ScrapeOptions {
        ScrapeOptions {
            duration: Duration::from_secs(self.duration),
            out_dir: self.out_dir,
            webdriver: WebDriverOptions {
                server_url: self.webdriver,
                headless: self.headless,
                ..WebDriverOptions::default()
            },
            ..ScrapeOptions::default()
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "crash_dashboard", version, about = "Start, watch and stop scraping sessions")]
pub struct DashboardArgs {
    /// Session length in seconds, passed on to the scraper
    #[arg(long, env = "SCRAPING_DURATION", default_value_t = DEFAULT_DURATION_SECS)]
    pub duration: u64,

    /// Scraper output root; forwarded to the scraper, logs are watched under `<out-dir>/logs`
    #[arg(long, env = "SCRAPER_OUT_DIR", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Watch this folder instead of `<out-dir>/logs`
    #[arg(long)]
    pub logs_dir: Option<PathBuf>,

    /// Scraper executable (default: crash_scraper next to this program)
    #[arg(long)]
    pub scraper: Option<PathBuf>,
}

impl DashboardArgs {
    pub fn into_options(self) -> DashboardOptions {
        let logs_dir = self.logs_dir.unwrap_or_else(|| self.out_dir.join(LOG_SUBDIR));
        DashboardOptions {
            duration: Duration::from_secs(self.duration),
            out_dir: self.out_dir,
            logs_dir,
            scraper: self.scraper.unwrap_or_else(default_scraper_path),
            ..DashboardOptions::default()
        }
    }
}
