// src/config/consts.rs
use chrono_tz::Tz;

// Target site
pub const LANDING_URL: &str = "https://1xbet.com/en/allgamesentrance/crash";
pub const SITE_ORIGIN: &str = "https://1xbet.com";
pub const GAME_FRAME_SELECTOR: &str = "iframe.games-project-frame__item";
pub const GAME_FRAME_ATTR: &str = "src";

// Page readiness: at least one of these must exist before a read
pub const MARKER_SELECTOR: &str = "svg";

// Field selectors, in CSV column order
pub const FIELD_MULTIPLIER: &str = "text.crash-game__counter[font-size='83'][x='1160'][y='356']";
pub const FIELD_BETS: &str = "span.crash-total__value.crash-total__value--bets.crash-text";
pub const FIELD_PRIZE: &str = "span.crash-total__value.crash-total__value--prize.crash-text";
pub const FIELD_PLAYERS: &str = "span.crash-total__value.crash-total__value--players.crash-text";

// CSV
pub const CSV_HEADER: [&str; 5] = ["Timestamp", "Value X", "Value Bets", "Value Prize", "Value Players"];
pub const CSV_SEP: char = ',';

// Time
pub const TIMEZONE: Tz = chrono_tz::Africa::Casablanca;
pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";
pub const FILE_STAMP_FMT: &str = "%Y-%m-%d_%H_%M_%S";

// Output layout
pub const DEFAULT_OUT_DIR: &str = ".";
pub const LOG_SUBDIR: &str = "logs";
pub const LIVE_PREDICTION_DIR: &str = "pipeline_ml/live_predictor/live_prediction";
pub const CSV_PREFIX: &str = "data_brute";
pub const LOG_PREFIX: &str = "log";
pub const LOG_EXT: &str = "txt";

// Logging defaults, overridden by RUST_LOG. The session log only takes our own targets.
pub const SESSION_LOG_FILTER: &str = "crash_scrape=info,crash_scraper=info";
pub const CONSOLE_LOG_FILTER: &str = "warn,crash_scrape=info,crash_scraper=info";

// Session
pub const DEFAULT_DURATION_SECS: u64 = 60 * 60;
pub const SCRAPER_LOG_NAME: &str = "crash_scraper";
pub const SCRAPER_BIN: &str = "crash_scraper";

// WebDriver
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515"; // chromedriver default port
pub const WINDOW_W: u32 = 1920;
pub const WINDOW_H: u32 = 1080;
pub const BROWSER_LANG: &str = "fr-FR";

// Dashboard
pub const MAX_LOG_LINES: usize = 500;
pub const REFRESH_EVERY_MS: u64 = 1_000;
