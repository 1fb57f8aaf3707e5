// src/file.rs

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;

use crate::config::consts::*;

/// Current wall-clock time in the session timezone.
pub fn now_local() -> DateTime<Tz> {
    Utc::now().with_timezone(&TIMEZONE)
}

/// `YYYY-MM-DD HH:MM:SS`, as written in the CSV Timestamp column.
pub fn timestamp(t: &DateTime<Tz>) -> String {
    t.format(TIMESTAMP_FMT).to_string()
}

/// Filesystem-safe variant: `YYYY-MM-DD_HH_MM_SS`.
pub fn file_stamp(t: &DateTime<Tz>) -> String {
    t.format(FILE_STAMP_FMT).to_string()
}

/// Where one scraping session writes. Both names encode start and planned end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionPaths {
    pub csv: PathBuf,
    pub log: PathBuf,
}

impl SessionPaths {
    pub fn new(root: &Path, start: &DateTime<Tz>, duration: Duration, live_prediction: bool) -> Self {
        let end = TimeDelta::from_std(duration)
            .ok()
            .and_then(|d| start.checked_add_signed(d))
            .unwrap_or(*start);
        let span = format!("{}_to_{}", file_stamp(start), file_stamp(&end));

        let base = if live_prediction {
            root.join(LIVE_PREDICTION_DIR)
        } else {
            root.to_path_buf()
        };

        Self {
            csv: base.join(format!("{CSV_PREFIX}_{span}.csv")),
            log: base.join(LOG_SUBDIR).join(format!("{LOG_PREFIX}_{span}.{LOG_EXT}")),
        }
    }
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Create the parent of `path` if it has one.
pub fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Tz> {
        TIMEZONE.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn stamps_have_no_colons() {
        let t = at(2024, 3, 9, 7, 5, 1);
        assert_eq!(timestamp(&t), "2024-03-09 07:05:01");
        assert_eq!(file_stamp(&t), "2024-03-09_07_05_01");
    }

    #[test]
    fn session_names_span_start_to_end() {
        let t = at(2024, 6, 20, 23, 30, 0);
        let p = SessionPaths::new(Path::new("."), &t, Duration::from_secs(3600), false);
        assert_eq!(
            p.csv,
            Path::new(".").join("data_brute_2024-06-20_23_30_00_to_2024-06-21_00_30_00.csv")
        );
        assert_eq!(
            p.log,
            Path::new(".").join("logs").join("log_2024-06-20_23_30_00_to_2024-06-21_00_30_00.txt")
        );
    }

    #[test]
    fn live_prediction_reroutes_both_files() {
        let t = at(2024, 1, 1, 0, 0, 0);
        let p = SessionPaths::new(Path::new("/tmp/x"), &t, Duration::from_secs(60), true);
        let base = Path::new("/tmp/x").join(LIVE_PREDICTION_DIR);
        assert!(p.csv.starts_with(&base));
        assert!(p.log.starts_with(base.join("logs")));
        assert!(p.log.to_string_lossy().ends_with("_to_2024-01-01_00_01_00.txt"));
    }
}
