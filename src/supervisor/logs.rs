// src/supervisor/logs.rs
//
// Whole-file re-read of the newest scraper log on every tick. No offsets kept.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use chrono::DateTime;
use chrono_tz::Tz;

use crate::config::consts::LOG_EXT;
use crate::file::now_local;
use crate::log::{Severity, is_error_line};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub text: String,
    pub severity: Severity,
}

/// What the viewer shows for one tick.
#[derive(Clone, Debug)]
pub struct LogView {
    pub path: PathBuf,
    /// Tail of the file, at most the configured cap.
    pub lines: Vec<LogLine>,
    /// Line count of the whole file.
    pub total: usize,
    /// Error marker anywhere in the file, not just in the tail.
    pub has_error: bool,
    pub read_at: DateTime<Tz>,
}

impl LogView {
    pub fn from_text(path: PathBuf, text: &str, cap: usize) -> Self {
        let all: Vec<&str> = text.lines().collect();
        let has_error = all.iter().any(|l| is_error_line(l));
        let skip = all.len().saturating_sub(cap);
        let lines = all[skip..]
            .iter()
            .map(|l| LogLine { text: s!(l.trim_end()), severity: Severity::classify(l) })
            .collect();

        Self { path, lines, total: all.len(), has_error, read_at: now_local() }
    }

    pub fn is_empty(&self) -> bool { self.total == 0 }
}

/// Newest `*.txt` in `dir` by modification time. With `since`, older files are ignored.
pub fn most_recent_log(dir: &Path, since: Option<SystemTime>) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }
    let pattern = format!("{}/*.{LOG_EXT}", glob::Pattern::escape(&dir.to_string_lossy()));

    let entries = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => {
            logw!("Logs: bad pattern {}: {}", pattern, e);
            return None;
        }
    };

    entries
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .filter_map(|p| {
            let mtime = fs::metadata(&p).and_then(|m| m.modified()).ok()?;
            Some((p, mtime))
        })
        .filter(|(_, mtime)| since.is_none_or(|s| *mtime >= s))
        .max_by_key(|(_, mtime)| *mtime)
        .map(|(p, _)| p)
}

/// Find and read the newest log. `Ok(None)` when there is nothing to read yet.
pub fn read_latest(dir: &Path, since: Option<SystemTime>, cap: usize) -> io::Result<Option<LogView>> {
    let Some(path) = most_recent_log(dir, since) else {
        return Ok(None);
    };
    let bytes = fs::read(&path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(Some(LogView::from_text(path, &text, cap)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(level: &str, msg: &str) -> String {
        format!("2024-06-20 10:00:00,000 - crash_scraper - {level} - {msg}")
    }

    #[test]
    fn tail_is_capped_but_error_scan_is_not() {
        let mut text = line("ERROR", "early failure");
        text.push('\n');
        for i in 0..20 {
            text.push_str(&line("INFO", &format!("row {i}")));
            text.push('\n');
        }
        let v = LogView::from_text(PathBuf::from("x.txt"), &text, 5);
        assert_eq!(v.total, 21);
        assert_eq!(v.lines.len(), 5);
        assert!(v.has_error);
        assert!(v.lines.iter().all(|l| l.severity == Severity::Info));
        assert!(v.lines.last().unwrap().text.ends_with("row 19"));
    }

    #[test]
    fn empty_text_is_empty_view() {
        let v = LogView::from_text(PathBuf::from("x.txt"), "", 500);
        assert!(v.is_empty());
        assert!(!v.has_error);
    }

    #[test]
    fn missing_dir_has_no_log() {
        assert!(most_recent_log(Path::new("/definitely/not/here"), None).is_none());
    }
}
