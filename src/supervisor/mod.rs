// src/supervisor/mod.rs
//! Dashboard core, no UI.
//!
//! [`Supervisor`] exclusively owns the [`SessionState`] and the child handle.
//! The GUI reads the state by reference and acts only through `start`, `stop`
//! and `refresh`.

mod child;
mod logs;

use std::io;
use std::time::{Duration, Instant, SystemTime};

use thiserror::Error;

use crate::config::options::DashboardOptions;

pub use child::{ChildHandle, CommandLauncher, Launch, ProcessChild};
pub use logs::{LogLine, LogView, most_recent_log, read_latest};

/// Slack for coarse filesystem timestamps when matching a log to a session.
const MTIME_SLACK: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to signal pid {pid}: {message}")]
    Signal { pid: u32, message: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("a scraping session is already running")]
    AlreadyRunning,

    #[error("last session stopped on an error; press Stop to reset")]
    Blocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    /// Error marker seen. Start stays unavailable until Stop resets.
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    Manual,
    Completed,
    LogError,
    /// Child went away on its own before the budget ran out.
    Exited(Option<i32>),
}

impl EndReason {
    pub fn message(&self) -> String {
        match self {
            EndReason::Manual => s!("Stopped manually by user."),
            EndReason::Completed => s!("Duration reached, scraping completed."),
            EndReason::LogError => s!("Scraping stopped due to an ERROR in logs."),
            EndReason::Exited(Some(code)) => format!("Scraper exited on its own (code {code})."),
            EndReason::Exited(None) => s!("Scraper exited on its own."),
        }
    }
}

/// Everything the dashboard renders. Written only by [`Supervisor`].
#[derive(Clone, Debug)]
pub struct SessionState {
    pub phase: Phase,
    pub started: Option<Instant>,
    started_wall: Option<SystemTime>,
    pub elapsed: Duration,
    pub remaining: Duration,
    /// `elapsed / duration`, clamped to 1.
    pub ratio: f32,
    pub log: Option<LogView>,
    pub last_end: Option<EndReason>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            started: None,
            started_wall: None,
            elapsed: Duration::ZERO,
            remaining: Duration::ZERO,
            ratio: 0.0,
            log: None,
            last_end: None,
        }
    }
}

impl SessionState {
    pub fn can_start(&self) -> bool { self.phase == Phase::Idle }

    pub fn is_running(&self) -> bool { self.phase == Phase::Running }

    pub fn is_failed(&self) -> bool { self.phase == Phase::Failed }
}

/// The scraper takes no arguments; duration and output root travel in its environment.
pub fn scraper_launcher(opts: &DashboardOptions) -> CommandLauncher {
    CommandLauncher::new(opts.scraper.clone())
        .env("SCRAPING_DURATION", opts.duration.as_secs().to_string())
        .env("SCRAPER_OUT_DIR", opts.out_dir.as_os_str())
}

pub struct Supervisor {
    opts: DashboardOptions,
    launcher: Box<dyn Launch>,
    child: Option<Box<dyn ChildHandle>>,
    state: SessionState,
}

impl Supervisor {
    pub fn new(opts: DashboardOptions, launcher: Box<dyn Launch>) -> Self {
        Self { opts, launcher, child: None, state: SessionState::default() }
    }

    /// Launches the configured scraper executable.
    pub fn with_command(opts: DashboardOptions) -> Self {
        let launcher = scraper_launcher(&opts);
        Self::new(opts, Box::new(launcher))
    }

    pub fn state(&self) -> &SessionState { &self.state }

    pub fn options(&self) -> &DashboardOptions { &self.opts }

    pub fn start(&mut self) -> Result<(), SupervisorError> {
        match self.state.phase {
            Phase::Running => return Err(SupervisorError::AlreadyRunning),
            Phase::Failed => return Err(SupervisorError::Blocked),
            Phase::Idle => {}
        }

        let child = self.launcher.launch()?;
        logf!("Session: started pid={} for {}s", child.id(), self.opts.duration.as_secs());

        self.child = Some(child);
        self.state = SessionState {
            phase: Phase::Running,
            started: Some(Instant::now()),
            started_wall: Some(SystemTime::now()),
            remaining: self.opts.duration,
            ..SessionState::default()
        };
        Ok(())
    }

    /// Manual stop. Always ends the child and clears running/error state.
    pub fn stop(&mut self) {
        self.end(EndReason::Manual);
    }

    pub fn refresh(&mut self) -> Option<EndReason> {
        self.refresh_at(Instant::now())
    }

    /// One dashboard tick at `now`. Returns the reason if the session ended on this tick.
    pub fn refresh_at(&mut self, now: Instant) -> Option<EndReason> {
        if self.state.phase != Phase::Running {
            return None;
        }
        let Some(started) = self.state.started else {
            return None;
        };

        let elapsed = now.saturating_duration_since(started);
        let duration = self.opts.duration;
        self.state.elapsed = elapsed;
        self.state.remaining = duration.saturating_sub(elapsed);
        self.state.ratio = if duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0) as f32
        };

        let since = self
            .state
            .started_wall
            .map(|t| t.checked_sub(MTIME_SLACK).unwrap_or(t));
        match read_latest(&self.opts.logs_dir, since, self.opts.max_log_lines) {
            Ok(Some(view)) => {
                let has_error = view.has_error;
                self.state.log = Some(view);
                if has_error {
                    return Some(self.end(EndReason::LogError));
                }
            }
            Ok(None) => {}
            Err(e) => logw!("Logs: read failed: {}", e),
        }

        if elapsed >= duration {
            return Some(self.end(EndReason::Completed));
        }

        if let Some(child) = self.child.as_mut() {
            if !child.is_alive() {
                let code = child.exit_code();
                return Some(self.end(EndReason::Exited(code)));
            }
        }
        None
    }

    fn end(&mut self, reason: EndReason) -> EndReason {
        if let Some(mut child) = self.child.take() {
            if child.is_alive() {
                logf!("Session: terminating pid={} ({:?})", child.id(), reason);
                if let Err(e) = child.terminate() {
                    logw!("Session: {}", e);
                }
            }
            match child.wait() {
                Ok(code) => logd!("Session: pid={} exited with {:?}", child.id(), code),
                Err(e) => logw!("Session: wait failed: {}", e),
            }
        }

        self.state.phase = match reason {
            EndReason::LogError => Phase::Failed,
            _ => Phase::Idle,
        };
        self.state.started = None;
        self.state.started_wall = None;
        self.state.last_end = Some(reason.clone());
        logf!("Session: {}", reason.message());
        reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::path::PathBuf;

    #[test]
    fn launcher_forwards_duration_and_output_root() {
        let opts = DashboardOptions {
            duration: Duration::from_secs(90),
            out_dir: PathBuf::from("/data/crash"),
            scraper: PathBuf::from("/opt/bin/crash_scraper"),
            ..DashboardOptions::default()
        };
        let l = scraper_launcher(&opts);
        assert_eq!(l.program, PathBuf::from("/opt/bin/crash_scraper"));
        assert!(l.env.contains(&(OsString::from("SCRAPING_DURATION"), OsString::from("90"))));
        assert!(l.env.contains(&(OsString::from("SCRAPER_OUT_DIR"), OsString::from("/data/crash"))));
    }
}
