// tests/supervisor.rs
//
// Dashboard core with a fake child process and a real log directory.
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use crash_scrape::config::options::DashboardOptions;
use crash_scrape::log::Severity;
use crash_scrape::supervisor::{
    ChildHandle, CommandLauncher, EndReason, Launch, Phase, Supervisor, SupervisorError,
};

/* ---------------- fake child ---------------- */

#[derive(Default)]
struct Tracker {
    launched: AtomicUsize,
    terminated: AtomicUsize,
    waited: AtomicUsize,
    alive: AtomicBool,
    exit: Mutex<Option<i32>>,
}

struct FakeChild {
    tracker: Arc<Tracker>,
}

impl ChildHandle for FakeChild {
    fn id(&self) -> u32 { 4242 }

    fn is_alive(&mut self) -> bool { self.tracker.alive.load(Ordering::SeqCst) }

    fn terminate(&mut self) -> Result<(), SupervisorError> {
        self.tracker.terminated.fetch_add(1, Ordering::SeqCst);
        self.tracker.alive.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn wait(&mut self) -> Result<Option<i32>, SupervisorError> {
        self.tracker.waited.fetch_add(1, Ordering::SeqCst);
        Ok(self.exit_code())
    }

    fn exit_code(&self) -> Option<i32> { *self.tracker.exit.lock().unwrap() }
}

struct FakeLauncher {
    tracker: Arc<Tracker>,
}

impl Launch for FakeLauncher {
    fn launch(&self) -> Result<Box<dyn ChildHandle>, SupervisorError> {
        self.tracker.launched.fetch_add(1, Ordering::SeqCst);
        self.tracker.alive.store(true, Ordering::SeqCst);
        Ok(Box::new(FakeChild { tracker: self.tracker.clone() }))
    }
}

fn supervisor(logs: &Path, duration: Duration) -> (Supervisor, Arc<Tracker>) {
    let tracker = Arc::new(Tracker::default());
    let opts = DashboardOptions {
        duration,
        logs_dir: logs.to_path_buf(),
        ..DashboardOptions::default()
    };
    let sup = Supervisor::new(opts, Box::new(FakeLauncher { tracker: tracker.clone() }));
    (sup, tracker)
}

fn line(level: &str, msg: &str) -> String {
    format!("2024-06-20 10:00:00,000 - crash_scraper - {level} - {msg}\n")
}

fn write_log(dir: &Path, name: &str, lines: &[String]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut f = File::create(&path).unwrap();
    for l in lines {
        f.write_all(l.as_bytes()).unwrap();
    }
    path
}

/* ---------------- tests ---------------- */

#[test]
fn error_line_terminates_child_and_blocks_start() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut sup, tracker) = supervisor(tmp.path(), Duration::from_secs(3600));

    sup.start().unwrap();
    assert_eq!(sup.state().phase, Phase::Running);
    assert!(!sup.state().can_start());

    write_log(tmp.path(), "log_a.txt", &[
        line("INFO", "Scraping will run for 3600 seconds."),
        line("ERROR", "Error in scraping process: boom"),
        line("INFO", "Closing the browser session."),
    ]);

    assert_eq!(sup.refresh(), Some(EndReason::LogError));
    assert_eq!(tracker.terminated.load(Ordering::SeqCst), 1);
    assert_eq!(tracker.waited.load(Ordering::SeqCst), 1);
    assert_eq!(sup.state().phase, Phase::Failed);
    assert!(sup.state().log.as_ref().is_some_and(|v| v.has_error));

    // Later ticks keep Start hidden.
    assert_eq!(sup.refresh(), None);
    assert!(!sup.state().can_start());
    assert!(matches!(sup.start(), Err(SupervisorError::Blocked)));
    assert_eq!(tracker.launched.load(Ordering::SeqCst), 1);

    // Stop is the reset.
    sup.stop();
    assert_eq!(sup.state().phase, Phase::Idle);
    assert!(sup.state().can_start());
    assert_eq!(sup.state().last_end, Some(EndReason::Manual));
    assert_eq!(tracker.terminated.load(Ordering::SeqCst), 1);
}

#[test]
fn duration_elapsed_completes_without_error() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut sup, tracker) = supervisor(tmp.path(), Duration::from_secs(10));

    sup.start().unwrap();
    let started = sup.state().started.unwrap();

    assert_eq!(sup.refresh_at(started + Duration::from_secs(4)), None);
    assert_eq!(sup.state().remaining, Duration::from_secs(6));
    assert!((sup.state().ratio - 0.4).abs() < 1e-6);

    assert_eq!(sup.refresh_at(started + Duration::from_secs(11)), Some(EndReason::Completed));
    assert_eq!(tracker.terminated.load(Ordering::SeqCst), 1);
    assert_eq!(sup.state().phase, Phase::Idle);
    assert_eq!(sup.state().ratio, 1.0);
    assert_eq!(sup.state().remaining, Duration::ZERO);
    assert!(sup.state().can_start());
}

#[test]
fn manual_stop_ends_a_running_session() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut sup, tracker) = supervisor(tmp.path(), Duration::from_secs(60));

    sup.start().unwrap();
    sup.stop();

    assert_eq!(tracker.terminated.load(Ordering::SeqCst), 1);
    assert_eq!(sup.state().phase, Phase::Idle);
    assert_eq!(sup.state().last_end, Some(EndReason::Manual));
    // Idle ticks do nothing.
    assert_eq!(sup.refresh(), None);
}

#[test]
fn second_start_while_running_is_refused() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut sup, tracker) = supervisor(tmp.path(), Duration::from_secs(60));

    sup.start().unwrap();
    assert!(matches!(sup.start(), Err(SupervisorError::AlreadyRunning)));
    assert_eq!(tracker.launched.load(Ordering::SeqCst), 1);
}

#[test]
fn child_exiting_on_its_own_returns_to_idle() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut sup, tracker) = supervisor(tmp.path(), Duration::from_secs(60));

    sup.start().unwrap();
    tracker.alive.store(false, Ordering::SeqCst);
    *tracker.exit.lock().unwrap() = Some(1);

    assert_eq!(sup.refresh(), Some(EndReason::Exited(Some(1))));
    assert_eq!(tracker.terminated.load(Ordering::SeqCst), 0);
    assert_eq!(sup.state().phase, Phase::Idle);
}

#[test]
fn stale_error_log_from_an_earlier_run_is_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    let old = write_log(tmp.path(), "log_old.txt", &[line("ERROR", "yesterday")]);
    let an_hour_ago = SystemTime::now() - Duration::from_secs(3600);
    File::options().write(true).open(&old).unwrap().set_modified(an_hour_ago).unwrap();

    let (mut sup, tracker) = supervisor(tmp.path(), Duration::from_secs(60));
    sup.start().unwrap();

    assert_eq!(sup.refresh(), None);
    assert_eq!(sup.state().phase, Phase::Running);
    assert!(sup.state().log.is_none());

    write_log(tmp.path(), "log_new.txt", &[line("INFO", "fresh")]);
    assert_eq!(sup.refresh(), None);
    let view = sup.state().log.as_ref().unwrap();
    assert!(view.path.ends_with("log_new.txt"));
    assert_eq!(view.lines[0].severity, Severity::Info);
    assert_eq!(tracker.terminated.load(Ordering::SeqCst), 0);
}

#[test]
fn viewer_keeps_only_the_newest_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let tracker = Arc::new(Tracker::default());
    let opts = DashboardOptions {
        duration: Duration::from_secs(60),
        logs_dir: tmp.path().to_path_buf(),
        max_log_lines: 3,
        ..DashboardOptions::default()
    };
    let mut sup = Supervisor::new(opts, Box::new(FakeLauncher { tracker }));
    sup.start().unwrap();

    let lines: Vec<String> = (0..10).map(|i| line("WARNING", &format!("w{i}"))).collect();
    write_log(tmp.path(), "log_x.txt", &lines);
    sup.refresh();

    let view = sup.state().log.as_ref().unwrap();
    assert_eq!(view.total, 10);
    assert_eq!(view.lines.len(), 3);
    assert!(view.lines[0].text.ends_with("w7"));
    assert!(view.lines.iter().all(|l| l.severity == Severity::Warning));
}

#[test]
fn non_log_files_are_not_read() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut sup, _tracker) = supervisor(tmp.path(), Duration::from_secs(60));
    sup.start().unwrap();

    fs::write(tmp.path().join("notes.md"), line("ERROR", "not a log")).unwrap();

    assert_eq!(sup.refresh(), None);
    assert_eq!(sup.state().phase, Phase::Running);
}

#[test]
fn failed_spawn_leaves_the_dashboard_idle() {
    let tmp = tempfile::tempdir().unwrap();
    let opts = DashboardOptions {
        logs_dir: tmp.path().to_path_buf(),
        ..DashboardOptions::default()
    };
    let mut sup = Supervisor::new(opts, Box::new(CommandLauncher::new("/definitely/not/a/scraper")));

    assert!(matches!(sup.start(), Err(SupervisorError::Spawn { .. })));
    assert_eq!(sup.state().phase, Phase::Idle);
    assert!(sup.state().can_start());
}
