// src/supervisor/child.rs
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};

use super::SupervisorError;

/// A spawned scraper as the supervisor sees it.
pub trait ChildHandle {
    fn id(&self) -> u32;

    /// Non-blocking liveness poll. Records the exit status once the child is gone.
    fn is_alive(&mut self) -> bool;

    /// Ask the child to stop. Cooperative: no kill escalation.
    fn terminate(&mut self) -> Result<(), SupervisorError>;

    /// Block until the child exits; returns its exit code if it has one.
    fn wait(&mut self) -> Result<Option<i32>, SupervisorError>;

    /// Exit code, once known. `None` while running or when ended by a signal.
    fn exit_code(&self) -> Option<i32>;
}

/// Starts children. The dashboard uses [`CommandLauncher`]; tests substitute their own.
pub trait Launch {
    fn launch(&self) -> Result<Box<dyn ChildHandle>, SupervisorError>;
}

/* ---------------- std::process implementation ---------------- */

pub struct ProcessChild {
    child: Child,
    status: Option<ExitStatus>,
}

impl ProcessChild {
    pub fn spawn(cmd: &mut Command) -> std::io::Result<Self> {
        let child = cmd.spawn()?;
        Ok(Self { child, status: None })
    }
}

impl ChildHandle for ProcessChild {
    fn id(&self) -> u32 { self.child.id() }

    fn is_alive(&mut self) -> bool {
        if self.status.is_some() {
            return false;
        }
        match self.child.try_wait() {
            Ok(Some(status)) => {
                self.status = Some(status);
                false
            }
            Ok(None) => true,
            Err(e) => {
                logw!("Child {}: status poll failed: {}", self.child.id(), e);
                false
            }
        }
    }

    #[cfg(unix)]
    fn terminate(&mut self) -> Result<(), SupervisorError> {
        use nix::errno::Errno;
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        if self.status.is_some() {
            return Ok(());
        }
        let pid = self.child.id();
        match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(e) => Err(SupervisorError::Signal { pid, message: e.to_string() }),
        }
    }

    #[cfg(not(unix))]
    fn terminate(&mut self) -> Result<(), SupervisorError> {
        if self.status.is_some() {
            return Ok(());
        }
        let pid = self.child.id();
        self.child
            .kill()
            .map_err(|e| SupervisorError::Signal { pid, message: e.to_string() })
    }

    fn wait(&mut self) -> Result<Option<i32>, SupervisorError> {
        let status = match self.status {
            Some(s) => s,
            None => {
                let s = self.child.wait()?;
                self.status = Some(s);
                s
            }
        };
        Ok(status.code())
    }

    fn exit_code(&self) -> Option<i32> {
        self.status.and_then(|s| s.code())
    }
}

/// Runs the scraper executable with no arguments. The session length travels
/// through the environment, the same way an operator would set it.
pub struct CommandLauncher {
    pub program: PathBuf,
    pub env: Vec<(OsString, OsString)>,
}

impl CommandLauncher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), env: Vec::new() }
    }

    pub fn env(mut self, key: impl Into<OsString>, val: impl Into<OsString>) -> Self {
        self.env.push((key.into(), val.into()));
        self
    }
}

impl Launch for CommandLauncher {
    fn launch(&self) -> Result<Box<dyn ChildHandle>, SupervisorError> {
        let mut cmd = Command::new(&self.program);
        cmd.stdin(Stdio::null());
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        let child = ProcessChild::spawn(&mut cmd).map_err(|source| SupervisorError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;
        logf!("Spawned {} (pid {})", self.program.display(), child.id());
        Ok(Box::new(child))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn terminate_then_wait_reaps_a_real_process() {
        let mut child = ProcessChild::spawn(
            Command::new("sleep").arg("30").stdout(Stdio::null()).stderr(Stdio::null()),
        )
        .expect("spawn sleep");

        assert!(child.is_alive());
        assert_eq!(child.exit_code(), None);

        let t0 = Instant::now();
        child.terminate().unwrap();
        let code = child.wait().unwrap();

        assert!(t0.elapsed() < Duration::from_secs(10));
        assert!(!child.is_alive());
        // Ended by SIGTERM: no exit code.
        assert_eq!(code, None);
    }

    #[test]
    fn exit_code_is_recorded_by_poll() {
        let mut child = ProcessChild::spawn(&mut Command::new("false")).expect("spawn false");
        let code = child.wait().unwrap();
        assert_eq!(code, Some(1));
        assert!(!child.is_alive());
        assert_eq!(child.exit_code(), Some(1));
        // Terminating an already-reaped child is not an error.
        assert!(child.terminate().is_ok());
    }

    #[test]
    fn launcher_reports_missing_program() {
        let launcher = CommandLauncher::new("/definitely/not/a/scraper");
        match launcher.launch() {
            Err(SupervisorError::Spawn { program, .. }) => assert!(program.contains("not/a/scraper")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("spawn should fail"),
        }
    }
}
