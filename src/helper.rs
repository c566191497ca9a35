//! Invocation of the external module-detection helper.
//!
//! The helper is run as an argument vector (never through a shell) with the
//! toolkit source tree and the example source appended as the last two
//! arguments. Its stdout is opaque text that goes into the build file as is.
//! Every kind of failure degrades to a block of CMake comments instead of
//! aborting generation.
//!
//! On unix the helper leads its own process group. The whole group is killed
//! once the helper exits or hits its deadline, so processes it started cannot
//! outlive the run or hold its output pipes open.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::code_writer::CodeWriter;
use crate::error::Result;

pub const DEFAULT_HELPER_PROGRAM: &str = "python3";
pub const DEFAULT_HELPER_SCRIPT: &str = "WhatModulesVTK.py";
pub const DEFAULT_HELPER_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(20);
/// Time left for the pipes to close once the process group is gone
const PIPE_GRACE: Duration = Duration::from_millis(500);

/// Why a helper run produced no usable module list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperFailure {
  /// The helper ran and exited unsuccessfully; `None` when killed by a signal
  Exited { code: Option<i32> },
  /// The helper could not be started or waited on
  Io(String),
  /// The helper was killed after exceeding its time limit
  TimedOut(Duration),
}

/// Result of one helper run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperOutcome {
  /// Captured stdout of a successful run
  Modules(String),
  Failed {
    /// Command line as displayed in the generated comment
    command: String,
    failure: HelperFailure,
    stdout: Vec<u8>,
    stderr: String,
  },
}

impl HelperOutcome {
  pub fn succeeded(&self) -> bool {
    matches!(self, HelperOutcome::Modules(_))
  }

  /// Text substituted for the module-list placeholder of the build file
  pub fn cmake_fragment(&self) -> Result<String> {
    match self {
      HelperOutcome::Modules(modules) => Ok(modules.clone()),
      HelperOutcome::Failed {
        command,
        failure,
        stderr,
        ..
      } => {
        let mut writer = CodeWriter::new(Vec::new());
        writer.write_comment(&format!("The following error occurred running {}", command))?;
        writer.write_comment(stderr)?;
        if let HelperFailure::TimedOut(limit) = failure {
          writer.write_comment(&format!("helper timed out after {}s", limit.as_secs()))?;
        }
        Ok(writer.into_string())
      }
    }
  }

  /// Dump everything captured from a failed run to the log
  pub fn log_failure(&self) {
    if let HelperOutcome::Failed {
      command,
      failure,
      stdout,
      stderr,
    } = self
    {
      error!(%command, ?failure, "module helper failed");
      if let HelperFailure::Exited { code } = failure {
        error!("returncode: {:?}", code);
      }
      error!(
        "Have {} bytes in stdout:\n{}",
        stdout.len(),
        String::from_utf8_lossy(stdout)
      );
      error!("Have {} bytes in stderr:\n{}", stderr.len(), stderr);
    }
  }
}

/// The external program reporting which toolkit modules an example uses
#[derive(Debug, Clone)]
pub struct ModuleHelper {
  program: String,
  args: Vec<String>,
  timeout: Duration,
}

impl ModuleHelper {
  /// Create a helper from a program and the arguments placed before the two paths
  pub fn new<I, S>(program: &str, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      program: program.to_string(),
      args: args.into_iter().map(Into::into).collect(),
      timeout: DEFAULT_HELPER_TIMEOUT,
    }
  }

  /// Set the time limit for one run
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }

  /// The command line a run would execute, for display only
  pub fn command_line(&self, vtk_source_path: &Path, source_path: &Path) -> String {
    let mut parts = vec![self.program.clone()];
    parts.extend(self.args.iter().cloned());
    parts.push(vtk_source_path.display().to_string());
    parts.push(source_path.display().to_string());
    parts.join(" ")
  }

  /// Run the helper for one example, blocking until it exits or times out
  pub fn run(&self, vtk_source_path: &Path, source_path: &Path) -> HelperOutcome {
    let command = self.command_line(vtk_source_path, source_path);
    debug!(%command, timeout_secs = self.timeout.as_secs(), "running module helper");

    let mut cmd = Command::new(&self.program);
    cmd
      .args(&self.args)
      .arg(vtk_source_path)
      .arg(source_path)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped());
    #[cfg(unix)]
    {
      use std::os::unix::process::CommandExt;
      cmd.process_group(0);
    }
    let deadline = Instant::now() + self.timeout;
    let spawned = cmd.spawn();
    let mut child = match spawned {
      Ok(child) => child,
      Err(e) => {
        return HelperOutcome::Failed {
          command,
          failure: HelperFailure::Io(e.to_string()),
          stdout: Vec::new(),
          stderr: e.to_string(),
        }
      }
    };

    // Both pipes are drained concurrently so a chatty helper cannot block on a full pipe
    let stdout_reader = drain(child.stdout.take());
    let stderr_reader = drain(child.stderr.take());
    let waited = wait_with_deadline(&mut child, deadline);
    kill_process_group(&child);
    let stdout = collect(&stdout_reader, deadline);
    let stderr = String::from_utf8_lossy(&collect(&stderr_reader, deadline)).into_owned();

    let failure = match waited {
      Ok(Some(status)) if status.success() => {
        debug!(bytes = stdout.len(), "module helper succeeded");
        return HelperOutcome::Modules(String::from_utf8_lossy(&stdout).into_owned());
      }
      Ok(Some(status)) => HelperFailure::Exited {
        code: status.code(),
      },
      Ok(None) => HelperFailure::TimedOut(self.timeout),
      Err(e) => HelperFailure::Io(e.to_string()),
    };
    HelperOutcome::Failed {
      command,
      failure,
      stdout,
      stderr,
    }
  }
}

impl Default for ModuleHelper {
  fn default() -> Self {
    Self::new(DEFAULT_HELPER_PROGRAM, [DEFAULT_HELPER_SCRIPT])
  }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<Vec<u8>> {
  let (tx, rx) = mpsc::channel();
  if let Some(mut pipe) = pipe {
    thread::spawn(move || {
      let mut buf = Vec::new();
      // A read error leaves whatever arrived before it
      let _ = pipe.read_to_end(&mut buf);
      let _ = tx.send(buf);
    });
  }
  rx
}

/// Output of a reader, or nothing if its pipe is still open past the deadline
fn collect(reader: &Receiver<Vec<u8>>, deadline: Instant) -> Vec<u8> {
  let wait = deadline
    .saturating_duration_since(Instant::now())
    .max(PIPE_GRACE);
  reader.recv_timeout(wait).unwrap_or_default()
}

/// Kill whatever is left of the helper's process group
fn kill_process_group(child: &Child) {
  #[cfg(unix)]
  {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    match killpg(Pid::from_raw(child.id() as i32), Signal::SIGKILL) {
      Ok(()) | Err(Errno::ESRCH) => {}
      Err(e) => debug!(error = %e, "killing helper process group failed"),
    }
  }
  #[cfg(not(unix))]
  let _ = child;
}

/// Wait for the child; `Ok(None)` means it was killed at the deadline
fn wait_with_deadline(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
  loop {
    if let Some(status) = child.try_wait()? {
      return Ok(Some(status));
    }
    if Instant::now() >= deadline {
      kill_process_group(child);
      // The child may exit between the poll and the kill
      if let Err(e) = child.kill() {
        debug!(error = %e, "kill after timeout failed");
      }
      child.wait()?;
      return Ok(None);
    }
    thread::sleep(POLL_INTERVAL);
  }
}
