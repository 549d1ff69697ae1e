// src/types.rs

use std::path::PathBuf;

use crate::pidfile::PidFileData;
use crate::probe::ProcessHit;

/// Result of an `up` invocation.
///
/// - `AlreadyRunning`: the probe found one or more matching processes before
///   anything was spawned.
/// - `Started`: a process was spawned and became visible within the startup
///   deadline. The pid is the one *observed* by the re-probe, not the one
///   returned by the spawn call.
/// - `LaunchInProgress`: another invocation holds the pid-file lock and its
///   owner is still alive, i.e. a concurrent launch is mid-flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    AlreadyRunning { pids: Vec<u32> },
    Started { pid: u32, log_path: PathBuf },
    LaunchInProgress { holder: Option<u32> },
}

/// Result of a `down` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownOutcome {
    /// No matching process and no live pid file.
    NotRunning,
    /// Process exited after SIGTERM.
    Stopped { pid: u32 },
    /// Process ignored SIGTERM and was SIGKILLed after the deadline.
    Killed { pid: u32 },
}

/// Snapshot reported by `status`: live probe hits plus whatever the pid file
/// claims (the two can disagree, e.g. after a crash).
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub hits: Vec<ProcessHit>,
    pub pid_file: Option<PidFileData>,
}

impl StatusReport {
    pub fn is_running(&self) -> bool {
        !self.hits.is_empty()
    }
}
