// src/readiness.rs

//! Startup readiness polling.
//!
//! Replaces the classic "sleep 2 and hope" pattern: after spawning, the
//! launcher re-probes the process table every `poll_interval` until `timeout`
//! expires. When a `ready_pattern` is configured, the log file must also
//! contain a match; a process that is visible but never logs the pattern is
//! still a failed launch.

use std::fs;
use std::path::Path;
use std::time::Duration;

use regex::Regex;
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::errors::{LaunchError, Result};
use crate::probe::{MatchSpec, ProcessHit, ProcessTable};

/// Poll until the tunnel is up or the deadline passes.
///
/// Returns the first matching [`ProcessHit`] once ready. On deadline,
/// [`LaunchError::StartupTimeout`] names the log path so the user knows where
/// to look.
pub async fn await_ready<T: ProcessTable + ?Sized>(
    table: &mut T,
    spec: &MatchSpec,
    log_path: &Path,
    ready_pattern: Option<&Regex>,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<ProcessHit> {
    let deadline = Instant::now() + timeout;

    loop {
        let hits = table.matching_processes(spec);
        if let Some(hit) = hits.into_iter().next() {
            if log_is_ready(log_path, ready_pattern) {
                debug!(pid = hit.pid, "tunnel is up");
                return Ok(hit);
            }
            debug!(pid = hit.pid, "process visible, waiting for ready pattern in log");
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(LaunchError::StartupTimeout {
                timeout,
                log_path: log_path.to_path_buf(),
            });
        }

        sleep(poll_interval.min(deadline - now)).await;
    }
}

/// Whether the log file satisfies the readiness pattern.
///
/// With no pattern configured, process visibility alone decides. A log file
/// that doesn't exist yet is "no match yet", never an error.
fn log_is_ready(log_path: &Path, ready_pattern: Option<&Regex>) -> bool {
    let Some(pattern) = ready_pattern else {
        return true;
    };

    match fs::read(log_path) {
        Ok(bytes) => pattern.is_match(&String::from_utf8_lossy(&bytes)),
        Err(_) => false,
    }
}
