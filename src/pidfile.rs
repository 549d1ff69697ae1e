// src/pidfile.rs

//! Pid-file lock guarding concurrent launches.
//!
//! Two invocations racing past the initial probe could both spawn a client.
//! The pid file closes that window: it is created with exclusive-create
//! semantics (`create_new`), so exactly one invocation wins the right to
//! spawn. The loser sees a live lock and backs off.
//!
//! Staleness is decided against the process table, never assumed: an existing
//! file whose pid is dead (or alive but no longer the tunnel) is removed and
//! the acquire retried once. If the retry loses too, a concurrent launch won
//! the race fair and square.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{LaunchError, Result};
use crate::probe::{MatchSpec, ProcessTable};

/// Contents of a committed pid file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PidFileData {
    pub pid: u32,
    /// Command line recorded at commit time, for `status` output.
    pub cmdline: Option<String>,
}

/// Exclusive hold on the pid file between acquire and commit.
///
/// Dropping an uncommitted guard removes the file, so every early-exit path
/// (spawn error, startup timeout, Ctrl-C during the wait) releases the lock.
#[derive(Debug)]
pub struct PidFileGuard {
    path: PathBuf,
    committed: bool,
}

impl PidFileGuard {
    /// Record the observed pid and command line, keeping the file on disk.
    pub fn commit(mut self, pid: u32, cmdline: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| LaunchError::Filesystem {
                path: self.path.clone(),
                source,
            })?;

        writeln!(file, "{pid}").map_err(LaunchError::Io)?;
        writeln!(file, "{cmdline}").map_err(LaunchError::Io)?;

        self.committed = true;
        debug!(pid, path = %self.path.display(), "pid file committed");
        Ok(())
    }
}

impl Drop for PidFileGuard {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %e, "failed to remove pid file");
            }
        }
    }
}

/// Try to take the pid-file lock.
///
/// - No file: created empty, guard returned.
/// - Existing file naming a live process that still matches `spec`: the lock
///   is held, [`LaunchError::LockHeld`] is returned.
/// - Existing file that is stale (unreadable, dead pid, or a reused pid that
///   no longer matches): removed, then one retry of the exclusive create.
pub fn acquire<T: ProcessTable + ?Sized>(
    path: &Path,
    table: &mut T,
    spec: &MatchSpec,
) -> Result<PidFileGuard> {
    match try_create(path)? {
        Some(guard) => return Ok(guard),
        None => debug!(path = %path.display(), "pid file already exists"),
    }

    let existing = read(path);
    if let Some(data) = &existing {
        let still_ours = table.is_alive(data.pid)
            && table
                .matching_processes(spec)
                .iter()
                .any(|hit| hit.pid == data.pid);
        if still_ours {
            return Err(LaunchError::LockHeld {
                path: path.to_path_buf(),
                pid: Some(data.pid),
            });
        }
    }

    // Stale or unreadable: clear it and retry exactly once.
    warn!(
        path = %path.display(),
        stale_pid = ?existing.map(|d| d.pid),
        "removing stale pid file"
    );
    if let Err(source) = fs::remove_file(path) {
        if source.kind() != ErrorKind::NotFound {
            return Err(LaunchError::Filesystem {
                path: path.to_path_buf(),
                source,
            });
        }
    }

    match try_create(path)? {
        Some(guard) => Ok(guard),
        // Lost the post-cleanup race to another invocation.
        None => Err(LaunchError::LockHeld {
            path: path.to_path_buf(),
            pid: read(path).map(|d| d.pid),
        }),
    }
}

/// Best-effort read of a pid file. Missing or malformed files yield `None`.
pub fn read(path: &Path) -> Option<PidFileData> {
    let contents = fs::read_to_string(path).ok()?;
    let mut lines = contents.lines();
    let pid: u32 = lines.next()?.trim().parse().ok()?;
    let cmdline = lines.next().map(|l| l.to_string()).filter(|l| !l.is_empty());
    Some(PidFileData { pid, cmdline })
}

/// Remove the pid file, tolerating its absence.
pub fn remove(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(LaunchError::Filesystem {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn try_create(path: &Path) -> Result<Option<PidFileGuard>> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_file) => Ok(Some(PidFileGuard {
            path: path.to_path_buf(),
            committed: false,
        })),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
        Err(source) => Err(LaunchError::Filesystem {
            path: path.to_path_buf(),
            source,
        }),
    }
}
