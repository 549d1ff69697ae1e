// src/launcher.rs

//! The launch state machine.
//!
//! `Launcher` owns the semantics; the OS-facing edges (process table, spawn)
//! are trait parameters so the whole flow is testable with fakes. Production
//! wiring happens in [`crate::run`].
//!
//! `ensure_up` performs, in order:
//! 1. ensure the log directory exists
//! 2. probe for an existing matching process
//! 3. take the pid-file lock (a held lock means a concurrent launch)
//! 4. spawn the client detached, output redirected to the log file
//! 5. poll until the client is visible (and the log is ready, if configured)
//! 6. commit the pid file and report, or release it and fail

use std::fs;

use tracing::info;

use crate::config::Config;
use crate::errors::{LaunchError, Result};
use crate::pidfile;
use crate::probe::{ProcessHit, ProcessTable};
use crate::readiness;
use crate::signal;
use crate::spawn::Spawner;
use crate::types::{DownOutcome, Outcome, StatusReport};

pub struct Launcher<T: ProcessTable, S: Spawner> {
    config: Config,
    table: T,
    spawner: S,
}

impl<T: ProcessTable, S: Spawner> Launcher<T, S> {
    pub fn new(config: Config, table: T, spawner: S) -> Self {
        Self {
            config,
            table,
            spawner,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Start the tunnel client unless it is already running.
    pub async fn ensure_up(&mut self) -> Result<Outcome> {
        self.ensure_log_dir()?;

        let spec = self.config.match_spec();

        let hits = self.table.matching_processes(&spec);
        if !hits.is_empty() {
            info!(pids = ?pids_of(&hits), "tunnel already running");
            return Ok(Outcome::AlreadyRunning {
                pids: pids_of(&hits),
            });
        }

        let guard = match pidfile::acquire(&self.config.pid_path(), &mut self.table, &spec) {
            Ok(guard) => guard,
            Err(LaunchError::LockHeld { pid, .. }) => {
                info!(holder = ?pid, "pid-file lock held; another launch is in progress");
                return Ok(Outcome::LaunchInProgress { holder: pid });
            }
            Err(e) => return Err(e),
        };

        let plan = self.config.spawn_plan();
        println!("starting tunnel: {}", plan.rendered());

        // Guard is dropped (and the pid file removed) on every error path
        // from here on.
        let spawned_pid = self.spawner.spawn_detached(&plan)?;
        info!(spawned_pid, "waiting for tunnel to become ready");

        let hit = readiness::await_ready(
            &mut self.table,
            &spec,
            &plan.log_path,
            self.config.ready_pattern.as_ref(),
            self.config.timeout,
            self.config.poll_interval,
        )
        .await?;

        guard.commit(hit.pid, &hit.cmdline)?;

        Ok(Outcome::Started {
            pid: hit.pid,
            log_path: plan.log_path,
        })
    }

    /// Probe and read the pid file, without changing anything.
    pub fn status(&mut self) -> StatusReport {
        let spec = self.config.match_spec();
        StatusReport {
            hits: self.table.matching_processes(&spec),
            pid_file: pidfile::read(&self.config.pid_path()),
        }
    }

    /// Stop the tunnel client: SIGTERM, wait up to the startup timeout for it
    /// to exit, then SIGKILL.
    pub async fn down(&mut self) -> Result<DownOutcome> {
        let pid = match self.find_running_pid() {
            Some(pid) => pid,
            None => return Ok(DownOutcome::NotRunning),
        };

        info!(pid, "sending SIGTERM to tunnel client");
        signal::terminate(pid)?;

        let deadline = tokio::time::Instant::now() + self.config.timeout;
        while tokio::time::Instant::now() < deadline {
            if !self.table.is_alive(pid) {
                pidfile::remove(&self.config.pid_path())?;
                return Ok(DownOutcome::Stopped { pid });
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }

        info!(pid, "tunnel client ignored SIGTERM; killing");
        signal::force_kill(pid)?;
        pidfile::remove(&self.config.pid_path())?;

        Ok(DownOutcome::Killed { pid })
    }

    fn ensure_log_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.config.log_dir).map_err(|source| LaunchError::Filesystem {
            path: self.config.log_dir.clone(),
            source,
        })
    }

    /// Pid to stop: a live, still-matching pid file wins; otherwise the first
    /// probe hit.
    fn find_running_pid(&mut self) -> Option<u32> {
        let spec = self.config.match_spec();

        if let Some(data) = pidfile::read(&self.config.pid_path()) {
            let still_matches = self
                .table
                .matching_processes(&spec)
                .iter()
                .any(|hit| hit.pid == data.pid);
            if still_matches {
                return Some(data.pid);
            }
        }

        self.table
            .matching_processes(&spec)
            .first()
            .map(|hit| hit.pid)
    }
}

fn pids_of(hits: &[ProcessHit]) -> Vec<u32> {
    hits.iter().map(|hit| hit.pid).collect()
}
