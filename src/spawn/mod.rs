// src/spawn/mod.rs

//! Detached process spawning.
//!
//! The tunnel client must outlive the launcher and its terminal, so the child
//! is spawned with:
//! - stdin null
//! - stdout and stderr redirected to the log file (created or truncated)
//! - its own process group on unix, so terminal SIGHUP never reaches it
//!
//! The spawn sits behind the [`Spawner`] trait so tests can record spawn
//! plans and simulate children without creating real processes.

use std::fs::File;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::errors::{LaunchError, Result};

/// Everything needed to start the tunnel client once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnPlan {
    pub program: String,
    pub args: Vec<String>,
    pub log_path: PathBuf,
}

impl SpawnPlan {
    /// The command line as a display string (also what the probe will see).
    pub fn rendered(&self) -> String {
        let mut out = self.program.clone();
        for arg in &self.args {
            out.push(' ');
            out.push_str(arg);
        }
        out
    }
}

/// Trait abstracting how the tunnel client is started.
///
/// Production code uses [`DetachedSpawner`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait Spawner: Send {
    /// Start the process described by `plan`, detached, and return its pid.
    fn spawn_detached(&mut self, plan: &SpawnPlan) -> Result<u32>;
}

/// Real spawner used in production.
pub struct DetachedSpawner;

impl Spawner for DetachedSpawner {
    fn spawn_detached(&mut self, plan: &SpawnPlan) -> Result<u32> {
        let log = File::create(&plan.log_path).map_err(|source| LaunchError::Filesystem {
            path: plan.log_path.clone(),
            source,
        })?;
        let log_err = log.try_clone().map_err(|source| LaunchError::Filesystem {
            path: plan.log_path.clone(),
            source,
        })?;

        let mut cmd = Command::new(&plan.program);
        cmd.args(&plan.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_err));

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // New process group: the child survives the launcher's terminal.
            cmd.process_group(0);
        }

        debug!(cmd = %plan.rendered(), log = %plan.log_path.display(), "spawning detached");

        let child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: plan.program.clone(),
            source,
        })?;

        let pid = child.id();
        info!(pid, cmd = %plan.rendered(), "tunnel client spawned");

        // Deliberately not waited on: the child runs independently of the
        // launcher's lifetime.
        Ok(pid)
    }
}
