use std::fs;
use std::sync::{Arc, Mutex};

use tunup::errors::{LaunchError, Result};
use tunup::probe::{MatchSpec, ProcessHit, ProcessTable};
use tunup::spawn::{SpawnPlan, Spawner};

/// A scripted process table shared between the test, a [`FakeSpawner`] and
/// the launcher under test.
#[derive(Debug, Clone, Default)]
pub struct FakeProcessTable {
    procs: Arc<Mutex<Vec<(u32, String)>>>,
}

impl FakeProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, pid: u32, cmdline: &str) {
        self.procs.lock().unwrap().push((pid, cmdline.to_string()));
    }

    pub fn remove(&self, pid: u32) {
        self.procs.lock().unwrap().retain(|(p, _)| *p != pid);
    }

    pub fn len(&self) -> usize {
        self.procs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProcessTable for FakeProcessTable {
    fn matching_processes(&mut self, spec: &MatchSpec) -> Vec<ProcessHit> {
        let mut hits: Vec<ProcessHit> = self
            .procs
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, cmdline)| spec.matches(cmdline))
            .map(|(pid, cmdline)| ProcessHit {
                pid: *pid,
                cmdline: cmdline.clone(),
            })
            .collect();
        hits.sort_by_key(|hit| hit.pid);
        hits
    }

    fn is_alive(&mut self, pid: u32) -> bool {
        self.procs.lock().unwrap().iter().any(|(p, _)| *p == pid)
    }
}

/// What a [`FakeSpawner`] does when asked to spawn.
#[derive(Debug, Clone)]
pub enum SpawnBehaviour {
    /// The child shows up in the process table immediately.
    Appear,
    /// The child shows up and the given line is written to the log file
    /// (for `ready_pattern` tests).
    AppearWithLogLine(String),
    /// The spawn call itself fails.
    Fail,
    /// The spawn call succeeds but the child never becomes visible
    /// (crash-on-startup; drives the launcher into its timeout path).
    Vanish,
}

/// A fake spawner that:
/// - records every [`SpawnPlan`] it was asked to run
/// - creates the log file, like the real spawner does before exec
/// - manipulates a shared [`FakeProcessTable`] according to its behaviour.
pub struct FakeSpawner {
    table: FakeProcessTable,
    behaviour: SpawnBehaviour,
    next_pid: u32,
    plans: Arc<Mutex<Vec<SpawnPlan>>>,
}

impl FakeSpawner {
    pub fn new(table: FakeProcessTable, behaviour: SpawnBehaviour) -> Self {
        Self {
            table,
            behaviour,
            next_pid: 4000,
            plans: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle for asserting on recorded plans after the launcher ran.
    pub fn plans(&self) -> Arc<Mutex<Vec<SpawnPlan>>> {
        Arc::clone(&self.plans)
    }

    pub fn spawn_count(&self) -> usize {
        self.plans.lock().unwrap().len()
    }
}

impl Spawner for FakeSpawner {
    fn spawn_detached(&mut self, plan: &SpawnPlan) -> Result<u32> {
        self.plans.lock().unwrap().push(plan.clone());

        if matches!(self.behaviour, SpawnBehaviour::Fail) {
            return Err(LaunchError::Spawn {
                program: plan.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such binary"),
            });
        }

        // The real spawner opens the log file before exec; mirror that so
        // the "log file exists even on failed startup" property holds.
        fs::write(&plan.log_path, b"").map_err(|source| LaunchError::Filesystem {
            path: plan.log_path.clone(),
            source,
        })?;

        let pid = self.next_pid;
        self.next_pid += 1;

        match &self.behaviour {
            SpawnBehaviour::Appear => {
                self.table.insert(pid, &plan.rendered());
            }
            SpawnBehaviour::AppearWithLogLine(line) => {
                self.table.insert(pid, &plan.rendered());
                fs::write(&plan.log_path, format!("{line}\n"))
                    .map_err(|source| LaunchError::Filesystem {
                        path: plan.log_path.clone(),
                        source,
                    })?;
            }
            SpawnBehaviour::Vanish => {}
            SpawnBehaviour::Fail => unreachable!(),
        }

        Ok(pid)
    }
}
