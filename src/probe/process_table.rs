// src/probe/process_table.rs

use sysinfo::{Pid, System};
use tracing::debug;

use crate::probe::{MatchSpec, ProcessHit, ProcessTable};

/// Real [`ProcessTable`] backed by `sysinfo`.
///
/// Every call refreshes the process list; there is no caching between probes,
/// each one is a fresh point-in-time snapshot.
pub struct SysinfoProcessTable {
    system: System,
    own_pid: Option<u32>,
}

impl SysinfoProcessTable {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            own_pid: sysinfo::get_current_pid().ok().map(|pid| pid.as_u32()),
        }
    }
}

impl Default for SysinfoProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SysinfoProcessTable {
    fn matching_processes(&mut self, spec: &MatchSpec) -> Vec<ProcessHit> {
        self.system.refresh_processes();

        let mut hits: Vec<ProcessHit> = self
            .system
            .processes()
            .iter()
            .filter_map(|(pid, process)| {
                let pid = pid.as_u32();
                if Some(pid) == self.own_pid {
                    return None;
                }

                let cmdline = process.cmd().join(" ");
                if spec.matches(&cmdline) {
                    Some(ProcessHit { pid, cmdline })
                } else {
                    None
                }
            })
            .collect();

        hits.sort_by_key(|hit| hit.pid);

        debug!(
            program = %spec.program,
            config_hint = %spec.config_hint,
            matches = hits.len(),
            "probed process table"
        );

        hits
    }

    fn is_alive(&mut self, pid: u32) -> bool {
        self.system.refresh_processes();
        self.system.processes().contains_key(&Pid::from_u32(pid))
    }
}
