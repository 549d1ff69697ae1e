// src/signal.rs

//! Sending termination signals to the tunnel client.
//!
//! Unix-only in practice; on other platforms `down` reports an error instead
//! of pretending to stop anything.

use crate::errors::Result;

/// Ask the process to terminate (SIGTERM).
#[cfg(unix)]
pub fn terminate(pid: u32) -> Result<()> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid as i32), Signal::SIGTERM)
        .map_err(|e| anyhow::anyhow!("sending SIGTERM to pid {pid}: {e}"))?;
    Ok(())
}

/// Force-kill the process (SIGKILL).
#[cfg(unix)]
pub fn force_kill(pid: u32) -> Result<()> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid as i32), Signal::SIGKILL)
        .map_err(|e| anyhow::anyhow!("sending SIGKILL to pid {pid}: {e}"))?;
    Ok(())
}

#[cfg(not(unix))]
pub fn terminate(pid: u32) -> Result<()> {
    Err(anyhow::anyhow!("stopping the tunnel (pid {pid}) is only supported on unix").into())
}

#[cfg(not(unix))]
pub fn force_kill(pid: u32) -> Result<()> {
    Err(anyhow::anyhow!("stopping the tunnel (pid {pid}) is only supported on unix").into())
}
