// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod launcher;
pub mod logging;
pub mod pidfile;
pub mod probe;
pub mod readiness;
pub mod signal;
pub mod spawn;
pub mod types;

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::cli::{CliArgs, Command};
use crate::config::Config;
use crate::launcher::Launcher;
use crate::probe::SysinfoProcessTable;
use crate::spawn::DetachedSpawner;
use crate::types::{DownOutcome, Outcome, StatusReport};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (explicit path, default location, or built-in defaults)
/// - the launcher with its real process table and spawner
/// - Ctrl-C handling while waiting for startup
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = config::load_or_default(args.config.as_deref().map(Path::new))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let table = SysinfoProcessTable::new();
    let mut launcher = Launcher::new(cfg, table, DetachedSpawner);

    match args.command.unwrap_or(Command::Up) {
        Command::Up => {
            // Ctrl-C while polling aborts the wait; dropping the launch
            // future releases the pid-file lock.
            let outcome = tokio::select! {
                res = launcher.ensure_up() => res?,
                _ = tokio::signal::ctrl_c() => {
                    anyhow::bail!("interrupted while waiting for tunnel startup");
                }
            };
            report_up(&outcome);
        }
        Command::Status => {
            report_status(&launcher.status());
        }
        Command::Down => {
            let outcome = launcher.down().await?;
            report_down(&outcome);
        }
    }

    Ok(())
}

fn report_up(outcome: &Outcome) {
    match outcome {
        Outcome::AlreadyRunning { pids } => match pids.as_slice() {
            [pid] => println!("tunnel already running (pid {pid})"),
            pids => println!("tunnel already running (pids {pids:?})"),
        },
        Outcome::Started { pid, log_path } => {
            println!(
                "tunnel started successfully (pid {pid}, logs: {})",
                log_path.display()
            );
        }
        Outcome::LaunchInProgress { holder } => match holder {
            Some(pid) => println!("another tunup (pid {pid}) is already starting the tunnel"),
            None => println!("another tunup is already starting the tunnel"),
        },
    }
}

fn report_status(report: &StatusReport) {
    if report.hits.is_empty() {
        println!("tunnel not running");
    } else {
        for hit in &report.hits {
            println!("tunnel running (pid {}): {}", hit.pid, hit.cmdline);
        }
    }

    if let Some(data) = &report.pid_file {
        let live = report.hits.iter().any(|hit| hit.pid == data.pid);
        if !live {
            println!("stale pid file (pid {}); will be cleaned on next launch", data.pid);
        }
    }

    info!(running = report.is_running(), "status reported");
}

fn report_down(outcome: &DownOutcome) {
    match outcome {
        DownOutcome::NotRunning => println!("tunnel not running"),
        DownOutcome::Stopped { pid } => println!("tunnel stopped (pid {pid})"),
        DownOutcome::Killed { pid } => {
            println!("tunnel killed after ignoring SIGTERM (pid {pid})");
        }
    }
}

/// Simple dry-run output: print the resolved settings.
fn print_dry_run(cfg: &Config) {
    println!("tunup dry-run");
    println!("  command: {}", cfg.spawn_plan().rendered());
    println!("  log file: {}", cfg.log_path().display());
    println!("  pid file: {}", cfg.pid_path().display());
    println!("  startup.timeout = {:?}", cfg.timeout);
    println!("  startup.poll_interval = {:?}", cfg.poll_interval);
    match &cfg.ready_pattern {
        Some(pattern) => println!("  startup.ready_pattern = {pattern}"),
        None => println!("  startup.ready_pattern = (none; probe only)"),
    }
}
