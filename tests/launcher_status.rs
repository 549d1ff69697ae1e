// tests/launcher_status.rs

use std::error::Error;

use tempfile::TempDir;

use tunup::launcher::Launcher;
use tunup::types::Outcome;

use tunup_test_utils::builders::ConfigBuilder;
use tunup_test_utils::fake::{FakeProcessTable, FakeSpawner, SpawnBehaviour};
use tunup_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

/// Status on a quiet system: no hits, no pid file.
#[tokio::test]
async fn status_reports_nothing_running() -> TestResult {
    init_tracing();
    let home = TempDir::new()?;

    let cfg = ConfigBuilder::new(home.path()).build();
    let table = FakeProcessTable::new();
    let spawner = FakeSpawner::new(table.clone(), SpawnBehaviour::Appear);

    let mut launcher = Launcher::new(cfg, table, spawner);
    let report = launcher.status();

    assert!(!report.is_running());
    assert!(report.hits.is_empty());
    assert!(report.pid_file.is_none());

    Ok(())
}

/// After a successful launch, status sees both the process and the pid file,
/// and they agree.
#[tokio::test]
async fn status_after_up_shows_live_process_and_pid_file() -> TestResult {
    init_tracing();
    let home = TempDir::new()?;

    let cfg = ConfigBuilder::new(home.path()).build();
    let table = FakeProcessTable::new();
    let spawner = FakeSpawner::new(table.clone(), SpawnBehaviour::Appear);

    let mut launcher = Launcher::new(cfg, table, spawner);
    let Outcome::Started { pid, .. } = launcher.ensure_up().await? else {
        panic!("expected a started tunnel");
    };

    let report = launcher.status();
    assert!(report.is_running());
    assert_eq!(report.hits.len(), 1);
    assert_eq!(report.hits[0].pid, pid);

    let data = report.pid_file.expect("pid file must exist after up");
    assert_eq!(data.pid, pid);

    Ok(())
}

/// A crashed tunnel leaves a pid file behind; status reports the mismatch
/// instead of hiding it.
#[tokio::test]
async fn status_surfaces_a_stale_pid_file() -> TestResult {
    init_tracing();
    let home = TempDir::new()?;

    let cfg = ConfigBuilder::new(home.path()).build();
    let table = FakeProcessTable::new();
    let spawner = FakeSpawner::new(table.clone(), SpawnBehaviour::Appear);

    let mut launcher = Launcher::new(cfg.clone(), table.clone(), spawner);
    let Outcome::Started { pid, .. } = launcher.ensure_up().await? else {
        panic!("expected a started tunnel");
    };

    // Crash: the process disappears, the pid file stays.
    table.remove(pid);

    let report = launcher.status();
    assert!(!report.is_running());
    assert_eq!(report.pid_file.map(|d| d.pid), Some(pid));

    Ok(())
}
