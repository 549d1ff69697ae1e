// tests/probe_real.rs

//! Probe tests against the real process table, using a uniquely-named child
//! as the needle.

#![cfg(unix)]

use std::error::Error;

use tunup::probe::{MatchSpec, ProcessTable, SysinfoProcessTable};
use tunup_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn real_table_finds_and_loses_a_child() -> TestResult {
    init_tracing();

    // The duration doubles as a unique command-line marker.
    let marker = "304269";
    let mut child = std::process::Command::new("sleep").arg(marker).spawn()?;
    let pid = child.id();

    let spec = MatchSpec {
        program: "sleep".to_string(),
        config_hint: marker.to_string(),
    };

    let mut table = SysinfoProcessTable::new();

    let hits = table.matching_processes(&spec);
    assert!(
        hits.iter().any(|hit| hit.pid == pid),
        "probe must see the child (got {hits:?})"
    );
    assert!(table.is_alive(pid));

    child.kill()?;
    child.wait()?;

    let hits = table.matching_processes(&spec);
    assert!(
        !hits.iter().any(|hit| hit.pid == pid),
        "reaped child must disappear from the probe"
    );

    Ok(())
}

#[test]
fn own_process_is_never_a_hit() {
    init_tracing();

    // A spec so loose it matches any command line mentioning the test binary
    // would still have to exclude the probing process itself.
    let own_pid = std::process::id();
    let spec = MatchSpec {
        program: String::new(),
        config_hint: String::new(),
    };

    let mut table = SysinfoProcessTable::new();
    let hits = table.matching_processes(&spec);

    assert!(
        !hits.iter().any(|hit| hit.pid == own_pid),
        "the launcher must not count itself"
    );
}
