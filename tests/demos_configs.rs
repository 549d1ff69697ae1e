// tests/demos_configs.rs

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use tunup::config::load_from_path;
use tunup_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

/// Sanity-check that demos/tunup.toml is wired the way the comments describe.
#[test]
fn demo_config_is_parsed_correctly() -> TestResult {
    init_tracing();
    let home = TempDir::new()?;

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let raw = load_from_path(manifest_dir.join("demos/tunup.toml"))?;
    let cfg = raw.resolve(home.path())?;

    assert_eq!(cfg.program, "cloudflared");
    assert_eq!(cfg.subcommand, "tunnel");
    assert_eq!(cfg.action, "run");
    assert_eq!(
        cfg.tunnel_config,
        home.path().join(".cloudflared/config.yml")
    );
    assert_eq!(
        cfg.log_path(),
        home.path().join(".cloudflared/logs/tunnel.log")
    );
    assert_eq!(cfg.timeout, Duration::from_secs(10));
    assert_eq!(cfg.poll_interval, Duration::from_millis(500));

    let pattern = cfg.ready_pattern.as_ref().expect("demo sets a ready pattern");
    assert!(pattern.is_match("2026-08-08 INF Registered tunnel connection connIndex=0"));

    Ok(())
}

/// Sanity-check the custom-client demo.
#[test]
fn custom_client_demo_is_parsed_correctly() -> TestResult {
    init_tracing();
    let home = TempDir::new()?;

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let raw = load_from_path(manifest_dir.join("demos/custom-client.toml"))?;
    let cfg = raw.resolve(home.path())?;

    assert_eq!(cfg.program, "acme-tunnel");
    assert_eq!(cfg.extra_args, vec!["--strict-config".to_string()]);
    assert_eq!(cfg.timeout, Duration::from_secs(30));
    assert_eq!(cfg.poll_interval, Duration::from_secs(1));
    assert!(cfg.ready_pattern.is_none());

    let plan = cfg.spawn_plan();
    assert_eq!(
        plan.args,
        vec![
            "client".to_string(),
            "--config".to_string(),
            home.path().join("tunnels/acme.toml").to_string_lossy().into_owned(),
            "--strict-config".to_string(),
            "start".to_string(),
        ]
    );

    Ok(())
}

/// An empty TOML file is a valid config: everything defaults.
#[test]
fn empty_config_file_uses_defaults() -> TestResult {
    init_tracing();
    let home = TempDir::new()?;
    let dir = TempDir::new()?;

    let path = dir.path().join("empty.toml");
    std::fs::write(&path, "")?;

    let cfg = load_from_path(&path)?.resolve(home.path())?;
    assert_eq!(cfg.program, "cloudflared");

    Ok(())
}
