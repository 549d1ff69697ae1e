// tests/config_behaviour.rs

use std::error::Error;
use std::time::Duration;

use tempfile::TempDir;

use tunup::config::RawConfig;
use tunup::errors::LaunchError;

use tunup_test_utils::builders::ConfigBuilder;
use tunup_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

/// The built-in defaults reproduce the classic cloudflared setup, rooted in
/// the user's home directory.
#[test]
fn defaults_match_the_classic_layout() -> TestResult {
    init_tracing();
    let home = TempDir::new()?;

    let cfg = RawConfig::default().resolve(home.path())?;

    assert_eq!(cfg.program, "cloudflared");
    assert_eq!(cfg.subcommand, "tunnel");
    assert_eq!(cfg.action, "run");
    assert_eq!(
        cfg.tunnel_config,
        home.path().join(".cloudflared/config.yml")
    );
    assert_eq!(cfg.log_path(), home.path().join(".cloudflared/logs/tunnel.log"));
    assert_eq!(cfg.pid_path(), home.path().join(".cloudflared/logs/tunup.pid"));
    assert_eq!(cfg.timeout, Duration::from_secs(10));
    assert_eq!(cfg.poll_interval, Duration::from_millis(500));
    assert!(cfg.ready_pattern.is_none());

    Ok(())
}

/// The spawn plan has the classic shape:
/// `<program> <subcommand> --config <path> <extra...> <action>`.
#[test]
fn spawn_plan_matches_invocation_shape() -> TestResult {
    init_tracing();
    let home = TempDir::new()?;

    let cfg = ConfigBuilder::new(home.path())
        .with_extra_arg("--no-autoupdate")
        .build();
    let plan = cfg.spawn_plan();

    assert_eq!(plan.program, "cloudflared");
    assert_eq!(
        plan.args,
        vec![
            "tunnel".to_string(),
            "--config".to_string(),
            cfg.tunnel_config.to_string_lossy().into_owned(),
            "--no-autoupdate".to_string(),
            "run".to_string(),
        ]
    );
    assert_eq!(plan.log_path, cfg.log_path());

    Ok(())
}

/// The probe spec requires both the program name and the config path.
#[test]
fn match_spec_requires_both_substrings() -> TestResult {
    init_tracing();
    let home = TempDir::new()?;

    let cfg = ConfigBuilder::new(home.path()).build();
    let spec = cfg.match_spec();
    let config = cfg.tunnel_config.to_string_lossy().into_owned();

    assert!(spec.matches(&format!("cloudflared tunnel --config {config} run")));
    assert!(!spec.matches("cloudflared tunnel --config /elsewhere/config.yml run"));
    assert!(!spec.matches("nginx -g daemon off;"));
    assert!(!spec.matches(""));

    Ok(())
}

/// `~` in paths expands against the home directory; absolute paths pass
/// through untouched.
#[test]
fn tilde_paths_expand_against_home() -> TestResult {
    init_tracing();
    let home = TempDir::new()?;

    let cfg = ConfigBuilder::new(home.path())
        .with_tunnel_config("~/tunnels/prod.yml")
        .with_log_dir("/var/log/tunup")
        .build();

    assert_eq!(cfg.tunnel_config, home.path().join("tunnels/prod.yml"));
    assert_eq!(cfg.log_dir.to_string_lossy(), "/var/log/tunup");

    Ok(())
}

/// TOML parsing picks up every section.
#[test]
fn toml_round_trip() -> TestResult {
    init_tracing();
    let home = TempDir::new()?;

    let raw: RawConfig = toml::from_str(
        r#"
        [tunnel]
        program = "my-tunnel"
        subcommand = "client"
        action = "start"
        config = "~/tunnel.toml"
        extra_args = ["--verbose"]

        [log]
        dir = "~/logs"
        file = "t.log"

        [startup]
        timeout = "30s"
        poll_interval = "1s"
        ready_pattern = "connected"
        "#,
    )?;

    let cfg = raw.resolve(home.path())?;
    assert_eq!(cfg.program, "my-tunnel");
    assert_eq!(cfg.extra_args, vec!["--verbose".to_string()]);
    assert_eq!(cfg.log_path(), home.path().join("logs/t.log"));
    assert_eq!(cfg.timeout, Duration::from_secs(30));
    assert!(cfg.ready_pattern.is_some());

    Ok(())
}

#[test]
fn empty_program_is_rejected() {
    init_tracing();
    let home = TempDir::new().unwrap();

    let mut raw = RawConfig::default();
    raw.tunnel.program = "  ".to_string();

    let err = raw.resolve(home.path()).expect_err("must reject empty program");
    match err {
        LaunchError::Config(msg) => assert!(msg.contains("[tunnel].program"), "{msg}"),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn timeout_shorter_than_poll_interval_is_rejected() {
    init_tracing();
    let home = TempDir::new().unwrap();

    let mut raw = RawConfig::default();
    raw.startup.timeout = "100ms".to_string();
    raw.startup.poll_interval = "1s".to_string();

    let err = raw.resolve(home.path()).expect_err("must reject timeout < poll");
    match err {
        LaunchError::Config(msg) => assert!(msg.contains("timeout"), "{msg}"),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn zero_poll_interval_is_rejected() {
    init_tracing();
    let home = TempDir::new().unwrap();

    let mut raw = RawConfig::default();
    raw.startup.poll_interval = "0ms".to_string();

    assert!(raw.resolve(home.path()).is_err());
}

#[test]
fn invalid_ready_pattern_is_rejected() {
    init_tracing();
    let home = TempDir::new().unwrap();

    let mut raw = RawConfig::default();
    raw.startup.ready_pattern = Some("[unclosed".to_string());

    let err = raw.resolve(home.path()).expect_err("must reject bad regex");
    match err {
        LaunchError::Config(msg) => assert!(msg.contains("ready_pattern"), "{msg}"),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn invalid_duration_is_rejected() {
    init_tracing();
    let home = TempDir::new().unwrap();

    let mut raw = RawConfig::default();
    raw.startup.timeout = "ten seconds".to_string();

    assert!(raw.resolve(home.path()).is_err());
}
