// src/config/validate.rs

use crate::config::model::{RawConfig, parse_duration};
use crate::errors::{LaunchError, Result};

/// Run basic semantic validation against a raw configuration.
///
/// This checks:
/// - `program`, `subcommand`, `action`, `config` and `log.file` are non-empty
/// - the startup durations parse and `poll_interval` is non-zero
/// - `timeout >= poll_interval`
///
/// It does **not** compile `ready_pattern`; that happens during
/// [`RawConfig::resolve`], where the regex is actually needed.
pub fn validate_raw(cfg: &RawConfig) -> Result<()> {
    ensure_non_empty(cfg)?;
    validate_startup(cfg)?;
    Ok(())
}

fn ensure_non_empty(cfg: &RawConfig) -> Result<()> {
    let fields = [
        ("[tunnel].program", &cfg.tunnel.program),
        ("[tunnel].subcommand", &cfg.tunnel.subcommand),
        ("[tunnel].action", &cfg.tunnel.action),
        ("[tunnel].config", &cfg.tunnel.config),
        ("[log].file", &cfg.log.file),
        ("[log].dir", &cfg.log.dir),
    ];

    for (key, value) in fields {
        if value.trim().is_empty() {
            return Err(LaunchError::Config(format!("{key} must not be empty")));
        }
    }

    Ok(())
}

fn validate_startup(cfg: &RawConfig) -> Result<()> {
    let timeout = parse_duration(&cfg.startup.timeout)
        .map_err(|e| LaunchError::Config(format!("[startup].timeout: {e}")))?;
    let poll = parse_duration(&cfg.startup.poll_interval)
        .map_err(|e| LaunchError::Config(format!("[startup].poll_interval: {e}")))?;

    if poll.is_zero() {
        return Err(LaunchError::Config(
            "[startup].poll_interval must be greater than zero".to_string(),
        ));
    }

    if timeout < poll {
        return Err(LaunchError::Config(format!(
            "[startup].timeout ({}) must be >= [startup].poll_interval ({})",
            cfg.startup.timeout, cfg.startup.poll_interval
        )));
    }

    Ok(())
}
