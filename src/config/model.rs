// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::errors::{LaunchError, Result};
use crate::probe::MatchSpec;
use crate::spawn::SpawnPlan;

/// Top-level configuration as read from a TOML file.
///
/// All sections are optional; the defaults reproduce the classic
/// `cloudflared` setup:
///
/// ```toml
/// [tunnel]
/// program = "cloudflared"
/// subcommand = "tunnel"
/// action = "run"
/// config = "~/.cloudflared/config.yml"
///
/// [log]
/// dir = "~/.cloudflared/logs"
/// file = "tunnel.log"
///
/// [startup]
/// timeout = "10s"
/// poll_interval = "500ms"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    /// Which process to launch, from `[tunnel]`.
    #[serde(default)]
    pub tunnel: TunnelSection,

    /// Where its output goes, from `[log]`.
    #[serde(default)]
    pub log: LogSection,

    /// How long to wait for it to come up, from `[startup]`.
    #[serde(default)]
    pub startup: StartupSection,
}

/// `[tunnel]` section.
///
/// The client is invoked as `<program> <subcommand> --config <config>
/// <extra_args...> <action>`, detached from the launcher's terminal.
#[derive(Debug, Clone, Deserialize)]
pub struct TunnelSection {
    /// Binary to launch. Also used as a command-line substring by the probe.
    #[serde(default = "default_program")]
    pub program: String,

    /// First argument (e.g. `"tunnel"`).
    #[serde(default = "default_subcommand")]
    pub subcommand: String,

    /// Final argument (e.g. `"run"`).
    #[serde(default = "default_action")]
    pub action: String,

    /// Path passed via `--config`, and the second probe substring.
    ///
    /// A leading `~` is expanded against the user home directory.
    #[serde(default = "default_tunnel_config")]
    pub config: String,

    /// Extra arguments inserted between `--config <config>` and the action.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_program() -> String {
    "cloudflared".to_string()
}

fn default_subcommand() -> String {
    "tunnel".to_string()
}

fn default_action() -> String {
    "run".to_string()
}

fn default_tunnel_config() -> String {
    "~/.cloudflared/config.yml".to_string()
}

impl Default for TunnelSection {
    fn default() -> Self {
        Self {
            program: default_program(),
            subcommand: default_subcommand(),
            action: default_action(),
            config: default_tunnel_config(),
            extra_args: Vec::new(),
        }
    }
}

/// `[log]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LogSection {
    /// Directory for the log file, created (with parents) if absent.
    #[serde(default = "default_log_dir")]
    pub dir: String,

    /// File name within `dir`. Truncated on every launch, matching the
    /// behaviour of redirecting without an append flag.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_dir() -> String {
    "~/.cloudflared/logs".to_string()
}

fn default_log_file() -> String {
    "tunnel.log".to_string()
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            file: default_log_file(),
        }
    }
}

/// `[startup]` section.
///
/// Instead of sleeping a fixed amount after spawning, the launcher re-probes
/// the process table every `poll_interval` until `timeout` expires. If
/// `ready_pattern` is set, the log file must additionally contain a match
/// before the launch counts as successful.
#[derive(Debug, Clone, Deserialize)]
pub struct StartupSection {
    /// Total time to wait for the tunnel to come up (e.g. `"10s"`).
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Delay between probes (e.g. `"500ms"`).
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,

    /// Optional regex matched against the log file's contents.
    #[serde(default)]
    pub ready_pattern: Option<String>,
}

fn default_timeout() -> String {
    "10s".to_string()
}

fn default_poll_interval() -> String {
    "500ms".to_string()
}

impl Default for StartupSection {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
            ready_pattern: None,
        }
    }
}

/// Fully resolved configuration: paths absolute, durations parsed, the ready
/// pattern compiled. Everything downstream of the loader works with this.
#[derive(Debug, Clone)]
pub struct Config {
    pub program: String,
    pub subcommand: String,
    pub action: String,
    pub tunnel_config: PathBuf,
    pub extra_args: Vec<String>,
    pub log_dir: PathBuf,
    pub log_file: String,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub ready_pattern: Option<Regex>,
}

impl RawConfig {
    /// Resolve the raw config against the given home directory.
    ///
    /// Runs [`crate::config::validate::validate_raw`] first, so any error
    /// message names the offending key.
    pub fn resolve(&self, home: &Path) -> Result<Config> {
        crate::config::validate::validate_raw(self)?;

        let timeout = parse_duration(&self.startup.timeout)
            .map_err(|e| LaunchError::Config(format!("[startup].timeout: {e}")))?;
        let poll_interval = parse_duration(&self.startup.poll_interval)
            .map_err(|e| LaunchError::Config(format!("[startup].poll_interval: {e}")))?;

        let ready_pattern = match self.startup.ready_pattern.as_deref() {
            Some(p) => Some(Regex::new(p).map_err(|e| {
                LaunchError::Config(format!("[startup].ready_pattern: invalid regex: {e}"))
            })?),
            None => None,
        };

        Ok(Config {
            program: self.tunnel.program.clone(),
            subcommand: self.tunnel.subcommand.clone(),
            action: self.tunnel.action.clone(),
            tunnel_config: expand_home(&self.tunnel.config, home),
            extra_args: self.tunnel.extra_args.clone(),
            log_dir: expand_home(&self.log.dir, home),
            log_file: self.log.file.clone(),
            timeout,
            poll_interval,
            ready_pattern,
        })
    }
}

impl Config {
    /// Full path of the log file.
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(&self.log_file)
    }

    /// Full path of the pid file guarding concurrent launches.
    pub fn pid_path(&self) -> PathBuf {
        self.log_dir.join("tunup.pid")
    }

    /// The two command-line substrings the probe looks for.
    pub fn match_spec(&self) -> MatchSpec {
        MatchSpec {
            program: self.program.clone(),
            config_hint: self.tunnel_config.to_string_lossy().into_owned(),
        }
    }

    /// The argv for the detached child.
    pub fn spawn_plan(&self) -> SpawnPlan {
        let mut args = vec![
            self.subcommand.clone(),
            "--config".to_string(),
            self.tunnel_config.to_string_lossy().into_owned(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args.push(self.action.clone());

        SpawnPlan {
            program: self.program.clone(),
            args,
            log_path: self.log_path(),
        }
    }
}

/// Expand a leading `~` against the given home directory.
fn expand_home(input: &str, home: &Path) -> PathBuf {
    let home_str = home.to_string_lossy();
    let expanded = shellexpand::tilde_with_context(input, || Some(home_str.to_string()));
    PathBuf::from(expanded.into_owned())
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}
