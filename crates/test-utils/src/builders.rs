#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tunup::config::{Config, RawConfig};

/// Builder for a resolved [`Config`] to simplify test setup.
///
/// All paths resolve against the given fake home directory (usually a
/// tempdir), and the startup timings default to something test-friendly.
pub struct ConfigBuilder {
    raw: RawConfig,
    home: PathBuf,
}

impl ConfigBuilder {
    pub fn new(home: &Path) -> Self {
        let mut raw = RawConfig::default();
        raw.startup.timeout = "2s".to_string();
        raw.startup.poll_interval = "25ms".to_string();
        Self {
            raw,
            home: home.to_path_buf(),
        }
    }

    pub fn with_program(mut self, program: &str) -> Self {
        self.raw.tunnel.program = program.to_string();
        self
    }

    pub fn with_tunnel_config(mut self, config: &str) -> Self {
        self.raw.tunnel.config = config.to_string();
        self
    }

    pub fn with_extra_arg(mut self, arg: &str) -> Self {
        self.raw.tunnel.extra_args.push(arg.to_string());
        self
    }

    pub fn with_log_dir(mut self, dir: &str) -> Self {
        self.raw.log.dir = dir.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: &str) -> Self {
        self.raw.startup.timeout = timeout.to_string();
        self
    }

    pub fn with_poll_interval(mut self, interval: &str) -> Self {
        self.raw.startup.poll_interval = interval.to_string();
        self
    }

    pub fn with_ready_pattern(mut self, pattern: &str) -> Self {
        self.raw.startup.ready_pattern = Some(pattern.to_string());
        self
    }

    pub fn raw(self) -> RawConfig {
        self.raw
    }

    pub fn build(self) -> Config {
        self.raw
            .resolve(&self.home)
            .expect("Failed to build valid config from builder")
    }
}
