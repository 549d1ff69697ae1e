// src/config/mod.rs

//! Launcher configuration.
//!
//! - [`model`] holds the serde model (`RawConfig`) and the resolved
//!   [`Config`] the rest of the crate works with.
//! - [`loader`] reads TOML from disk and applies the built-in defaults when
//!   no file exists.
//! - [`validate`] performs semantic checks with key-qualified error messages.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{Config, LogSection, RawConfig, StartupSection, TunnelSection, parse_duration};
