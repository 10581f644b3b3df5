//! Server configuration from the environment.
//!
//! `PORT` picks the listen port (default 3000). Leptos build options come
//! from the workspace `[[workspace.metadata.leptos]]` table, overridable with
//! the usual `LEPTOS_*` variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use leptos::prelude::{LeptosOptions, get_configuration};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT {0:?}: expected an integer in 1..=65535")]
    InvalidPort(String),
    #[error("leptos configuration: {0}")]
    Leptos(String),
}

pub struct ServerConfig {
    pub port: u16,
    pub leptos: LeptosOptions,
}

impl ServerConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` for a malformed `PORT` or a missing/invalid
    /// Leptos metadata section.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_port(std::env::var("PORT").ok().as_deref())?;
        let leptos = get_configuration(None).map_err(|e| ConfigError::Leptos(e.to_string()))?.leptos_options;
        Ok(Self { port, leptos })
    }
}

/// Parse `PORT`; unset or blank means the default.
///
/// # Errors
///
/// Returns `ConfigError::InvalidPort` for anything that is not a non-zero `u16`.
pub fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_PORT);
    };
    match raw.parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort(raw.to_owned())),
    }
}
