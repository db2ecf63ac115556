//! Configuration management for the launcher.
//!
//! This module defines the structure of the optional `astro-launcher.toml`
//! file and provides functionality to load and parse it. Every knob has a
//! default; the launcher starts fine with no file at all.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Raw contents of `astro-launcher.toml`. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// Port the bundled server binds on localhost.
    pub port: Option<u16>,
    /// Delay between server spawn and browser open in web mode (ms).
    pub web_delay_ms: Option<u64>,
    /// Delay between server spawn and frontend launch in TUI/CLI modes (ms).
    pub ui_delay_ms: Option<u64>,
    /// Poll the server port instead of sleeping a fixed delay.
    pub ready_probe: Option<bool>,
    /// Budget for the readiness probe (ms).
    pub probe_timeout_ms: Option<u64>,
    /// Full override of the server command line (shell-style quoting).
    pub server_cmd: Option<String>,
}

/// Resolved launcher settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub web_delay_ms: u64,
    pub ui_delay_ms: u64,
    pub ready_probe: bool,
    pub probe_timeout_ms: u64,
    pub server_cmd: Option<String>,
}

impl Settings {
    /// Merges an optional config file into the fixed defaults.
    pub fn resolve(file: Option<FileConfig>) -> Self {
        const DEFAULT_PORT: u16 = 5000;
        const DEFAULT_WEB_DELAY_MS: u64 = 3000;
        const DEFAULT_UI_DELAY_MS: u64 = 2000;
        const DEFAULT_PROBE_TIMEOUT_MS: u64 = 30_000;
        let file = file.unwrap_or_default();
        Self {
            port: file.port.unwrap_or(DEFAULT_PORT),
            web_delay_ms: file.web_delay_ms.unwrap_or(DEFAULT_WEB_DELAY_MS),
            ui_delay_ms: file.ui_delay_ms.unwrap_or(DEFAULT_UI_DELAY_MS),
            ready_probe: file.ready_probe.unwrap_or(false),
            probe_timeout_ms: file.probe_timeout_ms.unwrap_or(DEFAULT_PROBE_TIMEOUT_MS),
            server_cmd: file.server_cmd,
        }
    }

    /// URL the browser is pointed at in web mode.
    pub fn web_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

/// Loads and parses the configuration from a file path.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: FileConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Resolves settings from the optional config file at `path`.
///
/// A missing file means defaults. A malformed or unreadable one logs a
/// warning and falls back to defaults too; configuration never stops the
/// launcher from starting.
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::resolve(None);
    }
    match load_config(path) {
        Ok(file) => Settings::resolve(Some(file)),
        Err(err) => {
            tracing::warn!("ignoring config {}: {:#}", path.display(), err);
            Settings::resolve(None)
        }
    }
}
