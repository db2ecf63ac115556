//! ASTRO desktop launcher.
//!
//! This is the entry point of the application. It resolves the installation
//! layout, ensures the per-user config directory exists, and dispatches one of
//! three launch modes (web UI, terminal UI, CLI). Child processes are started
//! detached and outlive the launcher; the launcher itself always exits 0 and
//! reports failures through modal dialogs.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod config;
mod host;
mod launch;
mod mode;
mod paths;
mod process;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::host::{DesktopHost, Host};
use crate::paths::{ensure_dir, InstallLayout};

const LAYOUT_FAILED: &str =
    "Could not resolve the ASTRO data directory. Please check your user profile.";

/// Command-line interface definition.
#[derive(Debug, Parser)]
#[command(name = "astro-launcher", version, about = "Desktop launcher for ASTRO")]
struct Cli {
    /// Path to astro-launcher.toml (defaults to the installation directory).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Free-form arguments scanned for --mode=web / --mode=tui / --mode=cli.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut host = DesktopHost::new();
    let layout = match InstallLayout::discover() {
        Ok(layout) => layout,
        Err(err) => {
            tracing::error!("path resolution failed: {:#}", err);
            host.show_error(launch::ERROR_TITLE, LAYOUT_FAILED);
            return Ok(());
        }
    };
    tracing::info!(
        install = %layout.install_dir.display(),
        config = %layout.config_dir.display(),
        "layout resolved"
    );

    if let Err(err) = ensure_dir(&layout.config_dir) {
        // Mode handlers keep going on a missing config dir, matching the
        // directory-ensure contract.
        tracing::warn!("could not create {}: {:#}", layout.config_dir.display(), err);
    }

    let config_path = cli.config.clone().unwrap_or_else(|| layout.config_file());
    let settings = config::load_settings(&config_path);
    let cmdline = cli.args.join(" ");
    launch::dispatch(&cmdline, &layout, &settings, &mut host).await;

    Ok(())
}
