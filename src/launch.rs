//! Mode dispatch and the three launch handlers.
//!
//! Each handler starts at most one server and at most one frontend process,
//! sequences its steps with a fixed delay (or an optional port probe) instead
//! of a readiness handshake, and reports failures through modal dialogs.
//! Nothing is supervised: spawned processes outlive the launcher.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Settings;
use crate::host::Host;
use crate::mode::{self, LaunchMode, ModeChoice};
use crate::paths::{ensure_dir, InstallLayout};
use crate::process::ProcessSpec;

pub const APP_TITLE: &str = "ASTRO AI Assistant";
pub const ERROR_TITLE: &str = "Error";

const MODE_PROMPT: &str = "Welcome to ASTRO AI Assistant!\n\n\
    Select launch mode:\n\n\
    Yes = Web Mode (opens browser)\n\
    No = Terminal UI Mode\n\
    Cancel = CLI Mode";
const SERVER_FAILED: &str = "Failed to start ASTRO server. Please check the installation.";
const INTERPRETER_MISSING: &str = "Python runtime not found. Please reinstall ASTRO.";

fn web_running_message(url: &str) -> String {
    format!(
        "ASTRO server is running at {}\n\n\
         The browser has been opened automatically.\n\
         Close this dialog will NOT stop the server.",
        url
    )
}

/// Scans the argument string and runs the selected handler, prompting when no
/// recognized flag is present. A dismissed prompt runs nothing.
pub async fn dispatch(
    cmdline: &str,
    layout: &InstallLayout,
    settings: &Settings,
    host: &mut impl Host,
) {
    let mode = match mode::detect(cmdline) {
        Some(mode) => mode,
        None => match host.choose_mode(APP_TITLE, MODE_PROMPT) {
            ModeChoice::Web => LaunchMode::Web,
            ModeChoice::TerminalUi => LaunchMode::TerminalUi,
            ModeChoice::Cli => LaunchMode::Cli,
            ModeChoice::Dismissed => {
                tracing::info!("mode prompt dismissed, nothing to launch");
                return;
            }
        },
    };
    run_mode(mode, layout, settings, host).await;
}

/// Runs a single mode handler.
pub async fn run_mode(
    mode: LaunchMode,
    layout: &InstallLayout,
    settings: &Settings,
    host: &mut impl Host,
) {
    tracing::info!(?mode, "launching");
    match mode {
        LaunchMode::Web => run_web(layout, settings, host).await,
        LaunchMode::TerminalUi => run_terminal(layout, settings, host, false).await,
        LaunchMode::Cli => run_terminal(layout, settings, host, true).await,
    }
}

async fn run_web(layout: &InstallLayout, settings: &Settings, host: &mut impl Host) {
    let logs_dir = layout.logs_dir();
    if let Err(err) = ensure_dir(&logs_dir) {
        // The server owns its log output; a missing logs dir degrades the run,
        // it does not abort it.
        tracing::warn!("could not create {}: {:#}", logs_dir.display(), err);
    }

    let spec = server_spec(layout, settings, true);
    match host.spawn_server(&spec).await {
        Ok(()) => {
            server_barrier(host, settings, settings.web_delay_ms).await;
            let url = settings.web_url();
            host.open_browser(&url);
            host.show_info(APP_TITLE, &web_running_message(&url));
            host.detach_server();
        }
        Err(err) => {
            tracing::error!("server spawn failed: {:#}", err);
            host.show_error(ERROR_TITLE, SERVER_FAILED);
        }
    }
}

async fn run_terminal(
    layout: &InstallLayout,
    settings: &Settings,
    host: &mut impl Host,
    cli: bool,
) {
    let interpreter = layout.interpreter_exe();
    if !interpreter.is_file() {
        tracing::error!("bundled interpreter missing at {}", interpreter.display());
        host.show_error(ERROR_TITLE, INTERPRETER_MISSING);
        return;
    }

    // The frontend launches even when the server spawn fails.
    let started = match host.spawn_server(&server_spec(layout, settings, false)).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!("server spawn failed, continuing without it: {:#}", err);
            false
        }
    };
    if started {
        server_barrier(host, settings, settings.ui_delay_ms).await;
    }

    if cli {
        host.alloc_console();
    }

    let mut args = vec![layout.frontend_entry().display().to_string()];
    if cli {
        args.push("--cli".to_string());
    }
    let frontend = ProcessSpec {
        program: interpreter,
        args,
        cwd: layout.install_dir.clone(),
        env: HashMap::new(),
    };
    if let Err(err) = host.launch_frontend(&frontend).await {
        tracing::error!("frontend launch failed: {:#}", err);
    }

    if started {
        host.detach_server();
    }
}

/// Builds the bundled server spec.
///
/// Web mode fixes the production environment variables; the other modes pass
/// an empty map and rely on the inherited environment alone.
fn server_spec(layout: &InstallLayout, settings: &Settings, web_env: bool) -> ProcessSpec {
    let (program, args) = match settings.server_cmd.as_deref().and_then(parse_server_cmd) {
        Some(parts) => parts,
        None => (
            layout.node_exe(),
            vec![layout.server_script().display().to_string()],
        ),
    };
    let mut env = HashMap::new();
    if web_env {
        env.insert("NODE_ENV".to_string(), "production".to_string());
        env.insert("PORT".to_string(), settings.port.to_string());
        env.insert(
            "ASTRO_HOME".to_string(),
            layout.install_dir.display().to_string(),
        );
    }
    ProcessSpec {
        program,
        args,
        cwd: layout.install_dir.clone(),
        env,
    }
}

fn parse_server_cmd(raw: &str) -> Option<(PathBuf, Vec<String>)> {
    let mut parts = match shell_words::split(raw) {
        Ok(parts) => parts,
        Err(err) => {
            tracing::warn!("ignoring unparseable server_cmd: {}", err);
            return None;
        }
    };
    if parts.is_empty() {
        return None;
    }
    let program = PathBuf::from(parts.remove(0));
    Some((program, parts))
}

// Spawn -> barrier -> dependent action is the one ordering the launcher
// guarantees. The barrier is a fixed sleep by default, a port poll when
// `ready_probe` is set.
async fn server_barrier(host: &mut impl Host, settings: &Settings, delay_ms: u64) {
    if settings.ready_probe {
        host.probe_server(
            settings.port,
            Duration::from_millis(settings.probe_timeout_ms),
        )
        .await;
    } else {
        host.wait(Duration::from_millis(delay_ms)).await;
    }
}
