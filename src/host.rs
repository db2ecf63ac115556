//! Operating-system side effects behind a single seam.
//!
//! Mode handlers only touch the outside world through the `Host` trait:
//! dialogs, process spawns, the browser, the console, and the clock. The
//! production implementation is `DesktopHost`; tests substitute a recording
//! fake to check launch sequences.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use tokio::net::TcpStream;
use tokio::process::Command;

use crate::mode::ModeChoice;
use crate::process::{format_command, ProcessSpec};

/// Everything a mode handler does to the outside world.
#[allow(async_fn_in_trait)]
pub trait Host {
    /// Presents the three-way modal mode prompt.
    fn choose_mode(&mut self, title: &str, body: &str) -> ModeChoice;
    /// Non-blocking-intent informational dialog (modal, fixed text).
    fn show_info(&mut self, title: &str, body: &str);
    /// Error dialog (modal, fixed text).
    fn show_error(&mut self, title: &str, body: &str);
    /// Spawns the background server with no visible window. The handle is
    /// retained until `detach_server`.
    async fn spawn_server(&mut self, spec: &ProcessSpec) -> Result<()>;
    /// Fixed-delay ordering barrier.
    async fn wait(&mut self, delay: Duration);
    /// Ordering barrier that polls the server port instead of sleeping.
    async fn probe_server(&mut self, port: u16, budget: Duration);
    /// Opens the default browser at `url`.
    fn open_browser(&mut self, url: &str);
    /// Allocates a console for the launcher process so shell-launched output
    /// has somewhere visible to go. No-op outside Windows.
    fn alloc_console(&mut self);
    /// Launches the frontend in a visible window, detached immediately.
    async fn launch_frontend(&mut self, spec: &ProcessSpec) -> Result<()>;
    /// Releases the retained server handle without terminating the process.
    fn detach_server(&mut self);
}

/// Production host: native dialogs, real processes, real clock.
#[derive(Default)]
pub struct DesktopHost {
    server: Option<tokio::process::Child>,
}

impl DesktopHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Host for DesktopHost {
    fn choose_mode(&mut self, title: &str, body: &str) -> ModeChoice {
        let result = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(title)
            .set_description(body)
            .set_buttons(MessageButtons::YesNoCancel)
            .show();
        match result {
            MessageDialogResult::Yes => ModeChoice::Web,
            MessageDialogResult::No => ModeChoice::TerminalUi,
            MessageDialogResult::Cancel => ModeChoice::Cli,
            _ => ModeChoice::Dismissed,
        }
    }

    fn show_info(&mut self, title: &str, body: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(title)
            .set_description(body)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn show_error(&mut self, title: &str, body: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title(title)
            .set_description(body)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    async fn spawn_server(&mut self, spec: &ProcessSpec) -> Result<()> {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        command.current_dir(&spec.cwd);
        if !spec.env.is_empty() {
            command.envs(&spec.env);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let child = command
            .spawn()
            .with_context(|| format!("failed to spawn {}", format_command(spec)))?;
        tracing::info!(
            pid = child.id().unwrap_or(0),
            "server started: {}",
            format_command(spec)
        );
        self.server = Some(child);
        Ok(())
    }

    async fn wait(&mut self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }

    async fn probe_server(&mut self, port: u16, budget: Duration) {
        let addr = format!("127.0.0.1:{}", port);
        let end = tokio::time::Instant::now() + budget;
        while tokio::time::Instant::now() < end {
            if TcpStream::connect(&addr).await.is_ok() {
                tracing::info!("server answering on port {}", port);
                return;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        // Keep going anyway: ordering is the contract, readiness is best-effort.
        tracing::warn!("server not answering on port {} after {:?}", port, budget);
    }

    fn open_browser(&mut self, url: &str) {
        if let Err(err) = open::that(url) {
            tracing::error!("failed to open browser at {}: {}", url, err);
        }
    }

    fn alloc_console(&mut self) {
        alloc_os_console();
    }

    async fn launch_frontend(&mut self, spec: &ProcessSpec) -> Result<()> {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        command.current_dir(&spec.cwd);
        let child = command
            .spawn()
            .with_context(|| format!("failed to launch {}", format_command(spec)))?;
        tracing::info!(
            pid = child.id().unwrap_or(0),
            "frontend launched: {}",
            format_command(spec)
        );
        // Dropping the handle detaches the frontend; it is never tracked.
        drop(child);
        Ok(())
    }

    fn detach_server(&mut self) {
        if let Some(child) = self.server.take() {
            tracing::debug!(pid = child.id().unwrap_or(0), "server handle released");
            drop(child);
        }
    }
}

#[cfg(windows)]
fn alloc_os_console() {
    use windows_sys::Win32::System::Console::AllocConsole;
    unsafe {
        let _ = AllocConsole();
    }
}

#[cfg(not(windows))]
fn alloc_os_console() {}
