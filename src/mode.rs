//! Launch mode selection.
//!
//! This module defines the three mutually exclusive launch modes and the
//! substring scan that picks one out of the free-form argument string.

/// One of three launch behaviors, selected once per run and immutable after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Start the server and open the web UI in the default browser.
    Web,
    /// Start the server and launch the bundled terminal UI.
    TerminalUi,
    /// Start the server and launch the bundled CLI in a fresh console.
    Cli,
}

/// Outcome of the interactive mode prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChoice {
    Web,
    TerminalUi,
    Cli,
    /// The prompt was dismissed without a definite answer; nothing launches.
    Dismissed,
}

pub const WEB_FLAG: &str = "--mode=web";
pub const TUI_FLAG: &str = "--mode=tui";
pub const CLI_FLAG: &str = "--mode=cli";

/// Scans the free-form argument string for a recognized mode flag.
///
/// Matching is substring based, checked in a fixed order: web, then terminal
/// UI, then CLI. When more than one flag is present the first checked one
/// wins; that ambiguity is accepted rather than rejected.
pub fn detect(cmdline: &str) -> Option<LaunchMode> {
    let candidates = [
        (LaunchMode::Web, WEB_FLAG),
        (LaunchMode::TerminalUi, TUI_FLAG),
        (LaunchMode::Cli, CLI_FLAG),
    ];
    candidates
        .iter()
        .find(|(_, flag)| cmdline.contains(flag))
        .map(|(mode, _)| *mode)
}
