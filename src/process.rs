//! Child process specifications.
//!
//! The launcher starts at most one "server" and one "frontend" process per
//! run, each described by a `ProcessSpec`. Nothing about a spawned process is
//! tracked beyond the spawn call itself.

use std::collections::HashMap;
use std::path::PathBuf;

/// Specification for a child process the launcher starts.
#[derive(Debug, Clone)]
pub struct ProcessSpec {
    /// The program to execute.
    pub program: PathBuf,
    /// Arguments for the program.
    pub args: Vec<String>,
    /// Working directory.
    pub cwd: PathBuf,
    /// Environment entries. These extend the launcher's inherited environment;
    /// they never replace it.
    pub env: HashMap<String, String>,
}

/// Renders a spec as a single shell-style line for log output.
pub fn format_command(spec: &ProcessSpec) -> String {
    let mut parts = Vec::with_capacity(1 + spec.args.len());
    parts.push(spec.program.display().to_string());
    parts.extend(spec.args.iter().cloned());
    shell_words::join(parts)
}
