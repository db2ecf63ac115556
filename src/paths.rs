//! Installation and per-user path resolution.
//!
//! The launcher operates on a fixed filesystem layout: bundled runtimes live
//! at known paths under the directory containing the launcher executable, and
//! per-user state lives under `<local-app-data>/ASTRO`. Neither location comes
//! from a configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

/// Fixed subfolder name under the user's local app-data root.
const CONFIG_DIR_NAME: &str = "ASTRO";

const NODE_EXE: &str = if cfg!(windows) { "node.exe" } else { "node" };
const PYTHON_EXE: &str = if cfg!(windows) { "python.exe" } else { "python" };

/// The two directories every mode handler works from.
#[derive(Debug, Clone)]
pub struct InstallLayout {
    /// Directory containing the launcher executable; root for bundled artifacts.
    pub install_dir: PathBuf,
    /// Per-user config root. Persists across runs.
    pub config_dir: PathBuf,
}

impl InstallLayout {
    pub fn new(install_dir: PathBuf, config_dir: PathBuf) -> Self {
        Self {
            install_dir,
            config_dir,
        }
    }

    /// Resolves the layout from the running executable and the user's
    /// local-data location.
    ///
    /// An unresolvable local-data location is an error here; callers report it
    /// and skip launching instead of operating on a degenerate path.
    pub fn discover() -> Result<Self> {
        let exe = std::env::current_exe().context("failed to resolve the launcher executable")?;
        let install_dir = exe
            .parent()
            .ok_or_else(|| anyhow!("launcher executable has no parent directory"))?
            .to_path_buf();
        let base = BaseDirs::new()
            .ok_or_else(|| anyhow!("could not determine the user's local data directory"))?;
        let config_dir = base.data_local_dir().join(CONFIG_DIR_NAME);
        Ok(Self::new(install_dir, config_dir))
    }

    /// Bundled server runtime.
    pub fn node_exe(&self) -> PathBuf {
        self.install_dir.join("nodejs").join(NODE_EXE)
    }

    /// Bundled server entry script.
    pub fn server_script(&self) -> PathBuf {
        self.install_dir.join("dist").join("index.js")
    }

    /// Bundled interpreter driving the terminal UI and CLI.
    pub fn interpreter_exe(&self) -> PathBuf {
        self.install_dir.join("python").join(PYTHON_EXE)
    }

    /// Entry script for the terminal UI / CLI frontend.
    pub fn frontend_entry(&self) -> PathBuf {
        self.install_dir.join("astro.py")
    }

    /// Log directory created (but never written) by web mode.
    pub fn logs_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    /// Default location of the optional launcher configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.install_dir.join("astro-launcher.toml")
    }
}

/// Creates `path` and every missing ancestor. A no-op when the directory
/// already exists.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_creates_nested_path() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b").join("c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("logs").join("deep");
        ensure_dir(&nested).unwrap();
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn artifact_paths_hang_off_install_dir() {
        let layout = InstallLayout::new(PathBuf::from("/opt/astro"), PathBuf::from("/data/ASTRO"));
        assert!(layout.node_exe().starts_with("/opt/astro/nodejs"));
        assert_eq!(
            layout.server_script(),
            PathBuf::from("/opt/astro/dist/index.js")
        );
        assert!(layout.interpreter_exe().starts_with("/opt/astro/python"));
        assert_eq!(layout.frontend_entry(), PathBuf::from("/opt/astro/astro.py"));
        assert_eq!(layout.logs_dir(), PathBuf::from("/data/ASTRO/logs"));
        assert_eq!(
            layout.config_file(),
            PathBuf::from("/opt/astro/astro-launcher.toml")
        );
    }
}
