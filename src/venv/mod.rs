//! Virtual environment location and creation.
//!
//! A [`VenvDescriptor`] names the target environment: where it lives, where
//! its parent directory is (the snapshot destination), and the options to
//! pass through to the environment builder. Creation itself is delegated to
//! `python -m venv`; a creation failure is fatal to startup.

use crate::error::{AutovenvError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Options forwarded to the environment builder.
#[derive(Debug, Clone, Default)]
pub struct VenvOptions {
    /// Wipe and recreate the environment even if it exists.
    pub clear: bool,

    /// Give the environment access to the system site-packages.
    pub system_site_packages: bool,

    /// Interpreter to build the environment with (default `python3`).
    pub python: Option<PathBuf>,
}

/// The target virtual environment for one invocation.
///
/// Created once per process; never mutated after activation begins.
#[derive(Debug, Clone)]
pub struct VenvDescriptor {
    home: PathBuf,
    parent_dir: PathBuf,
    options: VenvOptions,
}

impl VenvDescriptor {
    /// Describe the environment at `home`, normalized to an absolute path.
    pub fn new(home: impl AsRef<Path>, options: VenvOptions) -> Self {
        let home = absolutize(home.as_ref());
        let parent_dir = home
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| home.clone());
        Self {
            home,
            parent_dir,
            options,
        }
    }

    /// Absolute path of the environment directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Directory the environment lives in; `requirements.txt` goes here.
    pub fn parent_dir(&self) -> &Path {
        &self.parent_dir
    }

    /// Builder options for this environment.
    pub fn options(&self) -> &VenvOptions {
        &self.options
    }

    /// Whether the environment directory exists on disk.
    pub fn exists(&self) -> bool {
        self.home.exists()
    }

    /// The environment's executable directory (`bin`, `Scripts` on Windows).
    pub fn bin_dir(&self) -> PathBuf {
        if cfg!(target_os = "windows") {
            self.home.join("Scripts")
        } else {
            self.home.join("bin")
        }
    }

    /// The environment's Python interpreter.
    pub fn interpreter(&self) -> PathBuf {
        if cfg!(target_os = "windows") {
            self.bin_dir().join("python.exe")
        } else {
            self.bin_dir().join("python")
        }
    }

    /// Create the environment if needed.
    ///
    /// A no-op when the directory already exists and `clear` is not set.
    /// Runs `python -m venv` with the descriptor's options; any failure is
    /// fatal and reported as [`AutovenvError::EnvironmentCreationFailed`].
    pub fn create_if_missing(&self) -> Result<()> {
        if self.exists() && !self.options.clear {
            tracing::debug!(
                "virtual environment already exists at {}, not creating",
                self.home.display()
            );
            return Ok(());
        }

        let python = self
            .options
            .python
            .clone()
            .unwrap_or_else(|| PathBuf::from("python3"));

        tracing::debug!(
            "creating virtual environment at {} with {}",
            self.home.display(),
            python.display()
        );

        let mut cmd = Command::new(&python);
        cmd.arg("-m").arg("venv");
        if self.options.clear {
            cmd.arg("--clear");
        }
        if self.options.system_site_packages {
            cmd.arg("--system-site-packages");
        }
        cmd.arg(&self.home);

        let output = cmd
            .output()
            .map_err(|e| AutovenvError::EnvironmentCreationFailed {
                path: self.home.clone(),
                message: format!("failed to run {}: {}", python.display(), e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AutovenvError::EnvironmentCreationFailed {
                path: self.home.clone(),
                message: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Search upward from `start_dir` for an existing `venv` directory.
///
/// Checks `start_dir/venv`, then each ancestor, stopping at the filesystem
/// root. Returns the first hit.
pub fn find_venv(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let mut current = absolutize(start_dir.as_ref());
    loop {
        let candidate = current.join("venv");
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
