//! Requirements snapshot on exit.
//!
//! After the user's program finishes, the installed set of the environment
//! is re-enumerated with `pip freeze` and written as `name==version` lines
//! to `requirements.txt` in the environment's parent directory, overwriting
//! any existing file. Freezing from the environment's own pip (rather than
//! from any bookkeeping kept during resolution) means installs that happened
//! through other channels are captured too.
//!
//! The writer is consumed by [`SnapshotWriter::write`], so a snapshot is
//! taken at most once per process.

use crate::error::{AutovenvError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Fixed snapshot filename.
pub const SNAPSHOT_FILE: &str = "requirements.txt";

/// Writes the environment's installed distributions to a requirements file.
pub struct SnapshotWriter {
    interpreter: PathBuf,
    dest_dir: PathBuf,
}

impl SnapshotWriter {
    /// Snapshot `interpreter`'s environment into `dest_dir`.
    pub fn new(interpreter: impl AsRef<Path>, dest_dir: impl AsRef<Path>) -> Self {
        Self {
            interpreter: interpreter.as_ref().to_path_buf(),
            dest_dir: dest_dir.as_ref().to_path_buf(),
        }
    }

    /// Path the snapshot will be written to.
    pub fn dest_path(&self) -> PathBuf {
        self.dest_dir.join(SNAPSHOT_FILE)
    }

    /// Freeze the environment and write the snapshot file.
    pub fn write(self) -> Result<PathBuf> {
        let interpreter = self.interpreter.clone();
        self.write_with(|| freeze(&interpreter))
    }

    /// Write the snapshot from a caller-supplied freeze source.
    pub fn write_with(self, freeze: impl FnOnce() -> Result<String>) -> Result<PathBuf> {
        let pinned = freeze()?;
        let dest = self.dest_path();
        tracing::debug!("writing requirements snapshot to {}", dest.display());
        std::fs::write(&dest, pinned)?;
        Ok(dest)
    }
}

/// Run `python -m pip freeze` and capture the pinned list.
fn freeze(interpreter: &Path) -> Result<String> {
    let output = Command::new(interpreter)
        .arg("-m")
        .arg("pip")
        .arg("freeze")
        .output()
        .map_err(|e| AutovenvError::CommandFailed {
            command: format!("{} -m pip freeze", interpreter.display()),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(AutovenvError::CommandFailed {
            command: format!("{} -m pip freeze", interpreter.display()),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
