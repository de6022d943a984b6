//! Distribution installation via pip.
//!
//! Thin wrapper around `python -m pip install` in the target environment.
//! Installation is an external collaborator: the only contract is the exit
//! code, and the only knob is whether its output is shown or swallowed.

use crate::error::{AutovenvError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Installs distributions into a specific environment with pip.
#[derive(Debug, Clone)]
pub struct PipInstaller {
    interpreter: PathBuf,
    quiet: bool,
}

impl PipInstaller {
    /// Create an installer that uses `interpreter`'s pip.
    pub fn new(interpreter: impl AsRef<Path>, quiet: bool) -> Self {
        Self {
            interpreter: interpreter.as_ref().to_path_buf(),
            quiet,
        }
    }

    /// Install `distribution` into the installer's environment.
    ///
    /// Returns [`AutovenvError::InstallFailed`] on a nonzero pip exit; the
    /// resolver absorbs that error rather than propagating it.
    pub fn install(&self, distribution: &str) -> Result<()> {
        tracing::debug!(
            "installing '{}' with {}",
            distribution,
            self.interpreter.display()
        );

        let mut cmd = Command::new(&self.interpreter);
        cmd.arg("-m").arg("pip").arg("install").arg(distribution);

        if self.quiet {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }

        let status = cmd
            .status()
            .map_err(|e| AutovenvError::CommandFailed {
                command: format!("{} -m pip install {}", self.interpreter.display(), distribution),
                message: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(AutovenvError::InstallFailed {
                distribution: distribution.to_string(),
                code: status.code(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_fails_with_missing_interpreter() {
        let installer = PipInstaller::new("/no/such/python", true);
        let err = installer.install("requests").unwrap_err();
        assert!(matches!(err, AutovenvError::CommandFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn install_reports_nonzero_exit() {
        // `false` ignores its arguments and exits 1, standing in for a pip
        // failure without any network traffic.
        let installer = PipInstaller::new("/bin/false", true);
        let err = installer.install("requests").unwrap_err();
        match err {
            AutovenvError::InstallFailed { distribution, code } => {
                assert_eq!(distribution, "requests");
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn install_succeeds_on_zero_exit() {
        let installer = PipInstaller::new("/bin/true", true);
        assert!(installer.install("requests").is_ok());
    }
}
