//! Error types for autovenv operations.
//!
//! This module defines [`AutovenvError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Environment lifecycle failures (creation, activation) are fatal and
//!   abort before any user code runs
//! - Resolution-path failures (index lookup, install) are absorbed where
//!   they occur and logged; the user's program then fails with Python's
//!   ordinary `ImportError`, exactly as it would without autovenv
//! - Use `anyhow::Error` (via `AutovenvError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for autovenv operations.
#[derive(Debug, Error)]
pub enum AutovenvError {
    /// The script passed on the command line does not exist.
    #[error("Script not found: {path}")]
    ScriptNotFound { path: PathBuf },

    /// Creating the virtual environment failed. Fatal: activation against
    /// a nonexistent environment is never attempted.
    #[error("Failed to create virtual environment at {path}: {message}")]
    EnvironmentCreationFailed { path: PathBuf, message: String },

    /// No usable virtual environment could be found or created.
    #[error("No virtual environment at {path}")]
    EnvironmentMissing { path: PathBuf },

    /// Replacing the process image with the environment's interpreter failed.
    #[error("Failed to activate virtual environment: {message}")]
    ActivationFailed { message: String },

    /// pip exited nonzero while installing a distribution. Absorbed by the
    /// resolver; resolution always defers back to the normal import attempt.
    #[error("Failed to install '{distribution}' (exit code {code:?})")]
    InstallFailed {
        distribution: String,
        code: Option<i32>,
    },

    /// Spawning the user's program (or the interpreter) failed.
    #[error("Failed to run {command}: {message}")]
    CommandFailed { command: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for autovenv operations.
pub type Result<T> = std::result::Result<T, AutovenvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_not_found_displays_path() {
        let err = AutovenvError::ScriptNotFound {
            path: PathBuf::from("/tmp/missing.py"),
        };
        assert!(err.to_string().contains("/tmp/missing.py"));
    }

    #[test]
    fn environment_creation_displays_path_and_message() {
        let err = AutovenvError::EnvironmentCreationFailed {
            path: PathBuf::from("/project/venv"),
            message: "python not found".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/project/venv"));
        assert!(msg.contains("python not found"));
    }

    #[test]
    fn environment_missing_displays_path() {
        let err = AutovenvError::EnvironmentMissing {
            path: PathBuf::from("/project/venv"),
        };
        assert!(err.to_string().contains("/project/venv"));
    }

    #[test]
    fn activation_failed_displays_message() {
        let err = AutovenvError::ActivationFailed {
            message: "exec failed".into(),
        };
        assert!(err.to_string().contains("exec failed"));
    }

    #[test]
    fn install_failed_displays_distribution_and_code() {
        let err = AutovenvError::InstallFailed {
            distribution: "requests".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("requests"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn command_failed_displays_command() {
        let err = AutovenvError::CommandFailed {
            command: "python script.py".into(),
            message: "no such file".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("python script.py"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: AutovenvError = io_err.into();
        assert!(matches!(err, AutovenvError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(AutovenvError::EnvironmentMissing {
                path: PathBuf::from("venv"),
            })
        }
        assert!(returns_error().is_err());
    }
}
