//! Environment activation by process replacement.
//!
//! Activation re-runs autovenv from inside the virtual environment: the
//! process environment is rewritten (bin dir prepended to `PATH`,
//! `VIRTUAL_ENV` and `_` set) and the current process image is replaced
//! with a re-invocation of this executable carrying `--no-venv`, every flag
//! needed for correct behavior after re-entry, and the original argument
//! vector untouched at the tail. The re-entered process sees `--no-venv`
//! and skips activation, so the swap happens exactly once per logical run.
//!
//! On Unix this is a true `exec`: nothing after it runs in the old process.
//! On other platforms the closest analog is used instead — spawn the child,
//! wait, and propagate its exit code.
//!
//! Ordering matters: activation completes (or is explicitly skipped) before
//! any import resolution and before any user code, because both depend on
//! the environment's search paths.

use crate::error::{AutovenvError, Result};
use crate::venv::VenvDescriptor;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Activation lifecycle. `Replaced` is terminal: the calling process
/// ceases to exist as itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationState {
    Inert,
    Activating,
    Replaced,
}

/// What `activate` observed.
#[derive(Debug, PartialEq, Eq)]
pub enum Activation {
    /// `--no-venv` was set; the process keeps running as-is.
    Skipped,
    /// Non-Unix fallback: the child ran to completion with this exit code.
    Completed(i32),
}

/// Flags that must survive the re-exec boundary.
#[derive(Debug, Clone, Default)]
pub struct ReentryFlags {
    pub quiet: bool,
    pub debug: bool,
    pub no_install: bool,
    pub no_requirements: bool,
    pub color: bool,
    pub no_color: bool,
    pub clear: bool,
    pub system_site_packages: bool,
    pub python: Option<PathBuf>,
    /// `-c` single command to run after re-entry.
    pub command: Option<String>,
    /// `-m` module to run after re-entry.
    pub module: Option<String>,
}

/// The exact image used to replace the current process.
///
/// Constructed once, consumed once; the process does not outlive its use.
#[derive(Debug)]
pub struct ProcessInvocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub env: Vec<(OsString, OsString)>,
}

/// Replaces the current process with one rooted in the environment.
pub struct Activator {
    venv: VenvDescriptor,
    flags: ReentryFlags,
    /// The original, unmodified argument vector (script + script args).
    original_args: Vec<String>,
    no_venv: bool,
    state: ActivationState,
}

impl Activator {
    pub fn new(
        venv: VenvDescriptor,
        flags: ReentryFlags,
        original_args: Vec<String>,
        no_venv: bool,
    ) -> Self {
        Self {
            venv,
            flags,
            original_args,
            no_venv,
            state: ActivationState::Inert,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ActivationState {
        self.state
    }

    /// Build the replacement image: rewritten argv and environment.
    ///
    /// Pure with respect to its inputs; `activate` feeds it the real
    /// executable path and environment snapshot.
    pub fn invocation(
        &self,
        current_exe: &Path,
        base_env: impl IntoIterator<Item = (OsString, OsString)>,
    ) -> ProcessInvocation {
        let mut env: Vec<(OsString, OsString)> = Vec::new();
        let bin_dir = self.venv.bin_dir();
        let interpreter = self.venv.interpreter();
        let mut saw_path = false;

        for (key, value) in base_env {
            if key == OsString::from("PATH") {
                env.push((key, prepend_path(&bin_dir, &value)));
                saw_path = true;
            } else if key == OsString::from("VIRTUAL_ENV") || key == OsString::from("_") {
                // replaced below
            } else {
                env.push((key, value));
            }
        }
        if !saw_path {
            env.push(("PATH".into(), bin_dir.clone().into_os_string()));
        }
        env.push(("VIRTUAL_ENV".into(), self.venv.home().into()));
        env.push(("_".into(), interpreter.into_os_string()));

        let mut args: Vec<OsString> = vec!["--no-venv".into()];
        // Even without a venv to activate, the re-entered process needs the
        // path to know where the requirements snapshot belongs.
        args.push("--venv".into());
        args.push(self.venv.home().into());

        if self.flags.quiet {
            args.push("--quiet".into());
        }
        if self.flags.debug {
            args.push("--debug".into());
        }
        if self.flags.no_install {
            args.push("--no-install".into());
        }
        if self.flags.no_requirements {
            args.push("--no-requirements".into());
        }
        if self.flags.color {
            args.push("--color".into());
        }
        if self.flags.no_color {
            args.push("--no-color".into());
        }
        if self.flags.clear {
            args.push("--clear".into());
        }
        if self.flags.system_site_packages {
            args.push("--system-site-packages".into());
        }
        if let Some(python) = &self.flags.python {
            args.push("--python".into());
            args.push(python.into());
        }
        if let Some(module) = &self.flags.module {
            args.push("-m".into());
            args.push(module.into());
        }
        if let Some(command) = &self.flags.command {
            args.push("-c".into());
            args.push(command.into());
        }

        for arg in &self.original_args {
            args.push(arg.into());
        }

        ProcessInvocation {
            program: current_exe.to_path_buf(),
            args,
            env,
        }
    }

    /// Activate the environment.
    ///
    /// Returns [`Activation::Skipped`] under `--no-venv`. Otherwise the
    /// process image is replaced and, on Unix, this never returns on
    /// success. The non-Unix fallback returns the child's exit code for
    /// the caller to propagate.
    pub fn activate(&mut self) -> Result<Activation> {
        if self.no_venv {
            tracing::debug!("--no-venv set, not activating");
            return Ok(Activation::Skipped);
        }

        if !self.venv.exists() {
            return Err(AutovenvError::EnvironmentMissing {
                path: self.venv.home().to_path_buf(),
            });
        }

        self.state = ActivationState::Activating;
        let current_exe = std::env::current_exe()?;
        let invocation = self.invocation(&current_exe, std::env::vars_os());

        tracing::debug!(
            "replacing process with {} {:?}",
            invocation.program.display(),
            invocation.args
        );

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd.env_clear();
        cmd.envs(invocation.env.iter().map(|(k, v)| (k.clone(), v.clone())));

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // exec only returns on failure.
            let err = cmd.exec();
            Err(AutovenvError::ActivationFailed {
                message: err.to_string(),
            })
        }

        #[cfg(not(unix))]
        {
            let status = cmd.status().map_err(|e| AutovenvError::ActivationFailed {
                message: e.to_string(),
            })?;
            self.state = ActivationState::Replaced;
            Ok(Activation::Completed(status.code().unwrap_or(1)))
        }
    }
}

/// Prepend `dir` to a `PATH`-style value.
fn prepend_path(dir: &Path, existing: &OsString) -> OsString {
    let mut parts: Vec<PathBuf> = vec![dir.to_path_buf()];
    parts.extend(std::env::split_paths(existing));
    std::env::join_paths(parts)
        .unwrap_or_else(|_| dir.as_os_str().to_os_string())
}
