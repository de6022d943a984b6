//! User program execution.
//!
//! Runs the user's program inside the environment: a script file, a `-c`
//! command, a `-m` module, or the interactive REPL when nothing was given.
//! The child inherits stdio and its exit code is propagated unchanged.

use crate::error::{AutovenvError, Result};
use crate::scan;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// The program the user asked to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserProgram {
    /// A script file plus its own arguments.
    Script { path: PathBuf, args: Vec<String> },
    /// A single command string (`-c`).
    Command { command: String, args: Vec<String> },
    /// A module run as a script (`-m`).
    Module { module: String, args: Vec<String> },
    /// No program: drop into the interpreter's REPL.
    Interactive,
}

impl UserProgram {
    /// The top-level names this program references, for pre-flight
    /// resolution.
    ///
    /// Scripts and `-c` commands are scanned for import statements; a
    /// `-m` module contributes its own top-level name (importing it is the
    /// first thing the interpreter will do). The REPL has no source to
    /// scan and contributes nothing.
    pub fn referenced_names(&self) -> Result<Vec<String>> {
        match self {
            UserProgram::Script { path, .. } => {
                let source = std::fs::read_to_string(path)?;
                Ok(scan::referenced_names(&source))
            }
            UserProgram::Command { command, .. } => Ok(scan::referenced_names(command)),
            UserProgram::Module { module, .. } => {
                Ok(scan::module_top_level(module).into_iter().collect())
            }
            UserProgram::Interactive => Ok(Vec::new()),
        }
    }
}

/// Run the program with `interpreter`, inheriting stdio.
///
/// Returns the child's exit code; a signal-terminated child maps to 1.
pub fn run(interpreter: &Path, program: &UserProgram) -> Result<i32> {
    let mut cmd = Command::new(interpreter);

    match program {
        UserProgram::Script { path, args } => {
            cmd.arg(path).args(args);
        }
        UserProgram::Command { command, args } => {
            cmd.arg("-c").arg(command).args(args);
        }
        UserProgram::Module { module, args } => {
            cmd.arg("-m").arg(module).args(args);
        }
        UserProgram::Interactive => {}
    }

    tracing::debug!("running user program: {:?}", cmd);

    let status = cmd
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| AutovenvError::CommandFailed {
            command: interpreter.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(status.code().unwrap_or(1))
}

/// Whether `name` imports cleanly under `interpreter`.
///
/// This is the production probe for the resolver: it asks the environment's
/// own interpreter, so it sees exactly the search paths user code will see.
/// Names that are not plain identifiers never probe true.
pub fn can_import(interpreter: &Path, name: &str) -> bool {
    if !scan::is_identifier(name) {
        return false;
    }

    let probe = format!(
        "import importlib.util, sys; sys.exit(0 if importlib.util.find_spec('{name}') else 1)"
    );

    Command::new(interpreter)
        .arg("-c")
        .arg(probe)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
