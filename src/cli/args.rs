//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros. The
//! surface mirrors `python`'s own: flags first, then the script and its
//! arguments as an opaque tail, with `-c` and `-m` as alternate program
//! forms.

use crate::activate::ReentryFlags;
use crate::error::{AutovenvError, Result};
use crate::runner::UserProgram;
use crate::venv::VenvOptions;
use clap::Parser;
use std::path::PathBuf;

/// Run Python in an auto-managed virtualenv that installs missing imports
/// on demand.
#[derive(Debug, Parser)]
#[command(name = "autovenv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the virtualenv to use or create
    #[arg(short = 'v', long, env = "AUTOVENV_VENV", value_name = "PATH")]
    pub venv: Option<PathBuf>,

    /// Don't create or activate a virtual environment (already in one?)
    #[arg(short = 'n', long)]
    pub no_venv: bool,

    /// Don't write a fresh requirements.txt before exiting
    #[arg(long)]
    pub no_requirements: bool,

    /// Don't install anything, only use the environment (implies --no-requirements)
    #[arg(long)]
    pub no_install: bool,

    /// Show no output while running
    #[arg(short, long)]
    pub quiet: bool,

    /// Show debug information while running
    #[arg(long)]
    pub debug: bool,

    /// Always colorize the output
    #[arg(long, conflicts_with = "no_color")]
    pub color: bool,

    /// Never colorize the output
    #[arg(long)]
    pub no_color: bool,

    /// A single command to run (like python -c)
    #[arg(short = 'c', value_name = "CMD", conflicts_with = "module")]
    pub command: Option<String>,

    /// Run a library module as a script (like python -m)
    #[arg(short = 'm', value_name = "MOD")]
    pub module: Option<String>,

    /// The Python interpreter used to build the environment
    #[arg(short = 'p', long, value_name = "PYTHON")]
    pub python: Option<PathBuf>,

    /// Wipe the environment and start from scratch
    #[arg(long)]
    pub clear: bool,

    /// Give the environment access to the global site-packages
    #[arg(long)]
    pub system_site_packages: bool,

    /// Script to run, followed by its arguments (or arguments to -c/-m)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "SCRIPT [ARGS]")]
    pub remainder: Vec<String>,
}

impl Cli {
    /// The program this invocation asks for.
    ///
    /// A named script must exist; this is checked before any environment
    /// work happens.
    pub fn program(&self) -> Result<UserProgram> {
        if let Some(command) = &self.command {
            return Ok(UserProgram::Command {
                command: command.clone(),
                args: self.remainder.clone(),
            });
        }
        if let Some(module) = &self.module {
            return Ok(UserProgram::Module {
                module: module.clone(),
                args: self.remainder.clone(),
            });
        }
        match self.remainder.split_first() {
            Some((script, args)) => {
                let path = PathBuf::from(script);
                if !path.exists() {
                    return Err(AutovenvError::ScriptNotFound { path });
                }
                Ok(UserProgram::Script {
                    path,
                    args: args.to_vec(),
                })
            }
            None => Ok(UserProgram::Interactive),
        }
    }

    /// Options forwarded to the environment builder.
    pub fn venv_options(&self) -> VenvOptions {
        VenvOptions {
            clear: self.clear,
            system_site_packages: self.system_site_packages,
            python: self.python.clone(),
        }
    }

    /// Flags that must survive the re-exec boundary.
    pub fn reentry_flags(&self) -> ReentryFlags {
        ReentryFlags {
            quiet: self.quiet,
            debug: self.debug,
            no_install: self.no_install,
            no_requirements: self.no_requirements,
            color: self.color,
            no_color: self.no_color,
            clear: self.clear,
            system_site_packages: self.system_site_packages,
            python: self.python.clone(),
            command: self.command.clone(),
            module: self.module.clone(),
        }
    }

    /// Whether a requirements snapshot should be written for this run.
    /// `--no-install` implies no snapshot: nothing can have changed.
    pub fn snapshot_enabled(&self) -> bool {
        !self.no_requirements && !self.no_install
    }
}
