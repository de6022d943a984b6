//! Run orchestration.
//!
//! One invocation moves through a fixed sequence: pick the program, locate
//! the virtual environment, create it if needed, activate it (replacing
//! this process), and then — in the re-entered process — resolve missing
//! imports, run the program, and snapshot the installed set. Activation
//! strictly precedes resolution and user code; the snapshot strictly
//! follows them.

use crate::activate::{Activation, Activator};
use crate::cli::Cli;
use crate::error::{AutovenvError, Result};
use crate::index::IndexClient;
use crate::install::PipInstaller;
use crate::mapping::MappingSet;
use crate::resolver::{Resolver, ResolverContext};
use crate::runner::{self, UserProgram};
use crate::snapshot::SnapshotWriter;
use crate::ui::{ColorChoice, Output};
use crate::venv::{self, VenvDescriptor};
use std::path::PathBuf;

/// Execute one autovenv invocation; returns the exit code to propagate.
pub fn run(cli: Cli) -> Result<i32> {
    let out = Output::new(
        cli.quiet,
        ColorChoice::from_flags(cli.color, cli.no_color),
    );

    // Validate the program up front, before any environment work.
    let program = cli.program()?;

    let venv_home = match &cli.venv {
        Some(path) => path.clone(),
        None => default_venv_home(&program),
    };
    let descriptor = VenvDescriptor::new(venv_home, cli.venv_options());

    if !cli.no_venv {
        descriptor.create_if_missing()?;

        let mut activator = Activator::new(
            descriptor.clone(),
            cli.reentry_flags(),
            cli.remainder.clone(),
            false,
        );
        match activator.activate()? {
            // Non-Unix fallback: the re-entered child already did the rest.
            Activation::Completed(code) => return Ok(code),
            // activate() was called with no_venv unset; on Unix a
            // successful exec never returns at all.
            Activation::Skipped => {}
        }
    }

    // Re-entered process (or --no-venv from the start).
    let interpreter = select_interpreter(&descriptor)?;
    tracing::debug!("using interpreter {}", interpreter.display());

    if !cli.no_install {
        let names = program.referenced_names()?;
        if !names.is_empty() {
            tracing::debug!("referenced names: {:?}", names);

            let resolver = Resolver::new(MappingSet::load_defaults());
            let index = IndexClient::new();
            let installer = PipInstaller::new(&interpreter, cli.quiet);

            let probe = |name: &str| runner::can_import(&interpreter, name);
            let search = |name: &str| index.search(name);
            let install = |distribution: &str| {
                out.info(&format!("installing {distribution}"));
                installer.install(distribution)
            };
            let ctx = ResolverContext {
                probe_import: &probe,
                search_index: &search,
                install: &install,
            };

            resolver.resolve_all(&names, &ctx);
        }
    }

    let exit_code = runner::run(&interpreter, &program)?;

    if cli.snapshot_enabled() {
        let writer = SnapshotWriter::new(&interpreter, descriptor.parent_dir());
        if let Err(e) = writer.write() {
            // The user's program already finished; don't fail the run.
            out.warn(&format!("could not write requirements snapshot: {e}"));
        }
    }

    Ok(exit_code)
}

/// Where the environment lives when `--venv` is not given.
///
/// For a script: search upward from the script's directory for an existing
/// `venv`, falling back to a `venv` sibling of the script. Otherwise a
/// `venv` in the current directory.
fn default_venv_home(program: &UserProgram) -> PathBuf {
    if let UserProgram::Script { path, .. } = program {
        let script_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        return venv::find_venv(&script_dir).unwrap_or_else(|| script_dir.join("venv"));
    }
    PathBuf::from("venv")
}

/// The interpreter for the inner phase: the environment's own Python when
/// it exists, otherwise whatever `python3` the PATH provides.
///
/// A directory that exists but holds no interpreter is a broken
/// environment. Falling back to the system Python here would send installs
/// and the freeze outside the environment, so it is an error instead.
fn select_interpreter(descriptor: &VenvDescriptor) -> Result<PathBuf> {
    let interpreter = descriptor.interpreter();
    if interpreter.exists() {
        return Ok(interpreter);
    }
    if descriptor.exists() {
        return Err(AutovenvError::EnvironmentMissing {
            path: descriptor.home().to_path_buf(),
        });
    }
    Ok(PathBuf::from("python3"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_home_searches_upward_from_script_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("venv")).unwrap();
        let nested = temp.path().join("src");
        std::fs::create_dir(&nested).unwrap();
        let script = nested.join("app.py");
        std::fs::write(&script, "").unwrap();

        let program = UserProgram::Script {
            path: script,
            args: vec![],
        };
        assert_eq!(default_venv_home(&program), temp.path().join("venv"));
    }

    #[test]
    fn default_home_falls_back_to_script_sibling() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("app.py");
        std::fs::write(&script, "").unwrap();

        let program = UserProgram::Script {
            path: script,
            args: vec![],
        };
        let home = default_venv_home(&program);
        // Either an existing venv above the tempdir, or the sibling default.
        if home != temp.path().join("venv") {
            assert!(!home.starts_with(temp.path()));
        }
    }

    #[test]
    fn default_home_for_interactive_is_cwd_venv() {
        assert_eq!(default_venv_home(&UserProgram::Interactive), PathBuf::from("venv"));
    }

    #[test]
    fn select_interpreter_prefers_existing_venv_python() {
        let temp = TempDir::new().unwrap();
        let desc = VenvDescriptor::new(temp.path().join("venv"), Default::default());
        std::fs::create_dir_all(desc.bin_dir()).unwrap();
        std::fs::write(desc.interpreter(), "").unwrap();

        assert_eq!(select_interpreter(&desc).unwrap(), desc.interpreter());
    }

    #[test]
    fn select_interpreter_falls_back_to_path_python() {
        let temp = TempDir::new().unwrap();
        let desc = VenvDescriptor::new(temp.path().join("venv"), Default::default());
        assert_eq!(select_interpreter(&desc).unwrap(), PathBuf::from("python3"));
    }

    #[test]
    fn select_interpreter_rejects_broken_environment() {
        let temp = TempDir::new().unwrap();
        let desc = VenvDescriptor::new(temp.path().join("venv"), Default::default());
        // The directory exists but was never populated by venv creation.
        std::fs::create_dir(temp.path().join("venv")).unwrap();

        let err = select_interpreter(&desc).unwrap_err();
        assert!(matches!(err, AutovenvError::EnvironmentMissing { .. }));
    }
}
