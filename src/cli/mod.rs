//! Command-line interface for autovenv.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`run`] - Orchestration of one invocation

pub mod args;
mod run;

pub use args::Cli;
pub use run::run;
