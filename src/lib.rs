//! autovenv - run Python in an auto-managed virtual environment.
//!
//! autovenv wraps a Python interpreter: it finds or creates a virtualenv,
//! re-executes itself inside it, installs any missing imports the user's
//! program references, runs the program, and writes a `requirements.txt`
//! snapshot of the installed set on the way out.
//!
//! # Modules
//!
//! - [`activate`] - Environment activation by process replacement
//! - [`cli`] - Command-line interface and run orchestration
//! - [`error`] - Error types and result aliases
//! - [`index`] - Exact-match package index lookups
//! - [`install`] - Distribution installation via pip
//! - [`mapping`] - Import-name to distribution-name mapping files
//! - [`resolver`] - Missing-import resolution
//! - [`runner`] - User program execution
//! - [`scan`] - Static import scanning
//! - [`snapshot`] - Requirements snapshot on exit
//! - [`ui`] - Terminal output
//! - [`venv`] - Virtual environment location and creation
//!
//! # Example
//!
//! ```
//! use autovenv::mapping::{Lookup, MappingSet};
//! use autovenv::scan::referenced_names;
//!
//! // What does this script need, and what do we install for it?
//! let names = referenced_names("import yaml\n");
//! let mappings = MappingSet::load_defaults();
//! assert_eq!(mappings.get(&names[0]), Lookup::Mapped("PyYAML".into()));
//! ```

pub mod activate;
pub mod cli;
pub mod error;
pub mod index;
pub mod install;
pub mod mapping;
pub mod resolver;
pub mod runner;
pub mod scan;
pub mod snapshot;
pub mod ui;
pub mod venv;

pub use error::{AutovenvError, Result};
