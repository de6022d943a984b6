//! Missing-import resolution.
//!
//! For each top-level name the user's program references, the resolver
//! decides whether anything needs installing before the program runs:
//!
//! 1. If the name already imports in the target environment, do nothing.
//!    No mapping lookup, no network, no install.
//! 2. Otherwise consult the mapping set. An ignore entry suppresses
//!    resolution unconditionally; a mapped entry names the install target.
//! 3. Otherwise ask the package index for an exact match on the name
//!    itself; a hit makes the name its own install target.
//! 4. Install the target, if any. An install failure is logged and
//!    absorbed; the program will fail with the ordinary `ImportError`
//!    it would have produced anyway.
//!
//! Dotted names are never acted on; only top-level simple names resolve.
//!
//! Collaborators are injected as closures so the decision ladder can be
//! exercised without a network or a Python interpreter.

use crate::error::Result;
use crate::mapping::{Lookup, MappingSet};

/// Outcome of one resolution attempt. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The name already imports; nothing was done.
    AlreadyAvailable,
    /// An ignore rule suppressed resolution.
    Ignored,
    /// The named distribution was installed.
    Installed(String),
    /// No install target was determined (or the install failed); the
    /// import will fail through normal channels.
    NotFound,
}

/// Injected collaborators for the resolver.
pub struct ResolverContext<'a> {
    /// Whether a name currently imports in the target environment.
    pub probe_import: &'a dyn Fn(&str) -> bool,
    /// Whether a name exists in the package index as an exact match.
    pub search_index: &'a dyn Fn(&str) -> bool,
    /// Install a distribution into the target environment.
    pub install: &'a dyn Fn(&str) -> Result<()>,
}

/// Resolves missing imports against the mapping set and package index.
pub struct Resolver {
    mappings: MappingSet,
}

impl Resolver {
    /// Create a resolver over a loaded mapping set.
    pub fn new(mappings: MappingSet) -> Self {
        Self { mappings }
    }

    /// Resolve a single referenced name.
    pub fn resolve(&self, name: &str, ctx: &ResolverContext<'_>) -> Resolution {
        // Compound names pass through untouched.
        if name.contains('.') {
            return Resolution::NotFound;
        }

        if (ctx.probe_import)(name) {
            tracing::debug!("'{}' already importable, nothing to do", name);
            return Resolution::AlreadyAvailable;
        }

        let target = match self.mappings.get(name) {
            Lookup::Ignore => {
                tracing::debug!("'{}' is marked never-auto-install, ignoring", name);
                return Resolution::Ignored;
            }
            Lookup::Mapped(distro) => {
                tracing::debug!("'{}' maps to distribution '{}'", name, distro);
                distro
            }
            Lookup::Unmapped => {
                if !(ctx.search_index)(name) {
                    tracing::debug!("'{}' not found in package index", name);
                    return Resolution::NotFound;
                }
                name.to_string()
            }
        };

        match (ctx.install)(&target) {
            Ok(()) => Resolution::Installed(target),
            Err(e) => {
                // Absorbed: the subsequent import fails naturally.
                tracing::warn!("install of '{}' failed: {}", target, e);
                Resolution::NotFound
            }
        }
    }

    /// Resolve every referenced name in order.
    ///
    /// Duplicate names collapse: once a name is installed, the next probe
    /// finds it importable and skips installation.
    pub fn resolve_all(&self, names: &[String], ctx: &ResolverContext<'_>) -> Vec<Resolution> {
        names
            .iter()
            .map(|name| {
                let resolution = self.resolve(name, ctx);
                if let Resolution::Installed(distro) = &resolution {
                    tracing::info!("installed '{}' for import '{}'", distro, name);
                }
                resolution
            })
            .collect()
    }
}
