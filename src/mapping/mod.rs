//! Import-name to distribution-name mapping.
//!
//! Python import names frequently differ from the name pip installs them
//! under (`yaml` vs `PyYAML`, `cv2` vs `opencv-python`). Mapping files
//! record those divergences, one rule per line, and can also mark a name as
//! never-auto-install with a leading `-`.
//!
//! Two sources are loaded in order: the mapping file packaged with the
//! binary, then the user's override at `~/.config/autovenv/mappings.txt`.
//! Later sources override earlier ones for the same name.

use std::collections::HashMap;
use std::path::Path;

/// Default mapping rules shipped with the binary.
const DEFAULT_MAPPINGS: &str = include_str!("../../assets/mappings.txt");

/// Result of looking up an import name in the loaded mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The name maps to this distribution name.
    Mapped(String),
    /// The name is marked never-auto-install. Callers must suppress
    /// resolution entirely, even if the name exists in the package index.
    Ignore,
    /// No rule for this name; fall through to an index lookup.
    Unmapped,
}

/// Entry stored per import name.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Distribution(String),
    Ignore,
}

/// An ordered collection of mapping sources.
///
/// Loaded once at startup and immutable afterward.
///
/// # Example
///
/// ```
/// use autovenv::mapping::{Lookup, MappingSet};
///
/// let mut mappings = MappingSet::new();
/// mappings.load_str("yaml PyYAML\n-graphics\n");
/// assert_eq!(mappings.get("yaml"), Lookup::Mapped("PyYAML".into()));
/// assert_eq!(mappings.get("graphics"), Lookup::Ignore);
/// assert_eq!(mappings.get("requests"), Lookup::Unmapped);
/// ```
#[derive(Debug, Default)]
pub struct MappingSet {
    entries: HashMap<String, Entry>,
}

impl MappingSet {
    /// Create an empty mapping set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the standard sources: the packaged defaults, then the user's
    /// override file (silently skipped when absent).
    pub fn load_defaults() -> Self {
        let mut set = Self::new();
        set.load_str(DEFAULT_MAPPINGS);

        if let Some(config_dir) = dirs::config_dir() {
            set.load_file(config_dir.join("autovenv").join("mappings.txt"));
        }

        set
    }

    /// Load a mapping file. A missing file is not an error; the source is
    /// skipped and the set is left unchanged.
    pub fn load_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                tracing::debug!("loading mapping file {}", path.display());
                self.load_str(&content);
            }
            Err(_) => {
                tracing::debug!("mapping file {} not readable, skipping", path.display());
            }
        }
    }

    /// Load mapping rules from a string.
    ///
    /// Blank lines and `#` comments (full-line or trailing) are stripped.
    /// `-name` registers an ignore entry. `name distro` registers a mapping.
    /// Malformed lines are skipped without failing the load.
    pub fn load_str(&mut self, content: &str) {
        for line in content.lines() {
            let line = match line.find('#') {
                Some(idx) => &line[..idx],
                None => line,
            };
            let mut tokens = line.split_whitespace();

            let Some(first) = tokens.next() else {
                continue;
            };

            if let Some(name) = first.strip_prefix('-') {
                if !name.is_empty() {
                    self.entries.insert(name.to_string(), Entry::Ignore);
                }
                continue;
            }

            // Two tokens required for a mapping rule; anything else is
            // malformed and skipped.
            let Some(distro) = tokens.next() else {
                tracing::debug!("skipping malformed mapping line: {:?}", line.trim());
                continue;
            };

            self.entries
                .insert(first.to_string(), Entry::Distribution(distro.to_string()));
        }
    }

    /// Look up the distribution name for an import name.
    pub fn get(&self, import_name: &str) -> Lookup {
        match self.entries.get(import_name) {
            Some(Entry::Distribution(distro)) => Lookup::Mapped(distro.clone()),
            Some(Entry::Ignore) => Lookup::Ignore,
            None => Lookup::Unmapped,
        }
    }

    /// Number of loaded rules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any rules are loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn maps_two_token_lines() {
        let mut set = MappingSet::new();
        set.load_str("flask Flask\nyaml PyYAML\n");
        assert_eq!(set.get("flask"), Lookup::Mapped("Flask".into()));
        assert_eq!(set.get("yaml"), Lookup::Mapped("PyYAML".into()));
    }

    #[test]
    fn leading_dash_registers_ignore() {
        let mut set = MappingSet::new();
        set.load_str("-graphics\n");
        assert_eq!(set.get("graphics"), Lookup::Ignore);
    }

    #[test]
    fn unknown_name_is_unmapped() {
        let set = MappingSet::new();
        assert_eq!(set.get("requests"), Lookup::Unmapped);
    }

    #[test]
    fn strips_full_line_comments() {
        let mut set = MappingSet::new();
        set.load_str("# this is a comment\nflask Flask\n");
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("flask"), Lookup::Mapped("Flask".into()));
    }

    #[test]
    fn strips_trailing_comments() {
        let mut set = MappingSet::new();
        set.load_str("yaml PyYAML # install name differs\n");
        assert_eq!(set.get("yaml"), Lookup::Mapped("PyYAML".into()));
    }

    #[test]
    fn skips_blank_lines() {
        let mut set = MappingSet::new();
        set.load_str("\n\n  \nflask Flask\n\n");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn skips_malformed_single_token_lines() {
        let mut set = MappingSet::new();
        set.load_str("orphan\nflask Flask\n");
        assert_eq!(set.get("orphan"), Lookup::Unmapped);
        assert_eq!(set.get("flask"), Lookup::Mapped("Flask".into()));
    }

    #[test]
    fn skips_bare_dash() {
        let mut set = MappingSet::new();
        set.load_str("-\n");
        assert!(set.is_empty());
    }

    #[test]
    fn later_source_overrides_earlier() {
        let mut set = MappingSet::new();
        set.load_str("yaml PyYAML\n");
        set.load_str("yaml ruamel.yaml\n");
        assert_eq!(set.get("yaml"), Lookup::Mapped("ruamel.yaml".into()));
    }

    #[test]
    fn later_source_can_override_with_ignore() {
        let mut set = MappingSet::new();
        set.load_str("yaml PyYAML\n");
        set.load_str("-yaml\n");
        assert_eq!(set.get("yaml"), Lookup::Ignore);
    }

    #[test]
    fn missing_file_is_silently_skipped() {
        let temp = TempDir::new().unwrap();
        let mut set = MappingSet::new();
        set.load_file(temp.path().join("does-not-exist.txt"));
        assert!(set.is_empty());
    }

    #[test]
    fn loads_rules_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mappings.txt");
        std::fs::write(&path, "bs4 beautifulsoup4\n-tkinter\n").unwrap();

        let mut set = MappingSet::new();
        set.load_file(&path);

        assert_eq!(set.get("bs4"), Lookup::Mapped("beautifulsoup4".into()));
        assert_eq!(set.get("tkinter"), Lookup::Ignore);
    }

    #[test]
    fn packaged_defaults_parse() {
        let mut set = MappingSet::new();
        set.load_str(DEFAULT_MAPPINGS);
        assert!(!set.is_empty());
        // A few well-known divergences shipped in the default file.
        assert_eq!(set.get("yaml"), Lookup::Mapped("PyYAML".into()));
        assert_eq!(set.get("cv2"), Lookup::Mapped("opencv-python".into()));
    }
}
