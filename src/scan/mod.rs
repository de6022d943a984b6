//! Static import scanning.
//!
//! A compiled wrapper cannot intercept CPython's import machinery at run
//! time, so missing dependencies are found up front instead: the program
//! source is scanned for `import` statements and every referenced top-level
//! name is handed to the resolver before the program runs.
//!
//! The scan is deliberately textual and best-effort. It catches the import
//! forms real scripts use (module-level or indented, aliased, dotted,
//! comma-separated) and ignores what it cannot know statically
//! (`importlib.import_module("x")`, `__import__`). A missed name simply
//! fails at run time with the ordinary `ImportError`, the same outcome as
//! running without autovenv.

use regex::Regex;
use std::sync::OnceLock;

fn import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*import\s+([^\n#;]+)").expect("valid regex"))
}

fn from_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*from\s+([A-Za-z_][A-Za-z0-9_.]*)\s+import\b").expect("valid regex")
    })
}

/// Extract the top-level names referenced by `import` statements in
/// Python source, in order of first appearance, deduplicated.
///
/// Dotted imports contribute their first segment (`import a.b` references
/// top-level `a`); relative imports (`from . import x`) contribute nothing.
///
/// # Example
///
/// ```
/// use autovenv::scan::referenced_names;
///
/// let names = referenced_names("import os, requests\nfrom flask import Flask\n");
/// assert_eq!(names, vec!["os", "requests", "flask"]);
/// ```
pub fn referenced_names(source: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    // Walk line by line so `import` and `from` hits stay in source order.
    for line in source.lines() {
        if let Some(caps) = import_re().captures(line) {
            for part in caps[1].split(',') {
                let token = part.split_whitespace().next().unwrap_or("");
                push_top_level(&mut names, token);
            }
        } else if let Some(caps) = from_import_re().captures(line) {
            push_top_level(&mut names, &caps[1]);
        }
    }

    names
}

/// Extract the top-level name from a dotted module path on the command line
/// (`-m module` / `-m package.module`).
pub fn module_top_level(module: &str) -> Option<String> {
    let mut names = Vec::new();
    push_top_level(&mut names, module);
    names.pop()
}

fn push_top_level(names: &mut Vec<String>, token: &str) {
    let top = token.split('.').next().unwrap_or("");
    if is_identifier(top) && !names.iter().any(|n| n == top) {
        names.push(top.to_string());
    }
}

/// Whether `s` is a plain Python identifier.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
