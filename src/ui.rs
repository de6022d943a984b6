//! Terminal output.
//!
//! The few user-facing messages this tool prints, with color gated on
//! `--color` / `--no-color` and tty detection. Everything else goes
//! through `tracing`.

use console::style;

/// How to decide whether output gets color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    /// Color when stdout is a terminal (and `NO_COLOR` is unset).
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Derive the choice from the `--color` / `--no-color` flag pair.
    pub fn from_flags(color: bool, no_color: bool) -> Self {
        if no_color {
            ColorChoice::Never
        } else if color {
            ColorChoice::Always
        } else {
            ColorChoice::Auto
        }
    }
}

/// Styled, quiet-aware output handle.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    quiet: bool,
    color: ColorChoice,
}

impl Output {
    pub fn new(quiet: bool, color: ColorChoice) -> Self {
        Self { quiet, color }
    }

    fn colored(&self) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => console::colors_enabled(),
        }
    }

    /// Progress message; suppressed under `--quiet`.
    pub fn info(&self, msg: &str) {
        if self.quiet {
            return;
        }
        if self.colored() {
            println!("{}", style(msg).cyan());
        } else {
            println!("{msg}");
        }
    }

    /// Warning to stderr; suppressed under `--quiet`.
    pub fn warn(&self, msg: &str) {
        if self.quiet {
            return;
        }
        if self.colored() {
            eprintln!("{}", style(msg).yellow());
        } else {
            eprintln!("{msg}");
        }
    }

    /// Error to stderr; never suppressed.
    pub fn error(&self, msg: &str) {
        if self.colored() {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {msg}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_wins_over_color() {
        assert_eq!(ColorChoice::from_flags(true, true), ColorChoice::Never);
    }

    #[test]
    fn color_forces_always() {
        assert_eq!(ColorChoice::from_flags(true, false), ColorChoice::Always);
    }

    #[test]
    fn default_is_auto() {
        assert_eq!(ColorChoice::from_flags(false, false), ColorChoice::Auto);
    }

    #[test]
    fn never_choice_disables_color() {
        let out = Output::new(false, ColorChoice::Never);
        assert!(!out.colored());
    }

    #[test]
    fn always_choice_enables_color() {
        let out = Output::new(false, ColorChoice::Always);
        assert!(out.colored());
    }
}
