//! # Console Output
//!
//! Decides whether `docprep` decorates its summaries with color and emoji, and
//! provides the markers used in those summaries.
//!
//! The decision follows the usual conventions:
//! - `--color=never|always|auto` on the command line
//! - `NO_COLOR` set (any value) disables decoration (https://no-color.org/)
//! - `CLICOLOR=0` disables it, `CLICOLOR_FORCE=1` forces it on
//! - `TERM=dumb` disables it
//! - otherwise, decoration is used when stdout is a color-capable terminal
//!
//! The same decision drives `env_logger`'s write style, so log lines and
//! summaries agree.

use std::env;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from the environment and the value of
    /// the `--color` flag (`always`, `never` or `auto`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Marker printed in front of a summary line.
    pub fn marker(&self, status: Status) -> &'static str {
        match (status, self.use_color) {
            (Status::Start, true) => "📚",
            (Status::Start, false) => "[DOCS]",
            (Status::Done, true) => "✅",
            (Status::Done, false) => "[OK]",
            (Status::Failed, true) => "❌",
            (Status::Failed, false) => "[FAIL]",
            (Status::Item, true) => "  •",
            (Status::Item, false) => "  -",
        }
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Kinds of summary lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Start,
    Done,
    Failed,
    Item,
}
