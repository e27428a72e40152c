//! Line rendering.
//!
//! Every severity call goes through [`compose`], which lays out the
//! timestamp and label in one of two [`RenderMode`]s and splices the caller's
//! pattern into the template.

use crate::color::ColorDefinition;
use crate::config::DEFAULT_TIME_FORMAT;
use crate::console::ColorLevel;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write;

/// CSS directive that ends a `%c` styled run.
pub const CSS_RESET: &str = "color: unset";

/// How a line carries its colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// ANSI escapes baked into the timestamp and label, reduced to the
    /// given color depth.
    Ansi(ColorLevel),
    /// `%c` directives with CSS arguments, for consoles without ANSI support.
    Styled,
}

impl RenderMode {
    pub fn for_level(level: ColorLevel) -> Self {
        if level.has_color() {
            RenderMode::Ansi(level)
        } else {
            RenderMode::Styled
        }
    }
}

/// Which [`RenderMode`] a logger uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModePolicy {
    /// Ask the sink on every call.
    #[default]
    Auto,
    Ansi,
    Styled,
}

impl ModePolicy {
    /// Resolves the mode for one call. `level` is only consulted for `Auto`;
    /// a forced ANSI mode paints in full 24-bit color.
    pub fn resolve(self, level: impl FnOnce() -> ColorLevel) -> RenderMode {
        match self {
            ModePolicy::Auto => RenderMode::for_level(level()),
            ModePolicy::Ansi => RenderMode::Ansi(ColorLevel::TrueColor),
            ModePolicy::Styled => RenderMode::Styled,
        }
    }
}

/// A fully laid out call, ready for a sink writer.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub template: String,
    pub args: Vec<Value>,
}

/// Lays out one log line.
///
/// A leading string in `args` is the message pattern: it is appended to the
/// template and dropped from the positional arguments. Any other leading
/// value leaves the template without pattern text and all of `args` is
/// forwarded.
pub fn compose(
    mode: RenderMode,
    prefix: &ColorDefinition,
    color: &ColorDefinition,
    timestamp: &str,
    label: &str,
    args: &[Value],
) -> Line {
    let (pattern, rest) = match args.split_first() {
        Some((Value::String(pattern), rest)) => (pattern.as_str(), rest),
        _ => ("", args),
    };

    let (template, mut positional) = match mode {
        RenderMode::Styled => (
            format!("%c%s%c [%c%s%c] {}", pattern),
            vec![
                Value::from(format!("color: {}", prefix.css())),
                Value::from(timestamp),
                Value::from(CSS_RESET),
                Value::from(format!("color: {}", color.css())),
                Value::from(label),
                Value::from(CSS_RESET),
            ],
        ),
        RenderMode::Ansi(depth) => (
            format!("%s [%s] {}", pattern),
            vec![
                Value::from(prefix.paint(timestamp, depth)),
                Value::from(color.paint(label, depth)),
            ],
        ),
    };
    positional.extend_from_slice(rest);

    Line {
        template,
        args: positional,
    }
}

/// Current local time of day, formatted with a chrono strftime pattern.
///
/// A pattern chrono cannot render falls back to
/// [`DEFAULT_TIME_FORMAT`] instead of failing the log call.
pub fn timestamp(format: &str) -> String {
    let now = chrono::Local::now();
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", now.format(DEFAULT_TIME_FORMAT));
    }
    out
}
