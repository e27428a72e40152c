//! Console sinks.
//!
//! A [`ConsoleSink`] is the output facility a [`Logger`](crate::Logger)
//! renders into. It receives a template plus positional arguments, the same
//! shape a browser or Node console accepts, and reports how many colors the
//! destination supports.

use serde_json::Value;
use std::env;
use std::io::{self, Write};
use std::sync::Mutex;

/// Severity of a single call; each maps onto one sink writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Log,
    Info,
    Debug,
    Warn,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Log,
        Severity::Info,
        Severity::Debug,
        Severity::Warn,
        Severity::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Log => "log",
            Severity::Info => "info",
            Severity::Debug => "debug",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

/// ANSI color support of an output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColorLevel {
    /// No escape sequences; rendering falls back to `%c` directives.
    None = 0,
    Basic = 1,
    Ansi256 = 2,
    TrueColor = 3,
}

impl ColorLevel {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => ColorLevel::None,
            1 => ColorLevel::Basic,
            2 => ColorLevel::Ansi256,
            _ => ColorLevel::TrueColor,
        }
    }

    pub fn has_color(self) -> bool {
        self != ColorLevel::None
    }
}

/// Output facility behind a logger.
///
/// Implementations must be `Send + Sync` so a logger can be shared across
/// threads. Only [`write`](ConsoleSink::write) and
/// [`color_level`](ConsoleSink::color_level) are required; the per-severity
/// writers delegate to it.
pub trait ConsoleSink: Send + Sync {
    /// Current color support. Queried on every call, never cached.
    fn color_level(&self) -> ColorLevel;

    fn write(&self, severity: Severity, template: &str, args: &[Value]);

    fn log(&self, template: &str, args: &[Value]) {
        self.write(Severity::Log, template, args);
    }

    fn info(&self, template: &str, args: &[Value]) {
        self.write(Severity::Info, template, args);
    }

    fn debug(&self, template: &str, args: &[Value]) {
        self.write(Severity::Debug, template, args);
    }

    fn warn(&self, template: &str, args: &[Value]) {
        self.write(Severity::Warn, template, args);
    }

    fn error(&self, template: &str, args: &[Value]) {
        self.write(Severity::Error, template, args);
    }
}

/// Process stdout/stderr.
///
/// `log`, `info` and `debug` go to stdout, `warn` and `error` to stderr.
/// Templates are resolved with [`format_template`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }

    fn is_stderr(severity: Severity) -> bool {
        matches!(severity, Severity::Warn | Severity::Error)
    }
}

impl ConsoleSink for StdConsole {
    fn color_level(&self) -> ColorLevel {
        let stream = if atty::is(atty::Stream::Stdout) {
            Some(detect_terminal_level())
        } else {
            None
        };
        resolve_color_level(
            env::var("FORCE_COLOR").ok().as_deref(),
            env::var_os("NO_COLOR").is_some(),
            stream,
        )
    }

    fn write(&self, severity: Severity, template: &str, args: &[Value]) {
        let line = format_template(template, args);
        // a closed pipe must not take the caller down with it
        if Self::is_stderr(severity) {
            let _ = writeln!(io::stderr().lock(), "{}", line);
        } else {
            let _ = writeln!(io::stdout().lock(), "{}", line);
        }
    }
}

fn detect_terminal_level() -> ColorLevel {
    let term = env::var("TERM").unwrap_or_default();
    if term == "dumb" {
        return ColorLevel::None;
    }
    let colorterm = env::var("COLORTERM").unwrap_or_default();
    if colorterm == "truecolor" || colorterm == "24bit" {
        ColorLevel::TrueColor
    } else if term.contains("256") {
        ColorLevel::Ansi256
    } else {
        ColorLevel::Basic
    }
}

/// Combines the environment overrides with the level detected for a tty.
///
/// `terminal` is `None` when the stream is not a terminal. `FORCE_COLOR`
/// wins over everything, then `NO_COLOR`.
pub(crate) fn resolve_color_level(
    force_color: Option<&str>,
    no_color: bool,
    terminal: Option<ColorLevel>,
) -> ColorLevel {
    if let Some(force) = force_color {
        return match force.trim() {
            "" | "true" => ColorLevel::Basic,
            "false" => ColorLevel::None,
            other => other
                .parse::<u8>()
                .map(ColorLevel::from_level)
                .unwrap_or(ColorLevel::Basic),
        };
    }
    if no_color {
        return ColorLevel::None;
    }
    terminal.unwrap_or(ColorLevel::None)
}

/// Resolves console-style substitutions in `template`.
///
/// Supported directives are `%s`, `%d`, `%i`, `%f`, `%j`, `%o`, `%O`, `%c`
/// and `%%`. `%c` consumes its argument and prints nothing. Directives
/// without a remaining argument are printed verbatim, and arguments left
/// over after the template are appended separated by spaces.
pub fn format_template(template: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(&spec) = chars.peek() else {
            out.push('%');
            break;
        };
        match spec {
            '%' => {
                chars.next();
                out.push('%');
            }
            's' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O' | 'c' => {
                chars.next();
                match rest.next() {
                    Some(arg) => substitute(&mut out, spec, arg),
                    None => {
                        out.push('%');
                        out.push(spec);
                    }
                }
            }
            _ => out.push('%'),
        }
    }

    for arg in rest {
        out.push(' ');
        out.push_str(&display_value(arg));
    }
    out
}

fn substitute(out: &mut String, spec: char, arg: &Value) {
    match spec {
        's' => out.push_str(&display_value(arg)),
        'd' | 'i' | 'f' => out.push_str(&numeric_value(spec, arg)),
        'j' | 'o' | 'O' => out.push_str(&arg.to_string()),
        // styling only means something to a browser console
        'c' => {}
        _ => unreachable!("unsupported directive %{spec}"),
    }
}

/// Strings print bare, everything else as JSON.
fn display_value(arg: &Value) -> String {
    match arg {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn numeric_value(spec: char, arg: &Value) -> String {
    let number = match arg {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    match number {
        Some(n) if spec == 'i' && n.is_finite() => (n.trunc() as i64).to_string(),
        Some(n) if spec != 'i' => n.to_string(),
        _ => "NaN".to_string(),
    }
}

/// A call captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub severity: Severity,
    pub template: String,
    pub args: Vec<Value>,
}

impl Record {
    /// The line as [`StdConsole`] would print it.
    pub fn rendered(&self) -> String {
        format_template(&self.template, &self.args)
    }
}

/// Sink that keeps every call in memory.
#[derive(Debug)]
pub struct MemorySink {
    level: Mutex<ColorLevel>,
    records: Mutex<Vec<Record>>,
}

impl MemorySink {
    pub fn new(level: ColorLevel) -> Self {
        Self {
            level: Mutex::new(level),
            records: Mutex::new(Vec::new()),
        }
    }

    /// Changes the reported color level for subsequent calls.
    pub fn set_color_level(&self, level: ColorLevel) {
        *self.level.lock().unwrap_or_else(|e| e.into_inner()) = level;
    }

    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn take(&self) -> Vec<Record> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl ConsoleSink for MemorySink {
    fn color_level(&self) -> ColorLevel {
        *self.level.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self, severity: Severity, template: &str, args: &[Value]) {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Record {
                severity,
                template: template.to_string(),
                args: args.to_vec(),
            });
    }
}
