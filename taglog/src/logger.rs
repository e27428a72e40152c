//! The tagged console logger.

use crate::color::{ColorDefinition, ColorRegistry, Rgb, Role};
use crate::config::{check_time_format, LoggerConfig, DEFAULT_TIME_FORMAT};
use crate::console::{ConsoleSink, Severity, StdConsole};
use crate::error::{ColorError, TaglogError};
use crate::label::format_label;
use crate::render::{compose, timestamp, Line, ModePolicy};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Writes `time [LABEL] message` lines with per-severity colors.
///
/// ```
/// use serde_json::json;
/// use taglog::Logger;
///
/// let logger = Logger::new("HttpServer", Some(1));
/// assert_eq!(logger.label(), "HTTP-SERVER-01");
/// logger.info(&[json!("listening on port %d"), json!(8080)]);
/// ```
#[derive(Clone)]
pub struct Logger {
    label: String,
    colors: ColorRegistry,
    sink: Arc<dyn ConsoleSink>,
    mode: ModePolicy,
    time_format: String,
}

impl Logger {
    /// Creates a logger for `name` writing to the process console.
    pub fn new(name: &str, ordinal: Option<u64>) -> Self {
        Self::with_sink(name, ordinal, Arc::new(StdConsole))
    }

    pub fn with_sink(name: &str, ordinal: Option<u64>, sink: Arc<dyn ConsoleSink>) -> Self {
        Self {
            label: format_label(name, ordinal),
            colors: ColorRegistry::default(),
            sink,
            mode: ModePolicy::Auto,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }

    /// Creates a console logger and applies `config` on top of the defaults.
    pub fn from_config(
        name: &str,
        ordinal: Option<u64>,
        config: &LoggerConfig,
    ) -> Result<Self, TaglogError> {
        Self::new(name, ordinal).configured(config)
    }

    /// Applies time format, mode and color overrides from `config`.
    pub fn configured(mut self, config: &LoggerConfig) -> Result<Self, TaglogError> {
        config.apply_colors(&mut self.colors)?;
        self.mode = config.mode;
        self.time_format = config.time_format.clone();
        Ok(self)
    }

    pub fn with_mode(mut self, mode: ModePolicy) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the strftime pattern for timestamps. A pattern chrono cannot
    /// format is replaced by [`DEFAULT_TIME_FORMAT`].
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        let format = format.into();
        self.time_format = match check_time_format(&format) {
            Ok(()) => format,
            Err(e) => {
                tracing::warn!("{}, using \"{}\"", e, DEFAULT_TIME_FORMAT);
                DEFAULT_TIME_FORMAT.to_string()
            }
        };
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn mode(&self) -> ModePolicy {
        self.mode
    }

    pub fn color(&self, role: Role) -> &ColorDefinition {
        self.colors.get(role)
    }

    /// Sets the color of one part of the line.
    ///
    /// `role` is one of `prefix`, `log`, `info`, `debug`, `warn` or `error`;
    /// each channel must be an integer in the range 0 to 255.
    pub fn set_color(&mut self, role: &str, r: f64, g: f64, b: f64) -> Result<(), ColorError> {
        self.colors.set_color(role, r, g, b)
    }

    /// Typed variant of [`set_color`](Self::set_color) that cannot fail.
    pub fn set_rgb(&mut self, role: Role, rgb: Rgb) {
        self.colors.set(role, rgb);
    }

    pub fn log(&self, args: &[Value]) {
        self.print(Severity::Log, args);
    }

    pub fn info(&self, args: &[Value]) {
        self.print(Severity::Info, args);
    }

    pub fn debug(&self, args: &[Value]) {
        self.print(Severity::Debug, args);
    }

    pub fn warn(&self, args: &[Value]) {
        self.print(Severity::Warn, args);
    }

    pub fn error(&self, args: &[Value]) {
        self.print(Severity::Error, args);
    }

    /// Lays out a line for `severity` without writing it.
    pub fn render(&self, severity: Severity, args: &[Value]) -> Line {
        let mode = self.mode.resolve(|| self.sink.color_level());
        compose(
            mode,
            self.colors.get(Role::Prefix),
            self.colors.get(role_of(severity)),
            &timestamp(&self.time_format),
            &self.label,
            args,
        )
    }

    fn print(&self, severity: Severity, args: &[Value]) {
        let Line { template, args } = self.render(severity, args);
        let sink = self.sink.as_ref();
        match severity {
            Severity::Log => sink.log(&template, &args),
            Severity::Info => sink.info(&template, &args),
            Severity::Debug => sink.debug(&template, &args),
            Severity::Warn => sink.warn(&template, &args),
            Severity::Error => sink.error(&template, &args),
        }
    }
}

fn role_of(severity: Severity) -> Role {
    match severity {
        Severity::Log => Role::Log,
        Severity::Info => Role::Info,
        Severity::Debug => Role::Debug,
        Severity::Warn => Role::Warn,
        Severity::Error => Role::Error,
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("label", &self.label)
            .field("mode", &self.mode)
            .field("time_format", &self.time_format)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{ColorLevel, MemorySink};
    use serde_json::json;

    fn capture(level: ColorLevel) -> (Arc<MemorySink>, Logger) {
        let sink = Arc::new(MemorySink::new(level));
        let logger = Logger::with_sink("HttpServer", Some(3), sink.clone());
        (sink, logger)
    }

    #[test]
    fn test_label_from_name_and_ordinal() {
        assert_eq!(Logger::new("HttpServer", None).label(), "HTTP-SERVER");
        assert_eq!(Logger::new("HttpServer", Some(3)).label(), "HTTP-SERVER-03");
    }

    #[test]
    fn test_each_severity_uses_its_writer_and_color() {
        let (sink, logger) = capture(ColorLevel::None);
        logger.log(&[json!("a")]);
        logger.info(&[json!("b")]);
        logger.debug(&[json!("c")]);
        logger.warn(&[json!("d")]);
        logger.error(&[json!("e")]);

        let records = sink.take();
        let severities: Vec<_> = records.iter().map(|r| r.severity).collect();
        assert_eq!(severities, Severity::ALL.to_vec());

        let role_css: Vec<_> = records.iter().map(|r| r.args[3].clone()).collect();
        assert_eq!(
            role_css,
            vec![
                json!("color: rgb(144, 238, 144)"),
                json!("color: rgb(128, 128, 128)"),
                json!("color: rgb(128, 128, 128)"),
                json!("color: rgb(255, 255, 224)"),
                json!("color: rgb(255, 0, 0)"),
            ]
        );
    }

    #[test]
    fn test_mode_follows_sink_on_every_call() {
        let (sink, logger) = capture(ColorLevel::None);
        logger.info(&[json!("first")]);
        sink.set_color_level(ColorLevel::TrueColor);
        logger.info(&[json!("second")]);

        let records = sink.take();
        assert!(records[0].template.starts_with("%c%s%c"));
        assert_eq!(records[1].template, "%s [%s] second");
    }

    #[test]
    fn test_forced_mode_ignores_sink() {
        let (sink, logger) = capture(ColorLevel::TrueColor);
        let logger = logger.with_mode(ModePolicy::Styled);
        logger.warn(&[json!("careful")]);
        assert_eq!(sink.take()[0].template, "%c%s%c [%c%s%c] careful");
    }

    #[test]
    fn test_set_color_changes_later_lines() {
        let (sink, mut logger) = capture(ColorLevel::None);
        logger.set_color("error", 1.0, 2.0, 3.0).unwrap();
        logger.error(&[json!("x")]);
        assert_eq!(sink.take()[0].args[3], json!("color: rgb(1, 2, 3)"));
    }

    #[test]
    fn test_rendered_line_in_styled_mode() {
        let (sink, logger) = capture(ColorLevel::None);
        let logger = logger.with_time_format("T");
        logger.log(&[json!("%s=%d"), json!("n"), json!(5)]);
        assert_eq!(sink.take()[0].rendered(), "T [HTTP-SERVER-03] n=5");
    }

    #[test]
    fn test_logger_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Logger>();
    }
}
