use crate::color::{ColorRegistry, Role};
use crate::config::DEFAULT_TIME_FORMAT;
use crate::console::ColorLevel;
use crate::label::format_label;
use crate::render::timestamp;
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    EnvFilter,
};

/// Installs the global `tracing` subscriber used for diagnostics.
///
/// Events print as `time [TARGET] message` on stderr, colored the same way
/// as [`Logger`](crate::Logger) lines. The filter comes from `RUST_LOG` and
/// defaults to `warn`. Returns `false` if a global subscriber was already
/// installed.
pub fn setup_logger() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .event_format(TaggedFormatter::default());

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init()
        .is_ok()
}

// --- Formatters ---

struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// Formats `tracing` events in the tagged console style.
///
/// The label is the last path segment of the event target, so events from
/// `taglog::binder` show up as `[BINDER]`.
#[derive(Debug, Clone)]
pub struct TaggedFormatter {
    colors: ColorRegistry,
    time_format: String,
}

impl Default for TaggedFormatter {
    fn default() -> Self {
        Self {
            colors: ColorRegistry::default(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl TaggedFormatter {
    fn role(level: &Level) -> Role {
        match *level {
            Level::ERROR => Role::Error,
            Level::WARN => Role::Warn,
            Level::INFO => Role::Info,
            _ => Role::Debug,
        }
    }

    fn label(target: &str) -> String {
        let last = target.rsplit("::").next().unwrap_or(target);
        // module paths are snake_case, so split on underscores instead
        format_label(&last.replace('_', "-"), None)
    }

    fn format_line(&self, ansi: bool, level: &Level, target: &str, message: &str) -> String {
        let ts = timestamp(&self.time_format);
        let label = Self::label(target);
        if ansi {
            format!(
                "{} [{}] {}",
                self.colors.get(Role::Prefix).paint(&ts, ColorLevel::TrueColor),
                self.colors.get(Self::role(level)).paint(&label, ColorLevel::TrueColor),
                message
            )
        } else {
            format!("{} [{}] {}", ts, label, message)
        }
    }
}

impl<S, N> FormatEvent<S, N> for TaggedFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut msg_visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut msg_visitor);

        let metadata = event.metadata();
        let line = self.format_line(
            writer.has_ansi_escapes(),
            metadata.level(),
            metadata.target(),
            &msg_visitor.message,
        );
        writeln!(writer, "{}", line)
    }
}
