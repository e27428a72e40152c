//! # taglog - Tagged, Color-Coded Console Logging
//!
//! Human-readable `time [LABEL] message` lines at five severities, colored
//! with ANSI escapes on terminals or `%c` CSS directives on consoles that
//! lack ANSI support.
//!
//! ## Modules
//!
//! - [`label`] - Type name to display label conversion
//! - [`color`] - Per-role color registry
//! - [`render`] - Line layout for both rendering modes
//! - [`console`] - Output sinks and template substitution
//! - [`logger`] - The [`Logger`] itself
//! - [`binder`] - Instance-numbered attachment of loggers to types
//! - [`config`] - TOML logger configuration
//! - [`error`] - Typed error handling with thiserror

pub mod binder;
pub mod color;
pub mod config;
pub mod console;
pub mod error;
pub mod label;
pub mod logger;
mod macros;
pub mod render;
pub(crate) mod utils;

pub use binder::{
    attach, attach_in, attach_to, attach_to_in, AttachOptions, AttachPoint, InstanceRegistry,
    LoggerHost,
};
pub use color::{Channel, ColorDefinition, ColorRegistry, Rgb, Role};
pub use config::LoggerConfig;
pub use console::{format_template, ColorLevel, ConsoleSink, MemorySink, Record, Severity, StdConsole};
pub use error::{ColorError, ConfigError, TaglogError};
pub use label::{format_label, pad_number};
pub use logger::Logger;
pub use render::{compose, Line, ModePolicy, RenderMode};

pub use utils::{setup_logger, TaggedFormatter};

#[doc(hidden)]
pub use serde_json::json as __json;
