//! # Error Types
//!
//! Centralized error definitions for the taglog crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use crate::color::{Channel, Role};
use thiserror::Error;

/// Unified error type for taglog operations.
///
/// This enum wraps the specific error types so callers that load a logger
/// from configuration only need to handle one type.
#[derive(Error, Debug)]
pub enum TaglogError {
    #[error(transparent)]
    Color(ColorError),

    #[error(transparent)]
    Config(ConfigError),
}

impl From<ColorError> for TaglogError {
    fn from(e: ColorError) -> Self {
        TaglogError::Color(e)
    }
}

impl From<ConfigError> for TaglogError {
    fn from(e: ConfigError) -> Self {
        TaglogError::Config(e)
    }
}

/// Errors raised while replacing a role color.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("part needs to be one of [{valid}] but was \"{role}\"", valid = quoted_roles())]
    InvalidRole { role: String },

    #[error("{channel} needs to be an integer in the range 0 to 255 but was {value}")]
    InvalidChannel { channel: Channel, value: f64 },
}

fn quoted_roles() -> String {
    Role::ALL
        .iter()
        .map(|role| format!("\"{}\"", role.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Configuration-related errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error reading {path}: {msg}")]
    IoError { path: String, msg: String },

    #[error("Parse error in logger configuration: {msg}")]
    Parse { msg: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_role_lists_every_role() {
        let err = ColorError::InvalidRole {
            role: "trace".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "part needs to be one of [\"prefix\", \"log\", \"info\", \"debug\", \"warn\", \"error\"] but was \"trace\""
        );
    }

    #[test]
    fn test_invalid_channel_names_channel_and_value() {
        let err = ColorError::InvalidChannel {
            channel: Channel::G,
            value: 256.0,
        };
        assert_eq!(
            err.to_string(),
            "g needs to be an integer in the range 0 to 255 but was 256"
        );

        let err = ColorError::InvalidChannel {
            channel: Channel::B,
            value: 1.5,
        };
        assert!(err.to_string().ends_with("but was 1.5"));
    }

    #[test]
    fn test_unified_error_is_transparent() {
        let err: TaglogError = ConfigError::FileNotFound {
            path: "missing.toml".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "File not found: missing.toml");
    }
}
