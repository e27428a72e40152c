use crate::color::ColorRegistry;
use crate::error::{ConfigError, TaglogError};
use crate::render::ModePolicy;
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// Logger settings loaded from TOML.
///
/// ```toml
/// time_format = "%H:%M:%S"
/// mode = "auto"          # auto | ansi | styled
///
/// [colors]
/// warn = [255, 200, 0]
/// error = [255, 64, 64]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerConfig {
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default)]
    pub mode: ModePolicy,
    /// Role name to `[r, g, b]`. Checked by [`LoggerConfig::apply_colors`].
    #[serde(default)]
    pub colors: BTreeMap<String, [f64; 3]>,
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

/// Rejects blank strftime patterns and ones chrono cannot format.
pub fn check_time_format(format: &str) -> Result<(), ConfigError> {
    let reason = if format.trim().is_empty() {
        "must not be empty".to_string()
    } else if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        format!("\"{}\" is not a valid strftime pattern", format)
    } else {
        return Ok(());
    };
    Err(ConfigError::InvalidValue {
        field: "time_format".to_string(),
        reason,
    })
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            time_format: default_time_format(),
            mode: ModePolicy::default(),
            colors: BTreeMap::new(),
        }
    }
}

impl LoggerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        if !path.exists() {
            return Err(ConfigError::FileNotFound { path: shown });
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: shown.clone(),
            msg: e.to_string(),
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!("logger configuration loaded from {}", shown);
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse {
            msg: e.message().to_string(),
        })?;
        check_time_format(&config.time_format)?;
        Ok(config)
    }

    /// Writes every override into `colors`, failing on the first bad entry.
    pub fn apply_colors(&self, colors: &mut ColorRegistry) -> Result<(), TaglogError> {
        for (role, [r, g, b]) in &self.colors {
            colors.set_color(role, *r, *g, *b)?;
        }
        Ok(())
    }
}
