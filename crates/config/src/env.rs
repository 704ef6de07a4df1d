//! Environment variable parsing and merging.
//!
//! Every override is optional; present-but-empty values are errors rather
//! than silently ignored.

use crate::schema::{FaultlineConfig, LogFormat, LogLevelSetting, ValidatedConfig};
use faultline_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;

/// Overrides `errors.showDetails`.
pub const ENV_SHOW_DETAILS: &str = "FAULTLINE_SHOW_DETAILS";
/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "FAULTLINE_LOG_LEVEL";
/// Overrides `logging.format`.
pub const ENV_LOG_FORMAT: &str = "FAULTLINE_LOG_FORMAT";

const KNOWN_VARS: [&str; 3] = [ENV_SHOW_DETAILS, ENV_LOG_LEVEL, ENV_LOG_FORMAT];

/// Parsed environment overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultlineEnv {
    /// `FAULTLINE_SHOW_DETAILS`.
    pub show_details: Option<bool>,
    /// `FAULTLINE_LOG_LEVEL`.
    pub log_level: Option<LogLevelSetting>,
    /// `FAULTLINE_LOG_FORMAT`.
    pub log_format: Option<LogFormat>,
}

impl FaultlineEnv {
    /// Parse overrides from a key/value map.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            show_details: parse_optional_bool(map, ENV_SHOW_DETAILS)?,
            log_level: parse_optional_enum(map, ENV_LOG_LEVEL, LogLevelSetting::parse)?,
            log_format: parse_optional_enum(map, ENV_LOG_FORMAT, LogFormat::parse)?,
        })
    }

    /// Parse overrides from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let map: BTreeMap<String, String> = KNOWN_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok().map(|value| ((*var).to_owned(), value)))
            .collect();
        Self::from_map(&map)
    }

    /// Returns true when no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.show_details.is_none() && self.log_level.is_none() && self.log_format.is_none()
    }
}

/// Apply env overrides on top of `config`, then validate the result.
pub fn apply_env_overrides(
    mut config: FaultlineConfig,
    env: &FaultlineEnv,
) -> Result<ValidatedConfig, ErrorEnvelope> {
    if let Some(show_details) = env.show_details {
        config.errors.show_details = show_details;
    }
    if let Some(level) = env.log_level {
        config.logging.level = level;
    }
    if let Some(format) = env.log_format {
        config.logging.format = format;
    }
    config.validate().map_err(ErrorEnvelope::from)
}

/// Env var parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());
        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidBool { var, value } | EnvParseError::InvalidEnum { var, value } => {
                envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", value)
            },
        }
    }
}

fn present_value<'a>(
    map: &'a BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<&'a str>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    Ok(Some(trimmed))
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(value) = present_value(map, var)? else {
        return Ok(None);
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: value.to_owned(),
        }),
    }
}

fn parse_optional_enum<T>(
    map: &BTreeMap<String, String>,
    var: &'static str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, EnvParseError> {
    let Some(value) = present_value(map, var)? else {
        return Ok(None);
    };
    parse(value).map(Some).ok_or_else(|| EnvParseError::InvalidEnum {
        var,
        value: value.to_owned(),
    })
}
