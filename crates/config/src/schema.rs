//! Configuration schema, defaults, and validation.
//!
//! - Deserialization uses `serde` (JSON or TOML).
//! - Unknown keys are rejected so typos surface early.
//! - Validation errors map to `ErrorEnvelope` with `config:*` codes.

use faultline_shared::{ErrorCode, ErrorEnvelope};
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current supported configuration schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct FaultlineConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Error response settings.
    pub errors: ErrorsConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for FaultlineConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            errors: ErrorsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl FaultlineConfig {
    /// Validate the config.
    pub fn validate(self) -> Result<ValidatedConfig, ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        Ok(ValidatedConfig(self))
    }
}

/// Error response settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ErrorsConfig {
    /// Include the underlying message in JSON client-error bodies.
    pub show_details: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Minimum level emitted.
    pub level: LogLevelSetting,
    /// Output format.
    pub format: LogFormat,
}

/// Minimum log level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevelSetting {
    /// Everything, including entity dumps.
    Trace,
    /// Client error details.
    Debug,
    /// Normal operation.
    #[default]
    Info,
    /// Serialization failures.
    Warn,
    /// Server bugs only.
    Error,
}

impl LogLevelSetting {
    /// Lowercase level name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Parse a level name (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevelSetting {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line on stderr.
    #[default]
    Json,
    /// Forward to the `tracing` subscriber.
    Tracing,
}

impl LogFormat {
    /// Lowercase format name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Tracing => "tracing",
        }
    }

    /// Parse a format name (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "tracing" => Some(Self::Tracing),
            _ => None,
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A config that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig(FaultlineConfig);

impl ValidatedConfig {
    /// Unwrap the validated config.
    #[must_use]
    pub fn into_inner(self) -> FaultlineConfig {
        self.0
    }
}

impl AsRef<FaultlineConfig> for ValidatedConfig {
    fn as_ref(&self) -> &FaultlineConfig {
        &self.0
    }
}

impl std::ops::Deref for ValidatedConfig {
    type Target = FaultlineConfig;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Schema-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The config declares a version this build does not understand.
    UnsupportedVersion {
        /// Version found in the input.
        found: u32,
        /// Version this build supports.
        supported: u32,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => write!(
                formatter,
                "unsupported config version {found} (supported: {supported})"
            ),
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());
        match error {
            ConfigSchemaError::UnsupportedVersion { found, .. } => {
                envelope.with_metadata("version", found.to_string())
            },
        }
    }
}

/// Parse and validate a JSON config document.
pub fn parse_config_json(input: &str) -> Result<ValidatedConfig, ErrorEnvelope> {
    let config: FaultlineConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;
    config.validate().map_err(ErrorEnvelope::from)
}

/// Parse and validate a TOML config document.
pub fn parse_config_toml(input: &str) -> Result<ValidatedConfig, ErrorEnvelope> {
    let config: FaultlineConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;
    config.validate().map_err(ErrorEnvelope::from)
}

/// JSON Schema for [`FaultlineConfig`].
#[must_use]
pub fn config_schema() -> Schema {
    schema_for!(FaultlineConfig)
}
