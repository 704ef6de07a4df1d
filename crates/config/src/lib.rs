//! # faultline-config
//!
//! Configuration schema, validation, and loading for the mapping pipeline.
//! This crate depends on `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use env::{
    ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_SHOW_DETAILS, EnvParseError, FaultlineEnv,
    apply_env_overrides,
};
pub use load::{
    load_config_from_path, load_config_from_sources, load_config_std_env, to_pretty_json,
    to_pretty_toml,
};
pub use schema::{
    CURRENT_CONFIG_VERSION, ConfigSchemaError, ErrorsConfig, FaultlineConfig, LogFormat,
    LogLevelSetting, LoggingConfig, ValidatedConfig, config_schema, parse_config_json,
    parse_config_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
