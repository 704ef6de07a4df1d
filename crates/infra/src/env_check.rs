//! Environment validation helpers for CLI surfaces.

use faultline_config::{FaultlineConfig, FaultlineEnv, apply_env_overrides};
use faultline_shared::ErrorEnvelope;
use std::collections::BTreeMap;

/// Infra-level error type (shared error envelope).
pub type InfraError = ErrorEnvelope;

/// Infra-level result type.
pub type InfraResult<T> = Result<T, InfraError>;

/// Validate that the provided env overrides can be parsed and merged into a config.
pub fn validate_env_parsing(env: &BTreeMap<String, String>) -> InfraResult<()> {
    let parsed = FaultlineEnv::from_map(env).map_err(ErrorEnvelope::from)?;
    apply_env_overrides(FaultlineConfig::default(), &parsed)?;
    Ok(())
}
