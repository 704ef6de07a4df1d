//! # faultline-infra
//!
//! Infrastructure wiring and runtime composition.
//! This crate depends on `app`, `adapters`, `config`, and `shared`.

/// Config loading helpers used by CLI surfaces.
pub mod config_check;
/// Resource method dispatch.
pub mod dispatch;
/// Environment validation helpers used by CLI surfaces.
pub mod env_check;
/// Logger selection.
pub mod logging;
/// Runtime composition.
pub mod wiring;

pub use config_check::{ConfigOutput, load_effective_config, render_effective_config};
pub use dispatch::{
    BodyReader, Handler, InboundRequest, Outbound, ResourceDispatcher, ResourceMethod, typed_body,
};
pub use env_check::{InfraError, InfraResult, validate_env_parsing};
pub use logging::{build_logger, build_logger_with_sink, log_level};
pub use wiring::{build_dispatcher, build_dispatcher_with_logger, build_registry, mapper_settings};

// Re-export redaction utilities for CLI boundary sanitization
pub use faultline_shared::{is_secret_key, redact_if_secret};

/// Returns the infra crate version.
#[must_use]
pub const fn infra_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
