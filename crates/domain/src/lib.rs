//! # faultline-domain
//!
//! Violation model and the pure decision logic behind error responses.
//!
//! - **Paths** - `ElementKind`, `PathNode`, `PropertyPath`
//! - **Violations** - `Violation`, `ViolationSet`, `ConstraintDescriptor`
//! - **Values** - `EntityValue`, validation groups and intent
//! - **Methods** - `MethodDescriptor`, `ParameterDescriptor`
//! - **Decisions** - `determine_status`, `format_violations`, `classify_json_failure`
//! - **Failures** - `ConstraintViolationError`, `JsonFailure`, `PipelineError`
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - No infrastructure or adapter dependencies
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

// Re-export shared types for convenience
pub use faultline_shared::shared_crate_version;

// =============================================================================
// DOMAIN MODULES
// =============================================================================

pub mod classifier;
pub mod entity;
pub mod failure;
pub mod formatter;
pub mod groups;
pub mod json_failure;
pub mod method;
pub mod path;
pub mod status;
pub mod violation;

pub use classifier::determine_status;
pub use entity::EntityValue;
pub use failure::{
    ConstraintViolationError, EntityOrigin, ErrorCause, PipelineError, PipelineErrorKind,
    REQUEST_ORIGIN, SERVER_RESPONSE_ORIGIN,
};
pub use formatter::{format_violation, format_violations};
pub use groups::{ValidationGroup, ValidationIntent};
pub use json_failure::{
    BEAN_ERROR_PREFIXES, CLIENT_IO_PREFIX, FailureClass, JsonFailure, JsonFailureKind,
    PathReference, classify_json_failure,
};
pub use method::{MethodDescriptor, ParameterDescriptor, ParameterSource};
pub use path::{ElementKind, NodeIndex, PathNode, PropertyPath};
pub use status::HttpStatus;
pub use violation::{ConstraintDescriptor, ConstraintKind, Violation, ViolationSet};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// TESTS
// =============================================================================
