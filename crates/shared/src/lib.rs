//! # faultline-shared
//!
//! Shared utilities, result types, and error handling for the faultline workspace.
//!
//! This crate provides foundational types that are used across all other crates:
//!
//! - Error envelope types
//! - Request correlation identifiers
//! - Secret redaction helpers for logs and error metadata
//!
//! ## Design Principles
//!
//! 1. **No workspace dependencies** - This crate only depends on external crates
//! 2. **Serde-compatible** - All public data types support serialization

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod correlation;
pub mod errors;
pub mod redaction;

pub use correlation::RequestId;
pub use errors::{ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata};
pub use redaction::{REDACTED, is_secret_key, redact_if_secret, truncate_for_log};

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// TESTS
// =============================================================================
