//! # faultline-app
//!
//! Request/response validation and exception mapping.
//! This crate depends on `ports`, `api`, `domain`, and `shared`.

pub mod mapping;
pub mod validator;

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use mapping::{
    ConstraintViolationMapper, EmptyOptionalMapper, ExceptionMapper, FnMapper,
    JsonProcessingMapper, MapperRegistry, MapperSettings, UNABLE_TO_PROCESS_JSON,
    WebApplicationMapper,
};
pub use validator::ConfiguredValidator;
