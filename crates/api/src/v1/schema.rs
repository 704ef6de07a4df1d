//! JSON Schema exports for API v1 response DTOs.

use crate::v1::{ErrorMessageDto, HttpResponse, ValidationErrorMessageDto};
use schemars::{Schema, schema_for};

/// JSON Schema for `ErrorMessageDto`.
#[must_use]
pub fn error_message_schema() -> Schema {
    schema_for!(ErrorMessageDto)
}

/// JSON Schema for `ValidationErrorMessageDto`.
#[must_use]
pub fn validation_error_message_schema() -> Schema {
    schema_for!(ValidationErrorMessageDto)
}

/// JSON Schema for `HttpResponse`.
#[must_use]
pub fn http_response_schema() -> Schema {
    schema_for!(HttpResponse)
}
