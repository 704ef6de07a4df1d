//! API v1 DTO mapping helpers.

use crate::v1::{ErrorMessageDto, ValidationErrorMessageDto};
use faultline_domain::HttpStatus;
use faultline_shared::{ErrorEnvelope, redact_if_secret};

/// Message returned in place of details that must not leak to callers.
pub const GENERIC_SERVER_ERROR_MESSAGE: &str = "There was an error processing your request.";

/// Build an error body.
#[must_use]
pub fn error_message(
    status: HttpStatus,
    message: impl Into<String>,
    details: Option<String>,
) -> ErrorMessageDto {
    ErrorMessageDto {
        code: status.as_u16(),
        message: message.into(),
        details,
    }
}

/// Build a validation error body.
#[must_use]
pub const fn validation_error_message(errors: Vec<String>) -> ValidationErrorMessageDto {
    ValidationErrorMessageDto { errors }
}

/// Status used when an `ErrorEnvelope` escapes to a caller.
#[must_use]
pub const fn error_envelope_status(envelope: &ErrorEnvelope) -> HttpStatus {
    if envelope.kind.is_client_facing() {
        HttpStatus::BAD_REQUEST
    } else {
        HttpStatus::INTERNAL_SERVER_ERROR
    }
}

/// Map an `ErrorEnvelope` into an error body.
///
/// Only client-facing envelopes keep their message; metadata becomes the
/// details line with secret values redacted.
#[must_use]
pub fn error_envelope_to_error_message(envelope: &ErrorEnvelope) -> ErrorMessageDto {
    let status = error_envelope_status(envelope);
    if !envelope.kind.is_client_facing() {
        return error_message(status, GENERIC_SERVER_ERROR_MESSAGE, None);
    }

    let details = (!envelope.metadata.is_empty()).then(|| {
        envelope
            .metadata
            .iter()
            .map(|(key, value)| format!("{key}={}", redact_if_secret(key, value)))
            .collect::<Vec<_>>()
            .join(", ")
    });
    error_message(status, envelope.message.clone(), details)
}
