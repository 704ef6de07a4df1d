//! Validation failures to `{ "errors": [...] }` bodies.

use super::{ExceptionMapper, misrouted};
use faultline_api::v1::{HttpResponse, ResponseBody, validation_error_message};
use faultline_domain::{
    ConstraintViolationError, HttpStatus, PipelineError, PipelineErrorKind, SERVER_RESPONSE_ORIGIN,
    determine_status, format_violations,
};

/// Maps [`ConstraintViolationError`]s.
///
/// Failures tagged as server responses are always 500 and every message is
/// prefixed with `server response `. Everything else is classified by the
/// first violation's path.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintViolationMapper;

impl ConstraintViolationMapper {
    /// Map a validation failure.
    #[must_use]
    pub fn map(&self, error: &ConstraintViolationError) -> HttpResponse {
        let server_response = error.is_server_response();
        let violations = error.violations();

        let errors = if violations.is_empty() {
            vec![error.message().unwrap_or_default().to_owned()]
        } else if server_response {
            format_violations(violations)
                .into_iter()
                .map(|message| format!("{SERVER_RESPONSE_ORIGIN} {message}"))
                .collect()
        } else {
            format_violations(violations)
        };

        let status = if server_response {
            HttpStatus::INTERNAL_SERVER_ERROR
        } else {
            determine_status(violations)
        };

        HttpResponse::json(
            status,
            ResponseBody::Validation(validation_error_message(errors)),
        )
    }
}

impl ExceptionMapper for ConstraintViolationMapper {
    fn kind(&self) -> PipelineErrorKind {
        PipelineErrorKind::ConstraintViolation
    }

    fn to_response(&self, error: &PipelineError) -> HttpResponse {
        match error {
            PipelineError::ConstraintViolation(error) => self.map(error),
            _ => misrouted(),
        }
    }
}
