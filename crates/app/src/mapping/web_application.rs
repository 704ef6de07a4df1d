//! Errors that already carry a status.

use super::{ExceptionMapper, misrouted};
use faultline_api::v1::{HttpResponse, ResponseBody, error_message};
use faultline_domain::{PipelineError, PipelineErrorKind};

/// Maps [`PipelineError::WebApplication`] to its own status with a `{code, message}` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebApplicationMapper;

impl ExceptionMapper for WebApplicationMapper {
    fn kind(&self) -> PipelineErrorKind {
        PipelineErrorKind::WebApplication
    }

    fn to_response(&self, error: &PipelineError) -> HttpResponse {
        match error {
            PipelineError::WebApplication {
                status, message, ..
            } => HttpResponse::json(
                *status,
                ResponseBody::Error(error_message(*status, message.clone(), None)),
            ),
            _ => misrouted(),
        }
    }
}
