//! Missing resource values to 404.

use super::{ExceptionMapper, misrouted};
use faultline_api::v1::HttpResponse;
use faultline_domain::{HttpStatus, PipelineError, PipelineErrorKind};

/// Maps [`PipelineError::EmptyOptional`] to a bare 404.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyOptionalMapper;

impl ExceptionMapper for EmptyOptionalMapper {
    fn kind(&self) -> PipelineErrorKind {
        PipelineErrorKind::EmptyOptional
    }

    fn to_response(&self, error: &PipelineError) -> HttpResponse {
        match error {
            PipelineError::EmptyOptional => HttpResponse::empty(HttpStatus::NOT_FOUND),
            _ => misrouted(),
        }
    }
}
