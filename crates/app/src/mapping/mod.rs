//! Exception mappers: terminal handlers turning pipeline failures into responses.

mod constraint_violation;
mod empty_optional;
mod json_processing;
pub mod registry;
mod web_application;

pub use constraint_violation::ConstraintViolationMapper;
pub use empty_optional::EmptyOptionalMapper;
pub use json_processing::{JsonProcessingMapper, UNABLE_TO_PROCESS_JSON};
pub use registry::{MapperRegistry, MapperSettings};
pub use web_application::WebApplicationMapper;

use faultline_api::v1::HttpResponse;
use faultline_domain::{HttpStatus, PipelineError, PipelineErrorKind};

/// Maps one kind of [`PipelineError`] to a response.
pub trait ExceptionMapper: Send + Sync {
    /// Error kind this mapper handles.
    fn kind(&self) -> PipelineErrorKind;

    /// Whether this mapper wants to handle `error`.
    ///
    /// Only consulted for errors of [`ExceptionMapper::kind`].
    fn is_mappable(&self, _error: &PipelineError) -> bool {
        true
    }

    /// Build the response.
    fn to_response(&self, error: &PipelineError) -> HttpResponse;
}

type Respond = dyn Fn(&PipelineError) -> HttpResponse + Send + Sync;
type Predicate = dyn Fn(&PipelineError) -> bool + Send + Sync;

/// Closure-backed mapper, used to override the defaults.
pub struct FnMapper {
    kind: PipelineErrorKind,
    respond: Box<Respond>,
    predicate: Option<Box<Predicate>>,
}

impl FnMapper {
    /// Handle every error of `kind` with `respond`.
    pub fn new<F>(kind: PipelineErrorKind, respond: F) -> Self
    where
        F: Fn(&PipelineError) -> HttpResponse + Send + Sync + 'static,
    {
        Self {
            kind,
            respond: Box::new(respond),
            predicate: None,
        }
    }

    /// Respond with a fixed status and no body.
    pub fn status(kind: PipelineErrorKind, status: HttpStatus) -> Self {
        Self::new(kind, move |_| HttpResponse::empty(status))
    }

    /// Only handle errors for which `predicate` holds.
    #[must_use]
    pub fn when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&PipelineError) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }
}

impl ExceptionMapper for FnMapper {
    fn kind(&self) -> PipelineErrorKind {
        self.kind
    }

    fn is_mappable(&self, error: &PipelineError) -> bool {
        self.predicate
            .as_ref()
            .is_none_or(|predicate| predicate(error))
    }

    fn to_response(&self, error: &PipelineError) -> HttpResponse {
        (self.respond)(error)
    }
}

impl std::fmt::Debug for FnMapper {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("FnMapper")
            .field("kind", &self.kind)
            .field("conditional", &self.predicate.is_some())
            .finish()
    }
}

/// Response for an error handed to a mapper of another kind.
pub(crate) const fn misrouted() -> HttpResponse {
    HttpResponse::empty(HttpStatus::INTERNAL_SERVER_ERROR)
}
