//! Registry selecting the mapper for a pipeline error.

use super::{
    ConstraintViolationMapper, EmptyOptionalMapper, ExceptionMapper, JsonProcessingMapper,
    WebApplicationMapper,
};
use faultline_api::v1::HttpResponse;
use faultline_domain::{HttpStatus, PipelineError};
use faultline_ports::{LogFields, LoggerPort};
use serde_json::Value;
use std::sync::Arc;

/// Settings consumed by the default mappers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapperSettings {
    /// Include original failure messages in JSON error bodies.
    pub show_details: bool,
}

/// Ordered mapper registry.
///
/// Later registrations take precedence over earlier ones for the same kind.
#[derive(Clone)]
pub struct MapperRegistry {
    mappers: Vec<Arc<dyn ExceptionMapper>>,
    logger: Arc<dyn LoggerPort>,
}

impl MapperRegistry {
    /// An empty registry reporting unmapped errors through `logger`.
    #[must_use]
    pub fn new(logger: Arc<dyn LoggerPort>) -> Self {
        Self {
            mappers: Vec::new(),
            logger,
        }
    }

    /// A registry holding the default mappers.
    #[must_use]
    pub fn with_defaults(settings: MapperSettings, logger: Arc<dyn LoggerPort>) -> Self {
        let json = JsonProcessingMapper::new(settings.show_details, Arc::clone(&logger));
        let mut registry = Self::new(logger);
        registry
            .register(ConstraintViolationMapper)
            .register(json)
            .register(EmptyOptionalMapper)
            .register(WebApplicationMapper);
        registry
    }

    /// Add a mapper; it overrides earlier mappers of the same kind.
    pub fn register<M>(&mut self, mapper: M) -> &mut Self
    where
        M: ExceptionMapper + 'static,
    {
        self.mappers.push(Arc::new(mapper));
        self
    }

    /// Builder form of [`MapperRegistry::register`].
    #[must_use]
    pub fn with<M>(mut self, mapper: M) -> Self
    where
        M: ExceptionMapper + 'static,
    {
        self.register(mapper);
        self
    }

    /// Number of registered mappers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    /// Returns true when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    /// The newest applicable mapper for `error`.
    #[must_use]
    pub fn find(&self, error: &PipelineError) -> Option<&dyn ExceptionMapper> {
        let kind = error.kind();
        self.mappers
            .iter()
            .rev()
            .find(|mapper| mapper.kind() == kind && mapper.is_mappable(error))
            .map(|mapper| &**mapper)
    }

    /// Map an error, falling back to a bare 500 when no mapper applies.
    #[must_use]
    pub fn map(&self, error: &PipelineError) -> HttpResponse {
        if let Some(mapper) = self.find(error) {
            return mapper.to_response(error);
        }

        let mut fields = LogFields::new();
        fields.insert("kind".into(), Value::from(error.kind().as_str()));
        fields.insert("error".into(), Value::from(error.to_string()));
        self.logger.error(
            "mapper.registry.unmapped",
            "No exception mapper for error",
            Some(fields),
        );
        HttpResponse::empty(HttpStatus::INTERNAL_SERVER_ERROR)
    }
}

impl std::fmt::Debug for MapperRegistry {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<_> = self.mappers.iter().map(|mapper| mapper.kind()).collect();
        formatter
            .debug_struct("MapperRegistry")
            .field("mappers", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::FnMapper;
    use faultline_domain::{ErrorCause, PipelineErrorKind};
    use faultline_ports::LogLevel;
    use faultline_testkit::{NoopLogger, RecordingLogger};

    #[test]
    fn defaults_cover_every_kind() {
        let registry = MapperRegistry::with_defaults(MapperSettings::default(), Arc::new(NoopLogger));
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.map(&PipelineError::EmptyOptional).status,
            HttpStatus::NOT_FOUND
        );
    }

    #[test]
    fn later_registrations_override_defaults() {
        let registry = MapperRegistry::with_defaults(MapperSettings::default(), Arc::new(NoopLogger)).with(
            FnMapper::status(PipelineErrorKind::EmptyOptional, HttpStatus::NO_CONTENT),
        );
        assert_eq!(
            registry.map(&PipelineError::EmptyOptional),
            HttpResponse::empty(HttpStatus::NO_CONTENT)
        );
    }

    #[test]
    fn predicates_gate_overrides() {
        let registry = MapperRegistry::with_defaults(MapperSettings::default(), Arc::new(NoopLogger)).with(
            FnMapper::status(PipelineErrorKind::WebApplication, HttpStatus::NOT_FOUND)
                .when(|error| error.index_of_cause("view_render").is_some()),
        );

        let plain = PipelineError::web_application(HttpStatus::SERVICE_UNAVAILABLE, "down");
        assert_eq!(registry.map(&plain).status, HttpStatus::SERVICE_UNAVAILABLE);

        let view = plain.caused_by(ErrorCause::new("view_render", "missing template"));
        assert_eq!(registry.map(&view), HttpResponse::empty(HttpStatus::NOT_FOUND));
    }

    #[test]
    fn unmapped_errors_are_bare_500_and_logged() {
        let logger = Arc::new(RecordingLogger::default());
        let empty = MapperRegistry::new(logger.clone());

        assert_eq!(
            empty.map(&PipelineError::EmptyOptional),
            HttpResponse::empty(HttpStatus::INTERNAL_SERVER_ERROR)
        );
        assert_eq!(
            logger.levels_for("mapper.registry.unmapped"),
            vec![LogLevel::Error]
        );
    }
}
