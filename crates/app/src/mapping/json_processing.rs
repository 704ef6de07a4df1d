//! JSON read/write failures to responses.

use super::{ExceptionMapper, misrouted};
use faultline_api::v1::{HttpResponse, ResponseBody, error_message};
use faultline_domain::{
    FailureClass, HttpStatus, JsonFailure, PipelineError, PipelineErrorKind,
    classify_json_failure,
};
use faultline_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use serde_json::Value;
use std::sync::Arc;

/// Body message for client-side JSON failures.
pub const UNABLE_TO_PROCESS_JSON: &str = "Unable to process JSON";

/// Maps [`JsonFailure`]s.
///
/// Generation failures and unbindable target types are server errors with
/// no body; everything else is a 400 whose `details` carries the original
/// message only when `show_details` is enabled.
#[derive(Clone)]
pub struct JsonProcessingMapper {
    show_details: bool,
    logger: Arc<dyn LoggerPort>,
}

impl JsonProcessingMapper {
    /// Create a mapper logging through `logger`.
    #[must_use]
    pub fn new(show_details: bool, logger: Arc<dyn LoggerPort>) -> Self {
        Self {
            show_details,
            logger,
        }
    }

    /// Map a JSON failure.
    #[must_use]
    pub fn map(&self, failure: &JsonFailure) -> HttpResponse {
        match classify_json_failure(failure) {
            FailureClass::SerializationFailure => {
                self.log(
                    LogLevel::Warn,
                    "mapper.json.generation_failed",
                    "Error generating JSON",
                    failure,
                );
                HttpResponse::empty(HttpStatus::INTERNAL_SERVER_ERROR)
            },
            FailureClass::SchemaOrServerBug => {
                self.log(
                    LogLevel::Error,
                    "mapper.json.server_bug",
                    "Unable to serialize or deserialize the specific type",
                    failure,
                );
                HttpResponse::empty(HttpStatus::INTERNAL_SERVER_ERROR)
            },
            FailureClass::ClientInput => {
                self.log(
                    LogLevel::Debug,
                    "mapper.json.client_error",
                    UNABLE_TO_PROCESS_JSON,
                    failure,
                );
                let details = self.show_details.then(|| failure.message().to_owned());
                HttpResponse::json(
                    HttpStatus::BAD_REQUEST,
                    ResponseBody::Error(error_message(
                        HttpStatus::BAD_REQUEST,
                        UNABLE_TO_PROCESS_JSON,
                        details,
                    )),
                )
            },
        }
    }

    fn log(&self, level: LogLevel, event: &str, message: &str, failure: &JsonFailure) {
        let mut fields = LogFields::new();
        fields.insert("failureKind".into(), Value::from(failure.kind().as_str()));
        fields.insert(
            "rootCauseKind".into(),
            Value::from(failure.root_cause().kind().as_str()),
        );
        self.logger.log(
            LogEvent::new(level, event, message)
                .with_fields(fields)
                .with_error(failure_payload(failure)),
        );
    }
}

fn failure_payload(failure: &JsonFailure) -> Value {
    serde_json::json!({
        "message": failure.to_string(),
        "rootCause": failure.root_cause().message(),
    })
}

impl ExceptionMapper for JsonProcessingMapper {
    fn kind(&self) -> PipelineErrorKind {
        PipelineErrorKind::JsonProcessing
    }

    fn to_response(&self, error: &PipelineError) -> HttpResponse {
        match error {
            PipelineError::JsonProcessing(failure) => self.map(failure),
            _ => misrouted(),
        }
    }
}

impl std::fmt::Debug for JsonProcessingMapper {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("JsonProcessingMapper")
            .field("show_details", &self.show_details)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_domain::{JsonFailureKind, PathReference};
    use faultline_testkit::{NoopLogger, RecordingLogger};

    fn mapper() -> (JsonProcessingMapper, Arc<RecordingLogger>) {
        let logger = Arc::new(RecordingLogger::default());
        (JsonProcessingMapper::new(false, logger.clone()), logger)
    }

    #[test]
    fn generation_failure_is_bare_500_with_warning() {
        let (mapper, logger) = mapper();
        let response = mapper.map(&JsonFailure::generation("map key must be a string"));

        assert_eq!(response, HttpResponse::empty(HttpStatus::INTERNAL_SERVER_ERROR));
        assert_eq!(
            logger.levels_for("mapper.json.generation_failed"),
            vec![LogLevel::Warn]
        );
    }

    #[test]
    fn abstract_target_is_bare_500_with_error_log() {
        let (mapper, logger) = mapper();
        let response = mapper.map(&JsonFailure::new(
            JsonFailureKind::InvalidDefinition,
            "Can not construct instance of Shape",
        ));

        assert!(response.is_empty());
        assert_eq!(response.status, HttpStatus::INTERNAL_SERVER_ERROR);
        assert_eq!(logger.levels_for("mapper.json.server_bug"), vec![LogLevel::Error]);
    }

    #[test]
    fn invalid_format_is_400_without_details() {
        let (mapper, logger) = mapper();
        let response = mapper.map(
            &JsonFailure::new(JsonFailureKind::InvalidFormat, "relative URL without a base")
                .with_path([PathReference::Index(0)]),
        );

        assert_eq!(response.status, HttpStatus::BAD_REQUEST);
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
        assert_eq!(
            response.body_json(),
            Some(serde_json::json!({"code": 400, "message": "Unable to process JSON"}))
        );
        assert_eq!(logger.levels_for("mapper.json.client_error"), vec![LogLevel::Debug]);
    }

    #[test]
    fn details_are_shown_when_enabled() {
        let mapper = JsonProcessingMapper::new(true, Arc::new(NoopLogger));
        let response = mapper.map(&JsonFailure::new(
            JsonFailureKind::Parse,
            "expected value at line 1 column 1",
        ));

        assert_eq!(
            response.body_json(),
            Some(serde_json::json!({
                "code": 400,
                "message": "Unable to process JSON",
                "details": "expected value at line 1 column 1"
            }))
        );
    }
}
