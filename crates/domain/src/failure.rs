//! Failures that reach the exception mappers.

use crate::formatter::format_violations;
use crate::json_failure::JsonFailure;
use crate::status::HttpStatus;
use crate::violation::ViolationSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin message for request-entity validation failures.
pub const REQUEST_ORIGIN: &str = "request";

/// Origin message for return-value validation failures.
pub const SERVER_RESPONSE_ORIGIN: &str = "server response";

/// Which side of the exchange an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityOrigin {
    /// The inbound request body.
    Request,
    /// The value returned by the resource method.
    ServerResponse,
}

impl EntityOrigin {
    /// Origin label used in failure messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Request => REQUEST_ORIGIN,
            Self::ServerResponse => SERVER_RESPONSE_ORIGIN,
        }
    }
}

/// A set of violations, optionally tagged with an origin message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintViolationError {
    message: Option<String>,
    violations: ViolationSet,
}

impl ConstraintViolationError {
    /// Wrap a violation set with no message.
    #[must_use]
    pub const fn new(violations: ViolationSet) -> Self {
        Self {
            message: None,
            violations,
        }
    }

    /// Wrap a violation set with an explicit message.
    pub fn with_message(message: impl Into<String>, violations: ViolationSet) -> Self {
        Self {
            message: Some(message.into()),
            violations,
        }
    }

    /// Entity validation failure for the given origin.
    pub fn for_origin(origin: EntityOrigin, violations: ViolationSet) -> Self {
        Self::with_message(origin.label(), violations)
    }

    /// A required entity was absent.
    pub fn empty_entity(origin: EntityOrigin) -> Self {
        Self::with_message(
            format!("the {} entity was empty", origin.label()),
            ViolationSet::new(),
        )
    }

    /// Origin message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The violations.
    #[must_use]
    pub const fn violations(&self) -> &ViolationSet {
        &self.violations
    }

    /// Returns true when the failure was raised while validating a response.
    #[must_use]
    pub fn is_server_response(&self) -> bool {
        self.message
            .as_deref()
            .is_some_and(|message| message.contains(SERVER_RESPONSE_ORIGIN))
    }
}

impl fmt::Display for ConstraintViolationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => formatter.write_str(message),
            None => formatter.write_str(&format_violations(&self.violations).join(", ")),
        }
    }
}

impl std::error::Error for ConstraintViolationError {}

/// A link in a web application error's cause chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ErrorCause {
    /// Tag identifying the failure type (e.g. `view_render`).
    pub kind: String,
    /// Human-readable message.
    pub message: String,
    /// Underlying cause.
    #[source]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ErrorCause>>,
}

impl ErrorCause {
    /// Create a cause with no further cause.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Attach an underlying cause.
    #[must_use]
    pub fn with_cause(mut self, cause: Self) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

/// Tag used to look up mappers for a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PipelineErrorKind {
    /// [`PipelineError::ConstraintViolation`].
    ConstraintViolation,
    /// [`PipelineError::JsonProcessing`].
    JsonProcessing,
    /// [`PipelineError::EmptyOptional`].
    EmptyOptional,
    /// [`PipelineError::WebApplication`].
    WebApplication,
}

impl PipelineErrorKind {
    /// Stable snake-case tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConstraintViolation => "constraint_violation",
            Self::JsonProcessing => "json_processing",
            Self::EmptyOptional => "empty_optional",
            Self::WebApplication => "web_application",
        }
    }
}

impl fmt::Display for PipelineErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Everything a request pipeline can hand to an exception mapper.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// Validation failed.
    #[error(transparent)]
    ConstraintViolation(#[from] ConstraintViolationError),
    /// JSON could not be read or written.
    #[error(transparent)]
    JsonProcessing(#[from] JsonFailure),
    /// The resource returned no value.
    #[error("resource returned no value")]
    EmptyOptional,
    /// A failure that already carries its HTTP status.
    #[error("{message}")]
    WebApplication {
        /// Status to respond with.
        status: HttpStatus,
        /// Human-readable message.
        message: String,
        /// Underlying cause chain.
        #[source]
        cause: Option<Box<ErrorCause>>,
    },
}

impl PipelineError {
    /// Create a web application error without a cause.
    pub fn web_application(status: HttpStatus, message: impl Into<String>) -> Self {
        Self::WebApplication {
            status,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach a cause to a web application error; other variants are returned unchanged.
    #[must_use]
    pub fn caused_by(self, cause: ErrorCause) -> Self {
        match self {
            Self::WebApplication {
                status, message, ..
            } => Self::WebApplication {
                status,
                message,
                cause: Some(Box::new(cause)),
            },
            other => other,
        }
    }

    /// Registry tag for this error.
    #[must_use]
    pub const fn kind(&self) -> PipelineErrorKind {
        match self {
            Self::ConstraintViolation(_) => PipelineErrorKind::ConstraintViolation,
            Self::JsonProcessing(_) => PipelineErrorKind::JsonProcessing,
            Self::EmptyOptional => PipelineErrorKind::EmptyOptional,
            Self::WebApplication { .. } => PipelineErrorKind::WebApplication,
        }
    }

    /// Kind tags along the cause chain, starting with this error's own tag.
    #[must_use]
    pub fn cause_kinds(&self) -> Vec<&str> {
        let mut kinds = vec![self.kind().as_str()];
        match self {
            Self::JsonProcessing(failure) => {
                kinds.extend(failure.chain().skip(1).map(|cause| cause.kind().as_str()));
            },
            Self::WebApplication { cause, .. } => {
                let causes = std::iter::successors(cause.as_deref(), |link| link.cause.as_deref());
                kinds.extend(causes.map(|link| link.kind.as_str()));
            },
            Self::ConstraintViolation(_) | Self::EmptyOptional => {},
        }
        kinds
    }

    /// Position of the first link tagged `kind` in the cause chain.
    ///
    /// Index 0 is the error itself.
    #[must_use]
    pub fn index_of_cause(&self, kind: &str) -> Option<usize> {
        self.cause_kinds()
            .iter()
            .position(|candidate| *candidate == kind)
    }
}
