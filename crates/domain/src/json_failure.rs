//! Typed JSON processing failures and their classification.
//!
//! Codecs report failures as a [`JsonFailure`] chain. [`classify_json_failure`]
//! is the only place that decides whether a failure is the caller's fault, a
//! schema/server bug, or a response serialization problem.

use crate::status::HttpStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Root-cause message prefix for transport errors raised while reading input.
pub const CLIENT_IO_PREFIX: &str = "Unexpected IOException";

/// Root-cause message prefixes that indicate a target type that cannot be built.
pub const BEAN_ERROR_PREFIXES: [&str; 3] = [
    "No suitable constructor found",
    "Can not construct instance",
    "Can not instantiate value",
];

/// Kind of JSON processing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonFailureKind {
    /// Malformed JSON text.
    Parse,
    /// Generic failure binding JSON to a target type.
    Mapping,
    /// Input shape does not match the target type.
    MismatchedInput,
    /// A value could not be converted to the target type.
    InvalidFormat,
    /// Unknown or unbindable property.
    PropertyBinding,
    /// The target type definition itself is unusable.
    InvalidDefinition,
    /// Failure while writing JSON output.
    Generation,
    /// I/O failure underneath the codec.
    Io,
    /// Any other cause.
    Other,
}

impl JsonFailureKind {
    /// Stable snake-case tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Mapping => "mapping",
            Self::MismatchedInput => "mismatched_input",
            Self::InvalidFormat => "invalid_format",
            Self::PropertyBinding => "property_binding",
            Self::InvalidDefinition => "invalid_definition",
            Self::Generation => "generation",
            Self::Io => "io",
            Self::Other => "other",
        }
    }

    /// Returns true for failures raised by the JSON layer itself.
    #[must_use]
    pub const fn is_json_processing(self) -> bool {
        !matches!(self, Self::Io | Self::Other)
    }

    /// Returns true for failures raised while binding JSON to a type.
    #[must_use]
    pub const fn is_mapping(self) -> bool {
        matches!(
            self,
            Self::Mapping
                | Self::MismatchedInput
                | Self::InvalidFormat
                | Self::PropertyBinding
                | Self::InvalidDefinition
        )
    }

    /// Returns true for kinds that always denote bad client input.
    #[must_use]
    pub const fn is_client_input(self) -> bool {
        matches!(self, Self::InvalidFormat | Self::PropertyBinding)
    }
}

/// One step of the navigation path to the failing JSON element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathReference {
    /// Array position.
    Index(usize),
    /// Object field.
    Field(String),
}

impl fmt::Display for PathReference {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(formatter, "[{index}]"),
            Self::Field(field) => write!(formatter, "[\"{field}\"]"),
        }
    }
}

/// A JSON processing failure with an optional cause chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonFailure {
    kind: JsonFailureKind,
    message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    path: Vec<PathReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cause: Option<Box<JsonFailure>>,
}

impl JsonFailure {
    /// Create a failure with no path and no cause.
    pub fn new(kind: JsonFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: Vec::new(),
            cause: None,
        }
    }

    /// Shorthand for a generation failure.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::new(JsonFailureKind::Generation, message)
    }

    /// Replace the navigation path.
    #[must_use]
    pub fn with_path<I>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = PathReference>,
    {
        self.path = path.into_iter().collect();
        self
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_cause(mut self, cause: Self) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Failure kind.
    #[must_use]
    pub const fn kind(&self) -> JsonFailureKind {
        self.kind
    }

    /// Original message, without location details.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Navigation path to the failing element; empty when the root failed.
    #[must_use]
    pub fn path(&self) -> &[PathReference] {
        &self.path
    }

    /// Direct cause, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&Self> {
        self.cause.as_deref()
    }

    /// Iterate this failure followed by each cause in turn.
    pub fn chain(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |failure| failure.cause())
    }

    /// The innermost cause (or `self` when there is none).
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        self.chain().last().unwrap_or(self)
    }
}

impl fmt::Display for JsonFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)?;
        if !self.path.is_empty() {
            formatter.write_str(" (through reference chain: ")?;
            for reference in &self.path {
                write!(formatter, "{reference}")?;
            }
            formatter.write_str(")")?;
        }
        Ok(())
    }
}

impl std::error::Error for JsonFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// Failure taxonomy used to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// Bad input from the caller.
    ClientInput,
    /// Target type cannot be bound; a developer needs to fix it.
    SchemaOrServerBug,
    /// The response could not be written.
    SerializationFailure,
}

impl FailureClass {
    /// Response status for the class.
    #[must_use]
    pub const fn status(self) -> HttpStatus {
        match self {
            Self::ClientInput => HttpStatus::BAD_REQUEST,
            Self::SchemaOrServerBug | Self::SerializationFailure => {
                HttpStatus::INTERNAL_SERVER_ERROR
            },
        }
    }
}

/// Decide who is at fault for a JSON processing failure.
#[must_use]
pub fn classify_json_failure(failure: &JsonFailure) -> FailureClass {
    if failure.kind() == JsonFailureKind::Generation {
        return FailureClass::SerializationFailure;
    }

    if failure.kind().is_mapping() && is_server_side_mapping_failure(failure) {
        return FailureClass::SchemaOrServerBug;
    }

    FailureClass::ClientInput
}

fn is_server_side_mapping_failure(failure: &JsonFailure) -> bool {
    let root = failure.root_cause();
    let message = root.message();

    let client_io = message.starts_with(CLIENT_IO_PREFIX);
    let client_cause = root.kind().is_client_input() || client_io;
    let bean_error = BEAN_ERROR_PREFIXES
        .iter()
        .any(|prefix| message.starts_with(prefix));
    let root_failed = failure.path().is_empty();

    !client_cause && ((root.kind().is_json_processing() && root_failed) || bean_error)
}
