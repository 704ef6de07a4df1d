//! Request correlation identifiers.

use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Request identifier attached to log events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(Arc<str>);

impl RequestId {
    /// Create a new random (v4) request id.
    #[must_use]
    pub fn next() -> Self {
        Self(Arc::from(Uuid::new_v4().to_string()))
    }

    /// Reuse an identifier supplied by the caller (e.g. an inbound header).
    ///
    /// Blank values fall back to a freshly generated id.
    #[must_use]
    pub fn from_header(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::next()
        } else {
            Self(Arc::from(trimmed))
        }
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
