//! API v1 DTO types.

use faultline_domain::HttpStatus;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Media type of every body produced by the mappers.
pub const APPLICATION_JSON: &str = "application/json";

/// Error body for JSON processing and web application failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorMessageDto {
    /// HTTP status code, repeated in the body.
    pub code: u16,
    /// Short, stable description.
    pub message: String,
    /// Original failure message; only present when detail reporting is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error body for validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationErrorMessageDto {
    /// Formatted violation messages.
    pub errors: Vec<String>,
}

/// Response entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ResponseBody {
    /// Validation failure body.
    Validation(ValidationErrorMessageDto),
    /// Error body.
    Error(ErrorMessageDto),
    /// Any other JSON document (successful results).
    Json(serde_json::Value),
}

/// A mapped HTTP response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    /// Response status.
    #[schemars(with = "u16")]
    pub status: HttpStatus,
    /// Content type, when there is a body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Response entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<ResponseBody>,
}

impl HttpResponse {
    /// A response with no entity.
    #[must_use]
    pub const fn empty(status: HttpStatus) -> Self {
        Self {
            status,
            content_type: None,
            body: None,
        }
    }

    /// A response with a JSON entity.
    #[must_use]
    pub fn json(status: HttpStatus, body: ResponseBody) -> Self {
        Self {
            status,
            content_type: Some(APPLICATION_JSON.to_owned()),
            body: Some(body),
        }
    }

    /// Returns true when there is no entity.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.body.is_none()
    }

    /// Entity rendered as a JSON value.
    #[must_use]
    pub fn body_json(&self) -> Option<serde_json::Value> {
        self.body
            .as_ref()
            .and_then(|body| serde_json::to_value(body).ok())
    }
}
