//! API v1 DTOs and helpers.

mod mappers;
mod schema;
mod types;

pub use mappers::{
    GENERIC_SERVER_ERROR_MESSAGE, error_envelope_status, error_envelope_to_error_message,
    error_message, validation_error_message,
};
pub use schema::{error_message_schema, http_response_schema, validation_error_message_schema};
pub use types::*;
