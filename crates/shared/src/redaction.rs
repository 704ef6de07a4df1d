//! Secret detection and redaction utilities.
//!
//! Provides consistent logic for detecting sensitive keys and redacting their
//! values in error metadata and structured log fields.

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

const LOG_VALUE_MAX_CHARS: usize = 512;

/// Checks if a key/variable name likely refers to a secret.
///
/// Uses case-insensitive pattern matching to detect common secret-related
/// naming conventions.
///
/// # Examples
///
/// ```
/// use faultline_shared::is_secret_key;
///
/// assert!(is_secret_key("API_KEY"));
/// assert!(is_secret_key("password"));
/// assert!(!is_secret_key("FAULTLINE_SHOW_DETAILS"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    key.contains("KEY")
        || key.contains("TOKEN")
        || key.contains("SECRET")
        || key.contains("PASSWORD")
        || key.contains("CREDENTIAL")
        || key.contains("AUTHORIZATION")
}

/// Redacts a value if the key is likely a secret.
///
/// # Examples
///
/// ```
/// use faultline_shared::redact_if_secret;
///
/// assert_eq!(redact_if_secret("API_KEY", "sk-123"), "[REDACTED]");
/// assert_eq!(redact_if_secret("LOG_LEVEL", "debug"), "debug");
/// ```
pub fn redact_if_secret(key: &str, value: &str) -> String {
    if is_secret_key(key) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}

/// Truncate a value rendered into a log line, keeping char boundaries intact.
///
/// Entity payloads echoed into trace logs can be arbitrarily large.
pub fn truncate_for_log(value: &str) -> String {
    if value.chars().count() <= LOG_VALUE_MAX_CHARS {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(LOG_VALUE_MAX_CHARS).collect();
    truncated.push_str("...");
    truncated
}
