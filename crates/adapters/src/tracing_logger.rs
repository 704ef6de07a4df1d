//! Logger adapter that forwards events to `tracing`.

use faultline_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use faultline_shared::redaction::{REDACTED, is_secret_key};
use serde_json::{Map, Value};

/// Forwards structured events to the active `tracing` subscriber.
///
/// Fields and error payloads are rendered as compact JSON strings with
/// secret keys redacted at the top level.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    base_fields: LogFields,
}

impl TracingLogger {
    /// Create a tracing logger with no base fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoggerPort for TracingLogger {
    fn log(&self, event: LogEvent) {
        let mut fields = self.base_fields.clone();
        fields.extend(event.fields.unwrap_or_default());
        let fields = render_fields(fields);
        let error = event.error.map(|error| error.to_string()).unwrap_or_default();
        let name = event.event.as_ref();
        let message = event.message.as_ref();

        match event.level {
            LogLevel::Trace => {
                tracing::trace!(event = name, fields = %fields, error = %error, "{message}");
            },
            LogLevel::Debug => {
                tracing::debug!(event = name, fields = %fields, error = %error, "{message}");
            },
            LogLevel::Info => {
                tracing::info!(event = name, fields = %fields, error = %error, "{message}");
            },
            LogLevel::Warn => {
                tracing::warn!(event = name, fields = %fields, error = %error, "{message}");
            },
            LogLevel::Error => {
                tracing::error!(event = name, fields = %fields, error = %error, "{message}");
            },
        }
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut base_fields = self.base_fields.clone();
        base_fields.extend(fields);
        Box::new(Self { base_fields })
    }
}

fn render_fields(fields: LogFields) -> Value {
    let rendered = fields
        .into_iter()
        .map(|(key, value)| {
            let value = if is_secret_key(&key) {
                Value::from(REDACTED)
            } else {
                value
            };
            (key.into_string(), value)
        })
        .collect::<Map<_, _>>();
    Value::Object(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_fields_are_redacted() {
        let mut fields = LogFields::new();
        fields.insert("authToken".into(), Value::from("abc"));
        fields.insert("status".into(), Value::from(500));

        let rendered = render_fields(fields);
        assert_eq!(rendered["authToken"], REDACTED);
        assert_eq!(rendered["status"], 500);
    }

    #[test]
    fn child_merges_base_fields_without_a_subscriber() {
        let logger = TracingLogger::new();
        let mut fields = LogFields::new();
        fields.insert("requestId".into(), Value::from("req_1"));
        let child = logger.child(fields);
        child.warn("mapper.json.generation_failed", "cannot write", None);
    }
}
