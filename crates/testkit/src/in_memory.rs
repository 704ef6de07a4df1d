//! Logger doubles.

use faultline_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use std::sync::{Arc, Mutex};

/// A logger that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl LoggerPort for NoopLogger {
    fn log(&self, _event: LogEvent) {}

    fn child(&self, _fields: LogFields) -> Box<dyn LoggerPort> {
        Box::new(Self)
    }
}

/// A logger that keeps every event for later assertions.
///
/// Children share the parent's buffer and merge their base fields into each
/// event, with event fields taking precedence.
#[derive(Debug, Default, Clone)]
pub struct RecordingLogger {
    events: Arc<Mutex<Vec<LogEvent>>>,
    base_fields: LogFields,
}

impl RecordingLogger {
    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Recorded events with the given name.
    pub fn events_named(&self, event: &str) -> Vec<LogEvent> {
        self.events()
            .into_iter()
            .filter(|recorded| recorded.event.as_ref() == event)
            .collect()
    }

    /// Levels of the recorded events with the given name, in order.
    pub fn levels_for(&self, event: &str) -> Vec<LogLevel> {
        self.events_named(event)
            .into_iter()
            .map(|recorded| recorded.level)
            .collect()
    }

    /// Names of all recorded events, in order.
    pub fn event_names(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|recorded| recorded.event.into_string())
            .collect()
    }
}

impl LoggerPort for RecordingLogger {
    fn log(&self, mut event: LogEvent) {
        if !self.base_fields.is_empty() {
            let mut fields = self.base_fields.clone();
            fields.extend(event.fields.take().unwrap_or_default());
            event.fields = Some(fields);
        }
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut base_fields = self.base_fields.clone();
        base_fields.extend(fields);
        Box::new(Self {
            events: Arc::clone(&self.events),
            base_fields,
        })
    }
}
