//! Logger selection from configuration.

use faultline_adapters::{JsonLogger, LogSink, StderrLogSink, TracingLogger};
use faultline_config::{LogFormat, LogLevelSetting, LoggingConfig};
use faultline_ports::{LogLevel, LoggerPort};
use std::sync::Arc;

/// Port log level for a configured level.
#[must_use]
pub const fn log_level(setting: LogLevelSetting) -> LogLevel {
    match setting {
        LogLevelSetting::Trace => LogLevel::Trace,
        LogLevelSetting::Debug => LogLevel::Debug,
        LogLevelSetting::Info => LogLevel::Info,
        LogLevelSetting::Warn => LogLevel::Warn,
        LogLevelSetting::Error => LogLevel::Error,
    }
}

/// Build the logger described by `config`, writing JSON lines to stderr.
#[must_use]
pub fn build_logger(config: &LoggingConfig) -> Arc<dyn LoggerPort> {
    build_logger_with_sink(config, Arc::new(StderrLogSink))
}

/// Build the logger described by `config` with an explicit JSON sink.
///
/// The sink is unused when the format is `tracing`; level filtering is then
/// left to the subscriber.
#[must_use]
pub fn build_logger_with_sink(config: &LoggingConfig, sink: Arc<dyn LogSink>) -> Arc<dyn LoggerPort> {
    match config.format {
        LogFormat::Json => Arc::new(JsonLogger::new(sink).with_min_level(log_level(config.level))),
        LogFormat::Tracing => Arc::new(TracingLogger::new()),
    }
}
