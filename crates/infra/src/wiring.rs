//! Runtime composition from a validated config.

use crate::dispatch::ResourceDispatcher;
use crate::logging::build_logger;
use faultline_app::{ConfiguredValidator, MapperRegistry, MapperSettings};
use faultline_config::ValidatedConfig;
use faultline_ports::{LoggerPort, ValidationEnginePort};
use std::sync::Arc;

/// Mapper settings derived from config.
#[must_use]
pub fn mapper_settings(config: &ValidatedConfig) -> MapperSettings {
    MapperSettings {
        show_details: config.errors.show_details,
    }
}

/// Default mapper registry for `config`.
#[must_use]
pub fn build_registry(config: &ValidatedConfig, logger: Arc<dyn LoggerPort>) -> MapperRegistry {
    MapperRegistry::with_defaults(mapper_settings(config), logger)
}

/// Dispatcher for `engine`, logging through `logger`.
#[must_use]
pub fn build_dispatcher_with_logger(
    config: &ValidatedConfig,
    engine: Arc<dyn ValidationEnginePort>,
    logger: Arc<dyn LoggerPort>,
) -> ResourceDispatcher {
    let validator = ConfiguredValidator::new(engine, Arc::clone(&logger));
    let registry = build_registry(config, Arc::clone(&logger));
    ResourceDispatcher::new(validator, registry, logger)
}

/// Dispatcher for `engine`, logging as configured.
#[must_use]
pub fn build_dispatcher(
    config: &ValidatedConfig,
    engine: Arc<dyn ValidationEnginePort>,
) -> ResourceDispatcher {
    build_dispatcher_with_logger(config, engine, build_logger(&config.logging))
}
