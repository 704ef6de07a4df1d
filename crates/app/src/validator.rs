//! Resource method validation: parameters, request entity, and return value.

use faultline_domain::{
    ConstraintViolationError, EntityOrigin, EntityValue, MethodDescriptor, ValidationGroup,
    ValidationIntent, ViolationSet, format_violations,
};
use faultline_ports::{LogFields, LoggerPort, ValidationEnginePort};
use faultline_shared::truncate_for_log;
use serde_json::Value;
use std::sync::Arc;

/// Validates resource method invocations around a wrapped engine.
#[derive(Clone)]
pub struct ConfiguredValidator {
    engine: Arc<dyn ValidationEnginePort>,
    logger: Arc<dyn LoggerPort>,
}

impl ConfiguredValidator {
    /// Wrap a validation engine; failures are traced through `logger`.
    #[must_use]
    pub fn new(engine: Arc<dyn ValidationEnginePort>, logger: Arc<dyn LoggerPort>) -> Self {
        Self { engine, logger }
    }

    /// Validate every argument, then the request entity.
    ///
    /// Violations on non-entity parameters fail with the full, unfiltered set
    /// before the entity is looked at. Entity violations reported by the
    /// engine's parameter pass are ignored here; the entity is validated
    /// separately with the intent declared on its parameter.
    #[tracing::instrument(skip_all, fields(resource = %method.resource, method = %method.name))]
    pub fn validate_resource_and_input_params(
        &self,
        method: &MethodDescriptor,
        arguments: &[EntityValue],
    ) -> Result<(), ConstraintViolationError> {
        let violations = self.engine.validate_parameters(method, arguments);
        let entity_index = method.entity_index();

        let has_parameter_violations = violations.iter().any(|violation| {
            violation
                .path()
                .first_parameter()
                .is_some_and(|node| node.parameter_index() != entity_index)
        });
        if has_parameter_violations {
            return Err(ConstraintViolationError::new(violations));
        }

        let Some(index) = entity_index else {
            return Ok(());
        };
        let no_intent = ValidationIntent::None;
        let null = EntityValue::Null;
        let intent = method
            .parameters
            .get(index)
            .map_or(&no_intent, |parameter| &parameter.intent);
        let entity = arguments.get(index).unwrap_or(&null);
        self.validate_entity(entity, intent, EntityOrigin::Request)
    }

    /// Validate a resource method's return value.
    ///
    /// Engine failures are reported untagged, so their return-value paths
    /// decide the status. Aggregate and group-scoped validation requested on
    /// the method is tagged as a server response failure.
    #[tracing::instrument(skip_all, fields(resource = %method.resource, method = %method.name))]
    pub fn validate_result(
        &self,
        method: &MethodDescriptor,
        value: &EntityValue,
    ) -> Result<(), ConstraintViolationError> {
        if !value.is_null() {
            let violations = self.engine.validate_return_value(method, value);
            if !violations.is_empty() {
                return Err(ConstraintViolationError::new(violations));
            }
        }

        self.validate_entity(value, &method.intent, EntityOrigin::ServerResponse)
    }

    /// Validate an entity with the groups requested by `intent`.
    ///
    /// Maps contribute their values and lists/arrays their elements, since
    /// the engine does not descend into top-level aggregates.
    pub fn validate_entity(
        &self,
        value: &EntityValue,
        intent: &ValidationIntent,
        origin: EntityOrigin,
    ) -> Result<(), ConstraintViolationError> {
        let Some(groups) = intent.resolved_groups() else {
            return Ok(());
        };
        if value.is_null() {
            return Err(ConstraintViolationError::empty_entity(origin));
        }

        let violations = match value {
            EntityValue::Map(entries) => self.validate_all(entries.values(), &groups),
            EntityValue::List(items) | EntityValue::Array(items) => {
                self.validate_all(items.iter(), &groups)
            },
            other => self.engine.validate(other, &groups),
        };
        if violations.is_empty() {
            return Ok(());
        }

        self.trace_failure(&violations, value, origin);
        Err(ConstraintViolationError::for_origin(origin, violations))
    }

    /// Validate a value directly with the engine.
    ///
    /// No groups means the default group.
    pub fn validate(&self, value: &EntityValue, groups: &[ValidationGroup]) -> ViolationSet {
        if groups.is_empty() {
            return self.engine.validate(value, &[ValidationGroup::DEFAULT]);
        }
        self.engine.validate(value, groups)
    }

    fn validate_all<'a, I>(&self, values: I, groups: &[ValidationGroup]) -> ViolationSet
    where
        I: Iterator<Item = &'a EntityValue>,
    {
        let mut violations = ViolationSet::new();
        for value in values {
            violations.extend_from(self.engine.validate(value, groups));
        }
        violations
    }

    fn trace_failure(&self, violations: &ViolationSet, value: &EntityValue, origin: EntityOrigin) {
        let errors = format_violations(violations);
        let original = truncate_for_log(&value.to_string());
        let message = format!(
            "Validation failed: {}; original data was {original}",
            errors.join(", ")
        );

        let mut fields = LogFields::new();
        fields.insert("origin".into(), Value::String(origin.label().to_owned()));
        fields.insert(
            "errors".into(),
            Value::Array(errors.into_iter().map(Value::String).collect()),
        );
        fields.insert("originalData".into(), Value::String(original));
        self.logger.trace("validator.entity_invalid", &message, Some(fields));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_domain::{
        ConstraintDescriptor, ParameterDescriptor, ParameterSource, PathNode, PropertyPath,
        Violation,
    };
    use faultline_ports::LogLevel;
    use faultline_testkit::{NoopLogger, RecordingLogger};
    use std::sync::Mutex;

    /// Engine double returning canned violation sets and recording calls.
    #[derive(Default)]
    struct ScriptedEngine {
        parameters: ViolationSet,
        return_value: ViolationSet,
        per_value: ViolationSet,
        validated: Mutex<Vec<EntityValue>>,
    }

    impl ValidationEnginePort for ScriptedEngine {
        fn validate(&self, value: &EntityValue, _groups: &[ValidationGroup]) -> ViolationSet {
            if let Ok(mut validated) = self.validated.lock() {
                validated.push(value.clone());
            }
            self.per_value.clone()
        }

        fn validate_parameters(
            &self,
            _method: &MethodDescriptor,
            _arguments: &[EntityValue],
        ) -> ViolationSet {
            self.parameters.clone()
        }

        fn validate_return_value(
            &self,
            _method: &MethodDescriptor,
            _value: &EntityValue,
        ) -> ViolationSet {
            self.return_value.clone()
        }
    }

    fn violation_at(parameter_index: usize) -> Violation {
        Violation::new(
            PropertyPath::new()
                .with(PathNode::method("update"))
                .with(PathNode::parameter(format!("arg{parameter_index}"), parameter_index)),
            "may not be null",
            ConstraintDescriptor::standard("NotNull"),
            EntityValue::Null,
        )
    }

    fn property_violation() -> Violation {
        Violation::new(
            PropertyPath::new().with(PathNode::property("name")),
            "may not be empty",
            ConstraintDescriptor::standard("NotEmpty"),
            EntityValue::text(""),
        )
    }

    fn update_method(entity_intent: ValidationIntent) -> MethodDescriptor {
        MethodDescriptor::new("People", "update")
            .with_parameter(ParameterDescriptor::new("id", ParameterSource::Path))
            .with_parameter(ParameterDescriptor::entity("person").with_intent(entity_intent))
    }

    fn validator(engine: ScriptedEngine) -> (ConfiguredValidator, Arc<ScriptedEngine>) {
        let engine = Arc::new(engine);
        (ConfiguredValidator::new(engine.clone(), Arc::new(NoopLogger)), engine)
    }

    #[test]
    fn parameter_violation_fails_with_full_set() {
        let (validator, engine) = validator(ScriptedEngine {
            parameters: vec![violation_at(1), violation_at(0)].into(),
            ..ScriptedEngine::default()
        });

        let result = validator.validate_resource_and_input_params(
            &update_method(ValidationIntent::DefaultGroup),
            &[EntityValue::from(1), EntityValue::Null],
        );

        let error = result.err();
        assert_eq!(error.as_ref().map(|e| e.violations().len()), Some(2));
        assert_eq!(error.as_ref().and_then(|e| e.message().map(str::to_owned)), None);
        assert!(engine.validated.lock().map(|v| v.is_empty()).unwrap_or(false));
    }

    #[test]
    fn entity_only_violations_defer_to_entity_validation() {
        let (validator, _engine) = validator(ScriptedEngine {
            parameters: vec![violation_at(1)].into(),
            ..ScriptedEngine::default()
        });

        let result = validator.validate_resource_and_input_params(
            &update_method(ValidationIntent::None),
            &[EntityValue::from(1), EntityValue::text("x")],
        );
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn null_entity_with_intent_is_empty_request() {
        let (validator, _engine) = validator(ScriptedEngine::default());

        let result = validator.validate_resource_and_input_params(
            &update_method(ValidationIntent::DefaultGroup),
            &[EntityValue::from(1), EntityValue::Null],
        );
        let error = result.err();
        assert_eq!(
            error.as_ref().and_then(ConstraintViolationError::message),
            Some("the request entity was empty")
        );
        assert!(error.is_some_and(|e| e.violations().is_empty()));
    }

    #[test]
    fn entity_violations_are_tagged_request() {
        let (validator, _engine) = validator(ScriptedEngine {
            per_value: vec![property_violation()].into(),
            ..ScriptedEngine::default()
        });

        let result = validator.validate_resource_and_input_params(
            &update_method(ValidationIntent::DefaultGroup),
            &[EntityValue::from(1), EntityValue::bean("Person", [("name", EntityValue::text(""))])],
        );
        assert_eq!(
            result.err().as_ref().and_then(ConstraintViolationError::message),
            Some("request")
        );
    }

    #[test]
    fn entity_failures_are_traced_through_the_injected_logger() {
        let logger = Arc::new(RecordingLogger::default());
        let engine = Arc::new(ScriptedEngine {
            per_value: vec![property_violation()].into(),
            ..ScriptedEngine::default()
        });
        let validator = ConfiguredValidator::new(engine, logger.clone());

        let result = validator.validate_entity(
            &EntityValue::text(""),
            &ValidationIntent::DefaultGroup,
            EntityOrigin::Request,
        );
        assert!(result.is_err());
        assert_eq!(
            logger.levels_for("validator.entity_invalid"),
            vec![LogLevel::Trace]
        );
    }

    #[test]
    fn aggregates_are_validated_element_wise() {
        let (validator, engine) = validator(ScriptedEngine::default());
        let list = EntityValue::List(vec![EntityValue::from(1), EntityValue::from(2)]);

        let result = validator.validate_entity(
            &list,
            &ValidationIntent::DefaultGroup,
            EntityOrigin::Request,
        );
        assert_eq!(result, Ok(()));
        assert_eq!(
            engine.validated.lock().map(|v| v.clone()).unwrap_or_default(),
            vec![EntityValue::from(1), EntityValue::from(2)]
        );
    }

    #[test]
    fn return_value_engine_failures_are_untagged() {
        let (validator, _engine) = validator(ScriptedEngine {
            return_value: vec![property_violation()].into(),
            ..ScriptedEngine::default()
        });
        let method = MethodDescriptor::new("People", "get");

        let error = validator
            .validate_result(&method, &EntityValue::text("x"))
            .err();
        assert_eq!(error.as_ref().and_then(ConstraintViolationError::message), None);
    }

    #[test]
    fn return_value_manual_failures_are_server_responses() {
        let (validator, _engine) = validator(ScriptedEngine {
            per_value: vec![property_violation()].into(),
            ..ScriptedEngine::default()
        });
        let method =
            MethodDescriptor::new("People", "get").with_intent(ValidationIntent::DefaultGroup);

        let error = validator
            .validate_result(&method, &EntityValue::text("x"))
            .err();
        assert!(error.is_some_and(|e| e.is_server_response()));
    }

    #[test]
    fn null_result_skips_engine_and_reports_empty_response() {
        let (validator, _engine) = validator(ScriptedEngine {
            return_value: vec![property_violation()].into(),
            ..ScriptedEngine::default()
        });
        let method =
            MethodDescriptor::new("People", "get").with_intent(ValidationIntent::DefaultGroup);

        let error = validator.validate_result(&method, &EntityValue::Null).err();
        assert_eq!(
            error.as_ref().and_then(ConstraintViolationError::message),
            Some("the server response entity was empty")
        );
    }

    #[test]
    fn passthrough_defaults_to_default_group() {
        let (validator, engine) = validator(ScriptedEngine::default());
        assert!(validator.validate(&EntityValue::from(true), &[]).is_empty());
        assert_eq!(engine.validated.lock().map(|v| v.len()).unwrap_or(0), 1);
    }
}
