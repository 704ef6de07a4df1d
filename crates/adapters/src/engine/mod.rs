//! Rule-based validation engine.
//!
//! Constraints are registered per bean type name and per resource method.
//! The engine walks [`EntityValue`] trees, following cascades into nested
//! beans and collections, and reports violations with full property paths.

mod rules;

pub use rules::{ConstraintRule, Predicate, PropertyRule, ValidationMethodRule};

use faultline_domain::{
    ConstraintDescriptor, EntityValue, MethodDescriptor, NodeIndex, PathNode, PropertyPath,
    ValidationGroup, Violation, ViolationSet,
};
use faultline_ports::ValidationEnginePort;
use std::collections::BTreeMap;

static NULL: EntityValue = EntityValue::Null;

/// Constraints declared on one bean type.
#[derive(Debug, Clone)]
pub struct BeanRules {
    type_name: String,
    properties: Vec<PropertyRule>,
    methods: Vec<ValidationMethodRule>,
    cascade: Vec<String>,
}

impl BeanRules {
    /// Start an empty rule set for `type_name`.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Vec::new(),
            methods: Vec::new(),
            cascade: Vec::new(),
        }
    }

    /// Add a property constraint.
    #[must_use]
    pub fn with_property(mut self, rule: PropertyRule) -> Self {
        self.properties.push(rule);
        self
    }

    /// Add a validation method.
    #[must_use]
    pub fn with_validation_method(mut self, rule: ValidationMethodRule) -> Self {
        self.methods.push(rule);
        self
    }

    /// Validate the nested value(s) of `property` as well.
    #[must_use]
    pub fn cascading(mut self, property: impl Into<String>) -> Self {
        self.cascade.push(property.into());
        self
    }
}

/// Constraints declared on one resource method's signature.
#[derive(Debug, Clone, Default)]
pub struct ExecutableRules {
    parameters: Vec<(usize, ConstraintRule)>,
    return_value: Vec<ConstraintRule>,
}

impl ExecutableRules {
    /// Start with no constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain the argument at `index`.
    #[must_use]
    pub fn with_parameter(mut self, index: usize, rule: ConstraintRule) -> Self {
        self.parameters.push((index, rule));
        self
    }

    /// Constrain the return value.
    #[must_use]
    pub fn with_return_value(mut self, rule: ConstraintRule) -> Self {
        self.return_value.push(rule);
        self
    }
}

/// Validation engine driven by registered rules.
#[derive(Debug, Clone, Default)]
pub struct RuleValidationEngine {
    beans: BTreeMap<String, BeanRules>,
    executables: BTreeMap<(String, String), ExecutableRules>,
}

impl RuleValidationEngine {
    /// Create an engine with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the rules for a bean type.
    #[must_use]
    pub fn with_bean(mut self, rules: BeanRules) -> Self {
        self.beans.insert(rules.type_name.clone(), rules);
        self
    }

    /// Register (or replace) the signature rules for `resource::method`.
    #[must_use]
    pub fn with_executable(
        mut self,
        resource: impl Into<String>,
        method: impl Into<String>,
        rules: ExecutableRules,
    ) -> Self {
        self.executables
            .insert((resource.into(), method.into()), rules);
        self
    }

    fn executable(&self, method: &MethodDescriptor) -> Option<&ExecutableRules> {
        self.executables
            .get(&(method.resource.clone(), method.name.clone()))
    }

    fn walk(
        &self,
        value: &EntityValue,
        path: &PropertyPath,
        groups: &[ValidationGroup],
        out: &mut ViolationSet,
    ) {
        let Some(rules) = value.type_name().and_then(|name| self.beans.get(name)) else {
            return;
        };

        for rule in &rules.properties {
            let descriptor = rule.descriptor();
            if !descriptor.applies_to(groups) {
                continue;
            }
            let property = value.property(rule.property()).unwrap_or(&NULL);
            if !rule.rule().is_satisfied_by(property) {
                out.insert(Violation::new(
                    path.clone().with(PathNode::property(rule.property())),
                    rule.message(),
                    descriptor,
                    property.clone(),
                ));
            }
        }

        for method in &rules.methods {
            let descriptor = method.descriptor();
            if descriptor.applies_to(groups) && !method.holds_for(value) {
                out.insert(Violation::new(
                    path.clone().with(PathNode::property(method.name())),
                    method.message(),
                    descriptor,
                    EntityValue::Bool(false),
                ));
            }
        }

        for name in &rules.cascade {
            if let Some(nested) = value.property(name) {
                self.cascade(nested, path, &PathNode::property(name.as_str()), groups, out);
            }
        }
    }

    /// Validate `value` reached through `node`, descending into containers.
    fn cascade(
        &self,
        value: &EntityValue,
        parent: &PropertyPath,
        node: &PathNode,
        groups: &[ValidationGroup],
        out: &mut ViolationSet,
    ) {
        match value {
            EntityValue::List(items) | EntityValue::Array(items) => {
                for (position, item) in items.iter().enumerate() {
                    let path = parent
                        .clone()
                        .with(node.clone().with_index(NodeIndex::Position(position)));
                    self.walk(item, &path, groups, out);
                }
            },
            EntityValue::Map(entries) => {
                for (key, item) in entries {
                    let path = parent
                        .clone()
                        .with(node.clone().with_index(NodeIndex::Key(key.clone())));
                    self.walk(item, &path, groups, out);
                }
            },
            other => self.walk(other, &parent.clone().with(node.clone()), groups, out),
        }
    }
}

impl ValidationEnginePort for RuleValidationEngine {
    fn validate(&self, value: &EntityValue, groups: &[ValidationGroup]) -> ViolationSet {
        let default_groups = [ValidationGroup::DEFAULT];
        let groups = if groups.is_empty() {
            &default_groups[..]
        } else {
            groups
        };
        let mut out = ViolationSet::new();
        self.walk(value, &PropertyPath::new(), groups, &mut out);
        out
    }

    fn validate_parameters(
        &self,
        method: &MethodDescriptor,
        arguments: &[EntityValue],
    ) -> ViolationSet {
        let prefix = PropertyPath::new().with(PathNode::method(method.name.as_str()));
        let parameter_node = |index: usize| PathNode::parameter(format!("arg{index}"), index);
        let mut out = ViolationSet::new();

        if let Some(rules) = self.executable(method) {
            for (index, rule) in &rules.parameters {
                let argument = arguments.get(*index).unwrap_or(&NULL);
                if !rule.is_satisfied_by(argument) {
                    out.insert(Violation::new(
                        prefix.clone().with(parameter_node(*index)),
                        rule.default_message(),
                        ConstraintDescriptor::standard(rule.name()),
                        argument.clone(),
                    ));
                }
            }
        }

        let cascaded = method
            .parameters
            .iter()
            .zip(arguments)
            .enumerate()
            .filter(|(_, (parameter, _))| parameter.intent.cascades());
        for (index, (_, argument)) in cascaded {
            self.cascade(
                argument,
                &prefix,
                &parameter_node(index),
                &[ValidationGroup::DEFAULT],
                &mut out,
            );
        }

        out
    }

    fn validate_return_value(
        &self,
        method: &MethodDescriptor,
        value: &EntityValue,
    ) -> ViolationSet {
        let prefix = PropertyPath::new().with(PathNode::method(method.name.as_str()));
        let mut out = ViolationSet::new();

        if let Some(rules) = self.executable(method) {
            for rule in &rules.return_value {
                if !rule.is_satisfied_by(value) {
                    out.insert(Violation::new(
                        prefix.clone().with(PathNode::return_value()),
                        rule.default_message(),
                        ConstraintDescriptor::standard(rule.name()),
                        value.clone(),
                    ));
                }
            }
        }

        if method.intent.cascades() {
            self.cascade(
                value,
                &prefix,
                &PathNode::return_value(),
                &[ValidationGroup::DEFAULT],
                &mut out,
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_domain::{
        ElementKind, ParameterDescriptor, ParameterSource, ValidationIntent, determine_status,
        format_violations,
    };

    fn person(name: &str, email: &str) -> EntityValue {
        EntityValue::bean(
            "Person",
            [("name", EntityValue::text(name)), ("email", EntityValue::text(email))],
        )
    }

    fn engine() -> RuleValidationEngine {
        RuleValidationEngine::new()
            .with_bean(
                BeanRules::new("Person")
                    .with_property(PropertyRule::new("name", ConstraintRule::NotEmpty))
                    .with_property(
                        PropertyRule::new("email", ConstraintRule::NotBlank)
                            .in_groups([ValidationGroup::new("Strict")]),
                    ),
            )
            .with_bean(
                BeanRules::new("Team")
                    .with_property(PropertyRule::new("name", ConstraintRule::NotNull))
                    .cascading("members")
                    .with_validation_method(ValidationMethodRule::new(
                        "membersUnique",
                        "members must be unique",
                        |team| team.property("unique") != Some(&EntityValue::Bool(false)),
                    )),
            )
            .with_executable(
                "PeopleResource",
                "find",
                ExecutableRules::new()
                    .with_parameter(0, ConstraintRule::Min(1))
                    .with_return_value(ConstraintRule::NotNull),
            )
    }

    fn find_method() -> MethodDescriptor {
        MethodDescriptor::new("PeopleResource", "find")
            .with_parameter(ParameterDescriptor::new("id", ParameterSource::Query))
            .with_parameter(
                ParameterDescriptor::entity("person").with_intent(ValidationIntent::DefaultGroup),
            )
            .with_intent(ValidationIntent::DefaultGroup)
    }

    #[test]
    fn groups_select_constraints() {
        let engine = engine();
        let value = person("", " ");

        let default = engine.validate(&value, &[]);
        assert_eq!(format_violations(&default), vec!["name may not be empty"]);

        let strict = engine.validate(&value, &[ValidationGroup::new("Strict")]);
        assert_eq!(format_violations(&strict), vec!["email may not be empty"]);
    }

    #[test]
    fn cascade_indexes_collection_elements() {
        let team = EntityValue::bean(
            "Team",
            [
                ("name", EntityValue::text("core")),
                (
                    "members",
                    EntityValue::List(vec![person("ann", "a@x"), person("", "b@x")]),
                ),
            ],
        );

        let violations = engine().validate(&team, &[ValidationGroup::DEFAULT]);
        assert_eq!(format_violations(&violations), vec!["members[1].name may not be empty"]);
    }

    #[test]
    fn validation_methods_report_predicate_node() {
        let team = EntityValue::bean(
            "Team",
            [("name", EntityValue::text("core")), ("unique", EntityValue::Bool(false))],
        );

        let violations = engine().validate(&team, &[]);
        let first = violations.first().map(|violation| violation.constraint().is_validation_method());
        assert_eq!(first, Some(true));
        assert_eq!(format_violations(&violations), vec!["members must be unique"]);
    }

    #[test]
    fn parameter_paths_start_with_method_and_parameter() {
        let violations = engine().validate_parameters(
            &find_method(),
            &[EntityValue::Integer(0), person("", "a@x")],
        );

        let kinds: Vec<Vec<ElementKind>> = violations
            .iter()
            .map(|violation| violation.path().iter().map(PathNode::kind).collect())
            .collect();
        assert_eq!(
            kinds,
            vec![
                vec![ElementKind::Method, ElementKind::Parameter],
                vec![ElementKind::Method, ElementKind::Parameter, ElementKind::Property],
            ]
        );
        assert_eq!(
            format_violations(&violations),
            vec![
                "find.arg0 must be greater than or equal to 1",
                "find.arg1.name may not be empty",
            ]
        );
        assert_eq!(determine_status(&violations).as_u16(), 400);
    }

    #[test]
    fn missing_arguments_are_null() {
        let method = MethodDescriptor::new("PeopleResource", "find");
        let violations = engine().validate_parameters(&method, &[]);
        assert!(violations.is_empty(), "Min accepts an absent value");
    }

    #[test]
    fn return_value_paths_are_server_side() {
        let engine = engine();
        let method = find_method();

        let null = engine.validate_return_value(&method, &EntityValue::Null);
        assert_eq!(format_violations(&null), vec!["find.<return value> may not be null"]);
        assert_eq!(determine_status(&null).as_u16(), 500);

        let cascaded = engine.validate_return_value(&method, &person("", "a@x"));
        assert_eq!(
            format_violations(&cascaded),
            vec!["find.<return value>.name may not be empty"]
        );
    }

    #[test]
    fn explicit_groups_do_not_cascade() {
        let partial = ValidationIntent::groups([ValidationGroup::new("Strict")]);
        let method = MethodDescriptor::new("PeopleResource", "current")
            .with_parameter(ParameterDescriptor::entity("person").with_intent(partial.clone()))
            .with_intent(partial);

        let returned = engine().validate_return_value(&method, &person("", "a@x"));
        let arguments = engine().validate_parameters(&method, &[person("", "a@x")]);

        assert!(returned.is_empty());
        assert!(arguments.is_empty());
    }

    #[test]
    fn unregistered_types_have_no_violations() {
        let value = EntityValue::bean("Unknown", [("name", EntityValue::text(""))]);
        assert!(engine().validate(&value, &[]).is_empty());
    }
}
