//! Violation fixtures.

use faultline_domain::{
    ConstraintDescriptor, EntityValue, PathNode, PropertyPath, Violation, ViolationSet,
};

/// A `NotNull` violation on a resource method parameter.
pub fn parameter_violation(method: &str, parameter_index: usize) -> Violation {
    Violation::new(
        PropertyPath::new()
            .with(PathNode::method(method))
            .with(PathNode::parameter(format!("arg{parameter_index}"), parameter_index)),
        "may not be null",
        ConstraintDescriptor::standard("NotNull"),
        EntityValue::Null,
    )
}

/// A violation on a property of the validated bean.
pub fn property_violation(property: &str, message: &str) -> Violation {
    Violation::new(
        PropertyPath::new().with(PathNode::property(property)),
        message,
        ConstraintDescriptor::standard("NotEmpty"),
        EntityValue::text(""),
    )
}

/// A violation on a property of a method's return value.
pub fn return_value_violation(method: &str, property: &str, message: &str) -> Violation {
    Violation::new(
        PropertyPath::new()
            .with(PathNode::method(method))
            .with(PathNode::return_value())
            .with(PathNode::property(property)),
        message,
        ConstraintDescriptor::standard("NotEmpty"),
        EntityValue::text(""),
    )
}

/// A failed validation-method predicate on an entity parameter.
pub fn validation_method_violation(
    method: &str,
    parameter_index: usize,
    predicate: &str,
    message: &str,
) -> Violation {
    Violation::new(
        PropertyPath::new()
            .with(PathNode::method(method))
            .with(PathNode::parameter(format!("arg{parameter_index}"), parameter_index))
            .with(PathNode::property(predicate)),
        message,
        ConstraintDescriptor::validation_method("ValidationMethod"),
        EntityValue::Bool(false),
    )
}

/// Collect fixtures into a set.
pub fn set_of<I>(violations: I) -> ViolationSet
where
    I: IntoIterator<Item = Violation>,
{
    violations.into_iter().collect()
}
