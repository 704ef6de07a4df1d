//! Validation engine boundary contract.

use faultline_domain::{EntityValue, MethodDescriptor, ValidationGroup, ViolationSet};

/// A constraint validation engine.
///
/// Implementations walk bean values and executable signatures; they never
/// decide response statuses.
pub trait ValidationEnginePort: Send + Sync {
    /// Validate a value against the constraints in `groups`.
    fn validate(&self, value: &EntityValue, groups: &[ValidationGroup]) -> ViolationSet;

    /// Validate method arguments (parameter constraints and cascades).
    ///
    /// Violation paths start with a method node followed by a parameter node.
    fn validate_parameters(
        &self,
        method: &MethodDescriptor,
        arguments: &[EntityValue],
    ) -> ViolationSet;

    /// Validate a method's return value.
    ///
    /// Violation paths start with a method node followed by a return-value node.
    fn validate_return_value(&self, method: &MethodDescriptor, value: &EntityValue)
    -> ViolationSet;
}
