//! Constraint violations and insertion-ordered violation sets.

use crate::entity::EntityValue;
use crate::groups::ValidationGroup;
use crate::path::PropertyPath;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a constraint is attached to the validated element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Field, parameter, or return-value constraint.
    #[default]
    Standard,
    /// Constraint backed by a zero-argument boolean predicate on a bean.
    ValidationMethod,
}

/// Description of the constraint that failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintDescriptor {
    /// Constraint name (e.g. `NotNull`).
    pub name: String,
    /// Attachment kind.
    #[serde(default)]
    pub kind: ConstraintKind,
    /// Groups the constraint belongs to.
    #[serde(default = "default_groups")]
    pub groups: Vec<ValidationGroup>,
}

fn default_groups() -> Vec<ValidationGroup> {
    vec![ValidationGroup::DEFAULT]
}

impl ConstraintDescriptor {
    /// A standard constraint in the default group.
    pub fn standard(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ConstraintKind::Standard,
            groups: default_groups(),
        }
    }

    /// A validation-method constraint in the default group.
    pub fn validation_method(name: impl Into<String>) -> Self {
        Self {
            kind: ConstraintKind::ValidationMethod,
            ..Self::standard(name)
        }
    }

    /// Replace the constraint's groups.
    #[must_use]
    pub fn in_groups<I>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = ValidationGroup>,
    {
        self.groups = groups.into_iter().collect();
        self
    }

    /// Returns true if the constraint applies under any of `groups`.
    #[must_use]
    pub fn applies_to(&self, groups: &[ValidationGroup]) -> bool {
        self.groups.iter().any(|group| groups.contains(group))
    }

    /// Returns true for validation-method constraints.
    #[must_use]
    pub const fn is_validation_method(&self) -> bool {
        matches!(self.kind, ConstraintKind::ValidationMethod)
    }
}

/// A single constraint failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    path: PropertyPath,
    message: String,
    constraint: ConstraintDescriptor,
    #[serde(default)]
    invalid_value: EntityValue,
}

impl Violation {
    /// Create a violation.
    pub fn new(
        path: PropertyPath,
        message: impl Into<String>,
        constraint: ConstraintDescriptor,
        invalid_value: EntityValue,
    ) -> Self {
        Self {
            path,
            message: message.into(),
            constraint,
            invalid_value,
        }
    }

    /// Location of the failure.
    #[must_use]
    pub const fn path(&self) -> &PropertyPath {
        &self.path
    }

    /// Human-readable message produced by the engine.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Constraint that failed.
    #[must_use]
    pub const fn constraint(&self) -> &ConstraintDescriptor {
        &self.constraint
    }

    /// Value that failed the constraint.
    #[must_use]
    pub const fn invalid_value(&self) -> &EntityValue {
        &self.invalid_value
    }
}

/// Identity of a violation inside a set; the invalid value is left out.
type ViolationKey = (PropertyPath, String, ConstraintDescriptor);

/// Insertion-ordered collection of distinct violations.
///
/// Two violations are the same entry when path, message and constraint
/// match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Violation>", into = "Vec<Violation>")]
pub struct ViolationSet {
    violations: Vec<Violation>,
    seen: HashSet<ViolationKey>,
}

impl ViolationSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a violation; returns false when an equal one is already present.
    pub fn insert(&mut self, violation: Violation) -> bool {
        let key = (
            violation.path.clone(),
            violation.message.clone(),
            violation.constraint.clone(),
        );
        if !self.seen.insert(key) {
            return false;
        }
        self.violations.push(violation);
        true
    }

    /// Merge another set, preserving order and set semantics.
    pub fn extend_from(&mut self, other: Self) {
        self.extend(other.violations);
    }

    /// First violation in iteration order.
    #[must_use]
    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }

    /// Returns true when there are no violations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }
}

impl PartialEq for ViolationSet {
    fn eq(&self, other: &Self) -> bool {
        self.violations == other.violations
    }
}

impl Extend<Violation> for ViolationSet {
    fn extend<I: IntoIterator<Item = Violation>>(&mut self, iter: I) {
        for violation in iter {
            self.insert(violation);
        }
    }
}

impl FromIterator<Violation> for ViolationSet {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl From<Vec<Violation>> for ViolationSet {
    fn from(violations: Vec<Violation>) -> Self {
        violations.into_iter().collect()
    }
}

impl From<ViolationSet> for Vec<Violation> {
    fn from(set: ViolationSet) -> Self {
        set.violations
    }
}

impl IntoIterator for ViolationSet {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ViolationSet {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathNode;
    use std::error::Error;

    fn not_null(property: &str) -> Violation {
        Violation::new(
            PropertyPath::new().with(PathNode::property(property)),
            "may not be null",
            ConstraintDescriptor::standard("NotNull"),
            EntityValue::Null,
        )
    }

    #[test]
    fn set_ignores_duplicates_and_keeps_order() {
        let mut set = ViolationSet::new();
        assert!(set.insert(not_null("b")));
        assert!(set.insert(not_null("a")));
        assert!(!set.insert(not_null("b")));

        assert_eq!(set.len(), 2);
        assert_eq!(set.first().map(|v| v.path().to_string()), Some("b".into()));
    }

    #[test]
    fn nan_invalid_values_still_collapse() {
        let nan = |property: &str| {
            Violation::new(
                PropertyPath::new().with(PathNode::property(property)),
                "must be a number",
                ConstraintDescriptor::standard("Finite"),
                EntityValue::Float(f64::NAN),
            )
        };

        let set: ViolationSet = [nan("ratio"), nan("ratio"), nan("score")].into_iter().collect();

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn large_sets_keep_every_distinct_entry() {
        let set: ViolationSet = (0..20_000)
            .map(|position| not_null(&format!("field{position}")))
            .chain([not_null("field0")])
            .collect();

        assert_eq!(set.len(), 20_000);
        assert_eq!(set.first().map(|v| v.path().to_string()), Some("field0".into()));
    }

    #[test]
    fn constraint_group_membership() {
        let partial = ValidationGroup::new("Partial");
        let constraint = ConstraintDescriptor::standard("NotEmpty").in_groups([partial.clone()]);

        assert!(constraint.applies_to(&[partial]));
        assert!(!constraint.applies_to(&[ValidationGroup::DEFAULT]));
    }

    #[test]
    fn violation_json_shape() -> Result<(), Box<dyn Error>> {
        let value = serde_json::json!([{
            "path": [
                {"name": "create", "kind": "method"},
                {"name": "arg0", "kind": "parameter", "parameterIndex": 0}
            ],
            "message": "may not be null",
            "constraint": {"name": "NotNull"}
        }]);
        let set: ViolationSet = serde_json::from_value(value)?;

        let first = set.first().ok_or("missing violation")?;
        assert_eq!(first.path().to_string(), "create.arg0");
        assert_eq!(first.constraint().groups, vec![ValidationGroup::DEFAULT]);
        assert!(first.invalid_value().is_null());
        Ok(())
    }
}
