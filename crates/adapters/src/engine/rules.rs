//! Constraint rules understood by [`RuleValidationEngine`](super::RuleValidationEngine).

use faultline_domain::{ConstraintDescriptor, EntityValue, ValidationGroup};
use std::fmt;
use std::sync::Arc;

/// A single-value constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintRule {
    /// Value must be present.
    NotNull,
    /// Text or collection must be present and non-empty.
    NotEmpty,
    /// Text must be present and contain a non-whitespace character.
    NotBlank,
    /// Number must be at least the bound.
    Min(i64),
    /// Number must be at most the bound.
    Max(i64),
    /// Text length or collection size must be within the bounds.
    Size {
        /// Inclusive lower bound.
        min: usize,
        /// Inclusive upper bound.
        max: usize,
    },
    /// Text must parse as an absolute URL.
    Url,
}

impl ConstraintRule {
    /// Constraint name as reported in violations.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NotNull => "NotNull",
            Self::NotEmpty => "NotEmpty",
            Self::NotBlank => "NotBlank",
            Self::Min(_) => "Min",
            Self::Max(_) => "Max",
            Self::Size { .. } => "Size",
            Self::Url => "URL",
        }
    }

    /// Message used when no override is configured.
    #[must_use]
    pub fn default_message(&self) -> String {
        match self {
            Self::NotNull => "may not be null".to_owned(),
            Self::NotEmpty | Self::NotBlank => "may not be empty".to_owned(),
            Self::Min(bound) => format!("must be greater than or equal to {bound}"),
            Self::Max(bound) => format!("must be less than or equal to {bound}"),
            Self::Size { min, max } => format!("size must be between {min} and {max}"),
            Self::Url => "must be a valid URL".to_owned(),
        }
    }

    /// Returns true when `value` satisfies the rule.
    ///
    /// Only presence rules reject `Null`.
    #[must_use]
    pub fn is_satisfied_by(&self, value: &EntityValue) -> bool {
        match (self, value) {
            (Self::NotNull | Self::NotEmpty | Self::NotBlank, EntityValue::Null) => false,
            (_, EntityValue::Null) => true,
            (Self::NotEmpty, value) => size_of(value) != Some(0),
            (Self::NotBlank, EntityValue::Text(text)) => !text.trim().is_empty(),
            (Self::Min(bound), value) => compare(value, *bound).is_none_or(|ordering| ordering.is_ge()),
            (Self::Max(bound), value) => compare(value, *bound).is_none_or(|ordering| ordering.is_le()),
            (Self::Size { min, max }, value) => {
                size_of(value).is_none_or(|size| (*min..=*max).contains(&size))
            },
            (Self::Url, EntityValue::Text(text)) => url::Url::parse(text).is_ok(),
            (Self::Url, _) => false,
            (Self::NotNull | Self::NotBlank, _) => true,
        }
    }
}

fn size_of(value: &EntityValue) -> Option<usize> {
    match value {
        EntityValue::Text(text) => Some(text.chars().count()),
        EntityValue::List(items) | EntityValue::Array(items) => Some(items.len()),
        EntityValue::Map(entries) => Some(entries.len()),
        _ => None,
    }
}

#[allow(clippy::cast_precision_loss, reason = "bounds are configured small integers")]
fn compare(value: &EntityValue, bound: i64) -> Option<std::cmp::Ordering> {
    match value {
        EntityValue::Integer(number) => Some(number.cmp(&bound)),
        EntityValue::Float(number) => number.partial_cmp(&(bound as f64)),
        _ => None,
    }
}

/// A constraint on one bean property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRule {
    property: String,
    rule: ConstraintRule,
    groups: Vec<ValidationGroup>,
    message: Option<String>,
}

impl PropertyRule {
    /// Constrain `property` in the default group.
    pub fn new(property: impl Into<String>, rule: ConstraintRule) -> Self {
        Self {
            property: property.into(),
            rule,
            groups: vec![ValidationGroup::DEFAULT],
            message: None,
        }
    }

    /// Restrict the rule to the given groups.
    #[must_use]
    pub fn in_groups<I>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = ValidationGroup>,
    {
        self.groups = groups.into_iter().collect();
        self
    }

    /// Override the violation message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Constrained property name.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The rule itself.
    #[must_use]
    pub const fn rule(&self) -> &ConstraintRule {
        &self.rule
    }

    pub(crate) fn message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| self.rule.default_message())
    }

    pub(crate) fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor::standard(self.rule.name()).in_groups(self.groups.iter().cloned())
    }
}

/// Predicate signature for validation methods.
pub type Predicate = Arc<dyn Fn(&EntityValue) -> bool + Send + Sync>;

/// A zero-argument boolean check over the whole bean.
#[derive(Clone)]
pub struct ValidationMethodRule {
    name: String,
    message: String,
    groups: Vec<ValidationGroup>,
    predicate: Predicate,
}

impl ValidationMethodRule {
    /// Create a check in the default group.
    ///
    /// `name` becomes the final path node of a failure.
    pub fn new<F>(name: impl Into<String>, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&EntityValue) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            message: message.into(),
            groups: vec![ValidationGroup::DEFAULT],
            predicate: Arc::new(predicate),
        }
    }

    /// Restrict the check to the given groups.
    #[must_use]
    pub fn in_groups<I>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = ValidationGroup>,
    {
        self.groups = groups.into_iter().collect();
        self
    }

    /// Predicate node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn holds_for(&self, bean: &EntityValue) -> bool {
        (self.predicate)(bean)
    }

    pub(crate) fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor::validation_method("ValidationMethod")
            .in_groups(self.groups.iter().cloned())
    }
}

impl fmt::Debug for ValidationMethodRule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ValidationMethodRule")
            .field("name", &self.name)
            .field("message", &self.message)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}
