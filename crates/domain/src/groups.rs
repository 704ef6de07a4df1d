//! Validation groups and per-descriptor validation intent.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Named validation profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationGroup(Cow<'static, str>);

impl ValidationGroup {
    /// The group every constraint belongs to unless told otherwise.
    pub const DEFAULT: Self = Self(Cow::Borrowed("Default"));

    /// Create a named group.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Group name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ValidationGroup {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ValidationGroup {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Whether (and with which groups) a value should be validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "groups", rename_all = "snake_case")]
pub enum ValidationIntent {
    /// Do not validate.
    #[default]
    None,
    /// Validate with the default group.
    DefaultGroup,
    /// Validate with explicit groups.
    ExplicitGroups(Vec<ValidationGroup>),
}

impl ValidationIntent {
    /// Explicit groups intent.
    pub fn groups<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = ValidationGroup>,
    {
        Self::ExplicitGroups(groups.into_iter().collect())
    }

    /// Groups to validate with, or `None` when validation is not requested.
    ///
    /// An explicit intent with no groups falls back to the default group.
    #[must_use]
    pub fn resolved_groups(&self) -> Option<Vec<ValidationGroup>> {
        match self {
            Self::None => None,
            Self::DefaultGroup => Some(vec![ValidationGroup::DEFAULT]),
            Self::ExplicitGroups(groups) if groups.is_empty() => {
                Some(vec![ValidationGroup::DEFAULT])
            },
            Self::ExplicitGroups(groups) => Some(groups.clone()),
        }
    }

    /// Returns true when validation is requested.
    #[must_use]
    pub const fn is_requested(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns true when executable validation should descend into the value.
    ///
    /// Only the default-group intent cascades; explicit groups are applied by
    /// entity validation alone.
    #[must_use]
    pub const fn cascades(&self) -> bool {
        matches!(self, Self::DefaultGroup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_resolves_groups() {
        assert_eq!(ValidationIntent::None.resolved_groups(), None);
        assert_eq!(
            ValidationIntent::DefaultGroup.resolved_groups(),
            Some(vec![ValidationGroup::DEFAULT])
        );
        assert_eq!(
            ValidationIntent::groups([]).resolved_groups(),
            Some(vec![ValidationGroup::DEFAULT])
        );

        let partial = ValidationGroup::new("Partial");
        assert_eq!(
            ValidationIntent::groups([partial.clone()]).resolved_groups(),
            Some(vec![partial])
        );
    }

    #[test]
    fn only_default_intent_cascades() {
        assert!(ValidationIntent::DefaultGroup.cascades());
        assert!(!ValidationIntent::None.cascades());
        assert!(!ValidationIntent::groups([ValidationGroup::new("Partial")]).cascades());
    }

    #[test]
    fn default_group_name() {
        assert_eq!(ValidationGroup::default().to_string(), "Default");
    }
}
