//! Resource method descriptors.

use crate::groups::ValidationIntent;
use serde::{Deserialize, Serialize};

/// Where a resource method parameter is bound from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterSource {
    /// URI path segment.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Matrix parameter.
    Matrix,
    /// Form field.
    Form,
    /// Cookie.
    Cookie,
    /// Aggregated bean parameter.
    BeanParam,
    /// Injected context.
    Context,
    /// Unannotated parameter: the request entity.
    Unknown,
}

/// One parameter of a resource method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name.
    pub name: String,
    /// Binding source.
    pub source: ParameterSource,
    /// Validation requested for the parameter value.
    #[serde(default)]
    pub intent: ValidationIntent,
}

impl ParameterDescriptor {
    /// Create a parameter with no validation intent.
    pub fn new(name: impl Into<String>, source: ParameterSource) -> Self {
        Self {
            name: name.into(),
            source,
            intent: ValidationIntent::None,
        }
    }

    /// Shorthand for the request-entity parameter.
    pub fn entity(name: impl Into<String>) -> Self {
        Self::new(name, ParameterSource::Unknown)
    }

    /// Attach a validation intent.
    #[must_use]
    pub fn with_intent(mut self, intent: ValidationIntent) -> Self {
        self.intent = intent;
        self
    }
}

/// Signature and validation intent of a resource method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Owning resource name.
    pub resource: String,
    /// Method name.
    pub name: String,
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterDescriptor>,
    /// Validation requested for the return value.
    #[serde(default)]
    pub intent: ValidationIntent,
}

impl MethodDescriptor {
    /// Create a method descriptor with no parameters.
    pub fn new(resource: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            name: name.into(),
            parameters: Vec::new(),
            intent: ValidationIntent::None,
        }
    }

    /// Append a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Attach the return-value validation intent.
    #[must_use]
    pub fn with_intent(mut self, intent: ValidationIntent) -> Self {
        self.intent = intent;
        self
    }

    /// Index of the request-entity parameter: the last one with an unknown source.
    #[must_use]
    pub fn entity_index(&self) -> Option<usize> {
        self.parameters
            .iter()
            .rposition(|parameter| parameter.source == ParameterSource::Unknown)
    }

    /// The request-entity parameter, if any.
    #[must_use]
    pub fn entity_parameter(&self) -> Option<&ParameterDescriptor> {
        self.entity_index()
            .and_then(|index| self.parameters.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_index_is_last_unknown_parameter() {
        let method = MethodDescriptor::new("People", "update")
            .with_parameter(ParameterDescriptor::entity("first"))
            .with_parameter(ParameterDescriptor::new("id", ParameterSource::Path))
            .with_parameter(ParameterDescriptor::entity("second"))
            .with_parameter(ParameterDescriptor::new("x", ParameterSource::Header));

        assert_eq!(method.entity_index(), Some(2));
        assert_eq!(
            method.entity_parameter().map(|p| p.name.as_str()),
            Some("second")
        );
    }

    #[test]
    fn no_entity_without_unknown_source() {
        let method = MethodDescriptor::new("People", "get")
            .with_parameter(ParameterDescriptor::new("id", ParameterSource::Path));
        assert_eq!(method.entity_index(), None);
    }
}
