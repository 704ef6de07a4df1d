//! Property paths locating a violation inside a validated value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of element a path node refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// The validated bean itself.
    Bean,
    /// A property of a bean.
    Property,
    /// A method (executable validation root).
    Method,
    /// A constructor (executable validation root).
    Constructor,
    /// A method or constructor parameter.
    Parameter,
    /// Constraints spanning several parameters.
    CrossParameter,
    /// A method return value.
    ReturnValue,
    /// An element inside a container (list entry, map value).
    ContainerElement,
}

/// Position of a node inside an iterable or map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeIndex {
    /// Position in a list or array.
    Position(usize),
    /// Key in a map.
    Key(String),
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(position) => write!(formatter, "{position}"),
            Self::Key(key) => formatter.write_str(key),
        }
    }
}

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathNode {
    name: String,
    kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameter_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index: Option<NodeIndex>,
}

impl PathNode {
    /// Create a node with a name and kind.
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parameter_index: None,
            index: None,
        }
    }

    /// Create a method node.
    pub fn method(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Method)
    }

    /// Create a parameter node carrying its position in the signature.
    pub fn parameter(name: impl Into<String>, parameter_index: usize) -> Self {
        Self {
            parameter_index: Some(parameter_index),
            ..Self::new(name, ElementKind::Parameter)
        }
    }

    /// Create a property node.
    pub fn property(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Property)
    }

    /// Create a return-value node.
    pub fn return_value() -> Self {
        Self::new("<return value>", ElementKind::ReturnValue)
    }

    /// Attach an iterable position or map key.
    #[must_use]
    pub fn with_index(mut self, index: NodeIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Node name as reported by the engine.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element kind of the node.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Parameter position; only present on parameter nodes.
    #[must_use]
    pub const fn parameter_index(&self) -> Option<usize> {
        match self.kind {
            ElementKind::Parameter => self.parameter_index,
            _ => None,
        }
    }

    /// Iterable position or map key, when present.
    #[must_use]
    pub const fn index(&self) -> Option<&NodeIndex> {
        self.index.as_ref()
    }
}

impl fmt::Display for PathNode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.name)?;
        if let Some(index) = &self.index {
            write!(formatter, "[{index}]")?;
        }
        Ok(())
    }
}

/// Ordered sequence of path nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyPath {
    nodes: Vec<PathNode>,
}

impl PropertyPath {
    /// Create an empty path.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a node, returning the extended path.
    #[must_use]
    pub fn with(mut self, node: PathNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Append a node in place.
    pub fn push(&mut self, node: PathNode) {
        self.nodes.push(node);
    }

    /// Nodes in order.
    #[must_use]
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    /// Iterate nodes in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathNode> {
        self.nodes.iter()
    }

    /// Returns true when the path has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The first parameter node, if any.
    #[must_use]
    pub fn first_parameter(&self) -> Option<&PathNode> {
        self.nodes
            .iter()
            .find(|node| node.kind() == ElementKind::Parameter)
    }
}

impl From<Vec<PathNode>> for PropertyPath {
    fn from(nodes: Vec<PathNode>) -> Self {
        Self { nodes }
    }
}

impl FromIterator<PathNode> for PropertyPath {
    fn from_iter<I: IntoIterator<Item = PathNode>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PropertyPath {
    type Item = &'a PathNode;
    type IntoIter = std::slice::Iter<'a, PathNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(formatter, &self.nodes)
    }
}

/// Write nodes joined by `.`, skipping nodes that render empty.
fn write_joined(formatter: &mut impl fmt::Write, nodes: &[PathNode]) -> fmt::Result {
    let mut first = true;
    for node in nodes {
        let rendered = node.to_string();
        if rendered.is_empty() {
            continue;
        }
        if !first {
            formatter.write_char('.')?;
        }
        formatter.write_str(&rendered)?;
        first = false;
    }
    Ok(())
}
