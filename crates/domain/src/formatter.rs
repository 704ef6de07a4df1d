//! Human-readable rendering of violations.

use crate::path::{ElementKind, PropertyPath};
use crate::violation::{Violation, ViolationSet};
use std::collections::BTreeSet;

/// Render one violation as `"<path> <message>"`.
///
/// Validation-method violations drop the executable prefix (method and
/// parameter nodes) and the synthetic predicate node at the end, so clients
/// never see argument positions.
#[must_use]
pub fn format_violation(violation: &Violation) -> String {
    if violation.constraint().is_validation_method() {
        return format_validation_method(violation);
    }
    format!("{} {}", violation.path(), violation.message())
}

fn format_validation_method(violation: &Violation) -> String {
    let nodes = violation.path().nodes();
    let start = nodes
        .iter()
        .rposition(|node| node.kind() == ElementKind::Parameter)
        .map_or(0, |index| index + 1);
    let end = nodes.len().saturating_sub(1);
    let useful = nodes.get(start..end).unwrap_or_default();

    let mut rendered = useful.iter().cloned().collect::<PropertyPath>().to_string();

    let message = violation.message();
    if !message.starts_with('.') {
        rendered.push(' ');
    }
    rendered.push_str(message);
    rendered.trim().to_owned()
}

/// Render a set of violations as sorted, distinct strings.
#[must_use]
pub fn format_violations(violations: &ViolationSet) -> Vec<String> {
    violations
        .iter()
        .map(format_violation)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
