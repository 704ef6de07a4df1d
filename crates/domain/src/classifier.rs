//! Status classification for violation sets.

use crate::path::ElementKind;
use crate::status::HttpStatus;
use crate::violation::ViolationSet;

/// Pick the response status for a violation set.
///
/// Only the first violation is inspected. Scanning its path in order, a
/// return-value node means the server produced bad output (500) and a
/// parameter node means a bad request parameter (400). Entity property
/// failures carry neither and fall through to 422, as does an empty set.
#[must_use]
pub fn determine_status(violations: &ViolationSet) -> HttpStatus {
    let Some(first) = violations.first() else {
        return HttpStatus::UNPROCESSABLE_ENTITY;
    };

    for node in first.path() {
        match node.kind() {
            ElementKind::ReturnValue => return HttpStatus::INTERNAL_SERVER_ERROR,
            ElementKind::Parameter => return HttpStatus::BAD_REQUEST,
            _ => {},
        }
    }

    HttpStatus::UNPROCESSABLE_ENTITY
}
