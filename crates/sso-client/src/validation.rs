//! Request parameter validation
//!
//! Endpoints with required parameters check them locally before any
//! request is issued, so an incomplete call never reaches the wire.

use crate::error::{RequestError, RequestResult};

/// Check that every required parameter is present and non-empty.
///
/// Returns [`RequestError::MissingParameters`] naming both the required
/// set and the parameters that were actually supplied.
pub fn validate_required(
    parameters: &[(&str, &str)],
    required: &[&str],
) -> RequestResult<()> {
    let given: Vec<&str> = parameters
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, _)| *name)
        .collect();

    if required.iter().all(|name| given.contains(name)) {
        return Ok(());
    }

    Err(RequestError::MissingParameters {
        required: required.iter().map(|s| s.to_string()).collect(),
        given: given.iter().map(|s| s.to_string()).collect(),
    })
}
