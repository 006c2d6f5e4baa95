//! Field list validation for data shaping

use crate::core::error::{ProjectionResult, RequestError};
use crate::core::shape::{Shapeable, split_list};

/// Check that every field of a comma-separated list exists on `T`
///
/// Names are trimmed and compared ignoring case. A missing, empty or blank
/// list is always valid. The first unknown name (in request order) is
/// reported.
pub fn validate_fields<T: Shapeable>(fields: Option<&str>) -> ProjectionResult<()> {
    let Some(tokens) = split_list(fields) else {
        return Ok(());
    };

    for token in tokens {
        if !T::has_field(token) {
            tracing::warn!(resource = T::TYPE_NAME, field = token, "unknown field requested");
            return Err(RequestError::UnknownField {
                resource: T::TYPE_NAME.to_string(),
                field: token.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// Predicate form of [`validate_fields`]
pub fn has_fields<T: Shapeable>(fields: Option<&str>) -> bool {
    validate_fields::<T>(fields).is_ok()
}
