//! Sort clause validation against a property mapping

use crate::core::error::{ProjectionResult, RequestError};
use crate::core::shape::split_list;
use crate::core::sort::logical_key;
use crate::mapping::PropertyMapping;

/// Check that every clause of an order-by string names a mapped logical key
///
/// Clauses are comma-separated; anything after the first space of a trimmed
/// clause (`" desc"`, `" asc"`) is ignored. A missing or blank string is
/// always valid.
pub fn validate_sort(mapping: &PropertyMapping, order_by: Option<&str>) -> ProjectionResult<()> {
    let Some(clauses) = split_list(order_by) else {
        return Ok(());
    };

    for clause in clauses {
        let key = logical_key(clause);
        if !mapping.contains_key(key) {
            tracing::warn!(key, clause, "unknown sort key requested");
            return Err(RequestError::UnknownSortKey {
                key: key.to_string(),
                clause: clause.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// Predicate form of [`validate_sort`]
pub fn has_sort_keys(mapping: &PropertyMapping, order_by: Option<&str>) -> bool {
    validate_sort(mapping, order_by).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ProjectionError;
    use crate::mapping::MappingEntry;

    fn mapping() -> PropertyMapping {
        PropertyMapping::new([
            ("Age", MappingEntry::new(["DateOfBirth"], true)),
            ("Name", MappingEntry::new(["FirstName", "LastName"], false)),
        ])
        .unwrap()
    }

    #[test]
    fn test_absent_or_blank_is_valid() {
        assert!(has_sort_keys(&mapping(), None));
        assert!(has_sort_keys(&mapping(), Some(" ")));
    }

    #[test]
    fn test_direction_qualifiers_are_ignored() {
        assert!(has_sort_keys(&mapping(), Some("age desc, name asc")));
        assert!(has_sort_keys(&mapping(), Some("Name whatever follows")));
    }

    #[test]
    fn test_storage_field_is_not_a_logical_key() {
        let err = validate_sort(&mapping(), Some("name, DateOfBirth desc")).unwrap_err();
        match err {
            ProjectionError::Request(RequestError::UnknownSortKey { key, clause }) => {
                assert_eq!(key, "DateOfBirth");
                assert_eq!(clause, "DateOfBirth desc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_clause_is_rejected() {
        assert!(!has_sort_keys(&mapping(), Some("age,,name")));
    }
}
