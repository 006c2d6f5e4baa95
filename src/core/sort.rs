//! Translation of client sort clauses into storage sort fields
//!
//! A clause is `"<logical key>[ desc|asc]"`. Each logical key expands to the
//! storage fields its [`MappingEntry`](crate::mapping::MappingEntry) lists,
//! all sorted the same way, with the direction flipped for reverted keys:
//!
//! ```text
//! "age desc, name"  →  DateOfBirth ascending, FirstName ascending, LastName ascending
//! ```
//!
//! The resulting [`SortSpec`] is handed to the storage layer, which executes it.

use crate::core::error::{MappingError, ProjectionResult};
use crate::mapping::PropertyMapping;
use serde::Serialize;
use std::fmt;

/// One storage field of a sort specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortField {
    pub field: String,
    pub descending: bool,
}

impl SortField {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.descending {
            "descending"
        } else {
            "ascending"
        };
        write!(f, "{} {}", self.field, direction)
    }
}

/// Ordered tie-break sequence of storage fields
///
/// An empty spec means "unspecified order".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SortSpec(Vec<SortField>);

impl SortSpec {
    pub fn fields(&self) -> &[SortField] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Render as `"FirstName ascending, LastName ascending"`
    pub fn to_order_clause(&self) -> String {
        self.0
            .iter()
            .map(SortField::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl IntoIterator for SortSpec {
    type Item = SortField;
    type IntoIter = std::vec::IntoIter<SortField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The logical key of a trimmed clause: everything before the first space
pub(crate) fn logical_key(clause: &str) -> &str {
    clause.split_once(' ').map_or(clause, |(key, _)| key)
}

/// Translate an order-by string into storage sort fields
///
/// The string must have passed
/// [`validate_sort`](crate::core::validation::validate_sort) against the same
/// mapping; a key missing here is a [`MappingError::UnmappedSortKey`].
pub fn translate_order_by(order_by: &str, mapping: &PropertyMapping) -> ProjectionResult<SortSpec> {
    if order_by.trim().is_empty() {
        return Ok(SortSpec::default());
    }

    let mut spec = Vec::new();
    for clause in order_by.split(',') {
        let clause = clause.trim();
        // Only an exact, lowercase " desc" suffix sorts descending.
        let mut descending = clause.ends_with(" desc");
        let key = logical_key(clause);

        let entry = mapping.get(key).ok_or_else(|| MappingError::UnmappedSortKey {
            key: key.to_string(),
        })?;

        if entry.revert {
            descending = !descending;
        }

        spec.extend(entry.fields.iter().map(|field| SortField {
            field: field.clone(),
            descending,
        }));
    }

    let spec = SortSpec(spec);
    tracing::debug!(order_by, translated = %spec.to_order_clause(), "translated sort clauses");
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ProjectionError;
    use crate::mapping::MappingEntry;

    fn mapping() -> PropertyMapping {
        PropertyMapping::new([
            ("Id", MappingEntry::new(["Id"], false)),
            ("MainCategory", MappingEntry::new(["MainCategory"], false)),
            ("Age", MappingEntry::new(["DateOfBirth"], true)),
            ("Name", MappingEntry::new(["FirstName", "LastName"], false)),
        ])
        .unwrap()
    }

    #[test]
    fn test_logical_key() {
        assert_eq!(logical_key("age desc"), "age");
        assert_eq!(logical_key("age"), "age");
        assert_eq!(logical_key("name asc extra"), "name");
    }

    #[test]
    fn test_empty_input_is_empty_spec() {
        assert!(translate_order_by("", &mapping()).unwrap().is_empty());
        assert!(translate_order_by("  ", &mapping()).unwrap().is_empty());
    }

    #[test]
    fn test_revert_flips_descending_to_ascending() {
        let spec = translate_order_by("age desc", &mapping()).unwrap();
        assert_eq!(spec.fields(), &[SortField::ascending("DateOfBirth")]);
    }

    #[test]
    fn test_revert_flips_ascending_to_descending() {
        let spec = translate_order_by("Age", &mapping()).unwrap();
        assert_eq!(spec.fields(), &[SortField::descending("DateOfBirth")]);
    }

    #[test]
    fn test_fan_out_keeps_direction_and_declared_order() {
        let spec = translate_order_by("name desc", &mapping()).unwrap();
        assert_eq!(
            spec.fields(),
            &[
                SortField::descending("FirstName"),
                SortField::descending("LastName")
            ]
        );
    }

    #[test]
    fn test_clause_order_is_tie_break_order() {
        let spec = translate_order_by(" mainCategory , age desc,name", &mapping()).unwrap();
        assert_eq!(
            spec.to_order_clause(),
            "MainCategory ascending, DateOfBirth ascending, FirstName ascending, LastName ascending"
        );
    }

    #[test]
    fn test_desc_suffix_is_case_sensitive() {
        let spec = translate_order_by("id DESC", &mapping()).unwrap();
        assert_eq!(spec.fields(), &[SortField::ascending("Id")]);
    }

    #[test]
    fn test_unmapped_key_is_fatal() {
        let err = translate_order_by("height desc", &mapping()).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::Mapping(MappingError::UnmappedSortKey { ref key }) if key == "height"
        ));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_spec_serializes_as_list() {
        let spec = translate_order_by("age", &mapping()).unwrap();
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "field": "DateOfBirth", "descending": true }])
        );
    }
}
