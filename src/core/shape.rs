//! Data shaping: projecting a resource onto a client-chosen field list
//!
//! Resources opt in by implementing [`Shapeable`], which exposes a static
//! accessor table (field name → getter) in declaration order. The
//! [`impl_shapeable!`](crate::impl_shapeable) macro generates it.
//!
//! # Field selection
//!
//! - `None`, `""` or only whitespace: every field, in declaration order
//! - otherwise: comma-separated names, trimmed, matched case-insensitively,
//!   emitted under the declared name in request order
//! - repeated names are emitted once, at the position of their first mention

use crate::core::error::{ProjectionResult, ShapeError};
use crate::core::field::FieldValue;
use crate::core::record::ProjectedRecord;

/// A named getter for one public field of a resource
pub struct FieldAccessor<T> {
    /// Canonical (declared-case) field name
    pub name: &'static str,

    /// Reads the current value of the field
    pub get: fn(&T) -> FieldValue,
}

impl<T> FieldAccessor<T> {
    pub const fn new(name: &'static str, get: fn(&T) -> FieldValue) -> Self {
        Self { name, get }
    }
}

impl<T> Clone for FieldAccessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldAccessor<T> {}

impl<T> std::fmt::Debug for FieldAccessor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("name", &self.name)
            .finish()
    }
}

/// A resource whose public fields can be picked by name
pub trait Shapeable: Sized + 'static {
    /// Name used in error messages and as the registry key for sort mappings
    const TYPE_NAME: &'static str;

    /// All public fields, in declaration order
    fn field_accessors() -> &'static [FieldAccessor<Self>];

    /// Find the accessor for a field name, ignoring case
    fn accessor(name: &str) -> Option<&'static FieldAccessor<Self>> {
        Self::field_accessors()
            .iter()
            .find(|accessor| accessor.name.eq_ignore_ascii_case(name))
    }

    /// Whether the resource has a public field with this name, ignoring case
    fn has_field(name: &str) -> bool {
        Self::accessor(name).is_some()
    }
}

/// Split a comma-separated list into trimmed tokens, or `None` when it is blank
pub(crate) fn split_list(list: Option<&str>) -> Option<impl Iterator<Item = &str>> {
    let list = list.filter(|s| !s.trim().is_empty())?;
    Some(list.split(',').map(str::trim))
}

/// Resolve a field list to the accessors that will be read, in output order
fn resolve<T: Shapeable>(fields: Option<&str>) -> ProjectionResult<Vec<&'static FieldAccessor<T>>> {
    let Some(tokens) = split_list(fields) else {
        return Ok(T::field_accessors().iter().collect());
    };

    let mut selected: Vec<&'static FieldAccessor<T>> = Vec::new();
    for token in tokens {
        let accessor = T::accessor(token).ok_or_else(|| ShapeError::Resolution {
            resource: T::TYPE_NAME.to_string(),
            field: token.to_string(),
        })?;
        if !selected.iter().any(|s| s.name == accessor.name) {
            selected.push(accessor);
        }
    }
    Ok(selected)
}

fn project<T>(source: &T, accessors: &[&'static FieldAccessor<T>]) -> ProjectedRecord {
    let mut record = ProjectedRecord::with_capacity(accessors.len());
    for accessor in accessors {
        record.insert_once(accessor.name, (accessor.get)(source));
    }
    record
}

/// Shape a single resource
///
/// `fields` is expected to have passed
/// [`validate_fields`](crate::core::validation::validate_fields); an
/// unresolvable name here is reported as [`ShapeError::Resolution`].
pub fn shape<T: Shapeable>(source: &T, fields: Option<&str>) -> ProjectionResult<ProjectedRecord> {
    let accessors = resolve::<T>(fields)?;
    Ok(project(source, &accessors))
}

/// Shape every resource of a sequence, one record per element, in input order
///
/// The field list is resolved once; the sequence is walked exactly once.
pub fn shape_all<'a, T, I>(
    sources: I,
    fields: Option<&str>,
) -> ProjectionResult<Vec<ProjectedRecord>>
where
    T: Shapeable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let accessors = resolve::<T>(fields)?;
    Ok(sources
        .into_iter()
        .map(|source| project(source, &accessors))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ProjectionError;

    struct Course {
        id: i64,
        title: String,
        description: Option<String>,
    }

    crate::impl_shapeable!(Course, "course", {
        "Id" => |c| c.id,
        "Title" => |c| c.title.clone(),
        "Description" => |c| c.description.clone(),
    });

    fn course() -> Course {
        Course {
            id: 7,
            title: "Commandeering a Ship Without Getting Caught".to_string(),
            description: None,
        }
    }

    #[test]
    fn test_empty_list_selects_all_in_declaration_order() {
        for fields in [None, Some(""), Some("   ")] {
            let record = shape(&course(), fields).unwrap();
            assert_eq!(
                record.keys().collect::<Vec<_>>(),
                vec!["Id", "Title", "Description"]
            );
        }
    }

    #[test]
    fn test_selection_uses_request_order_and_canonical_names() {
        let record = shape(&course(), Some(" title , id")).unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["Title", "Id"]);
        assert_eq!(record.get("Id"), Some(&FieldValue::Integer(7)));
    }

    #[test]
    fn test_duplicates_are_emitted_once() {
        let record = shape(&course(), Some("Id,id,Title,ID")).unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["Id", "Title"]);
    }

    #[test]
    fn test_none_values_become_null() {
        let record = shape(&course(), Some("Description")).unwrap();
        assert_eq!(record.get("Description"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_unresolvable_field_is_resolution_error() {
        let err = shape(&course(), Some("Id,Author")).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::Shape(ShapeError::Resolution { ref field, .. }) if field == "Author"
        ));
    }

    #[test]
    fn test_shape_all_preserves_input_order() {
        let courses = vec![
            Course {
                id: 1,
                title: "a".to_string(),
                description: None,
            },
            Course {
                id: 2,
                title: "b".to_string(),
                description: None,
            },
        ];
        let records = shape_all(&courses, Some("Id")).unwrap();
        let ids: Vec<_> = records
            .iter()
            .map(|r| r.get("Id").and_then(FieldValue::as_integer))
            .collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_shape_all_accepts_single_pass_iterators() {
        let courses = [course(), course()];
        let records = shape_all(courses.iter().filter(|c| c.id == 7), Some("Title")).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_shape_all_reports_error_before_touching_input() {
        let empty: Vec<Course> = Vec::new();
        assert!(shape_all(&empty, Some("Nope")).is_err());
    }
}
