//! Macros for reducing boilerplate when exposing resources
//!
//! These macros generate the static accessor tables that replace runtime
//! reflection: each exposed resource lists its public fields once, in
//! declaration order, with a getter per field.

/// Implement [`Shapeable`](crate::core::shape::Shapeable) for a resource type
///
/// Each field is declared with its canonical name and a closure reading it.
/// The closure may return anything convertible into
/// [`FieldValue`](crate::core::field::FieldValue), including `Option<T>`
/// (which becomes `null` when absent).
///
/// # Example
///
/// ```rust,ignore
/// use shape::prelude::*;
///
/// pub struct AuthorDto {
///     pub id: Uuid,
///     pub name: String,
///     pub age: i32,
///     pub main_category: String,
/// }
///
/// impl_shapeable!(AuthorDto, "author", {
///     "Id" => |a| a.id,
///     "Name" => |a| a.name.clone(),
///     "Age" => |a| a.age,
///     "MainCategory" => |a| a.main_category.clone(),
/// });
/// ```
#[macro_export]
macro_rules! impl_shapeable {
    (
        $type:ty,
        $type_name:expr,
        {
            $( $field:literal => |$arg:ident| $body:expr ),+ $(,)?
        }
    ) => {
        impl $crate::core::shape::Shapeable for $type {
            const TYPE_NAME: &'static str = $type_name;

            fn field_accessors() -> &'static [$crate::core::shape::FieldAccessor<Self>] {
                const ACCESSORS: &[$crate::core::shape::FieldAccessor<$type>] = &[
                    $(
                        $crate::core::shape::FieldAccessor::new(
                            $field,
                            |$arg: &$type| -> $crate::core::field::FieldValue {
                                $crate::core::field::FieldValue::from($body)
                            },
                        ),
                    )+
                ];
                ACCESSORS
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::field::FieldValue;
    use crate::core::shape::Shapeable;
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    struct Author {
        id: Uuid,
        first_name: String,
        date_of_birth: DateTime<Utc>,
        date_of_death: Option<DateTime<Utc>>,
    }

    impl_shapeable!(Author, "full-author", {
        "Id" => |a| a.id,
        "FirstName" => |a| a.first_name.clone(),
        "DateOfBirth" => |a| a.date_of_birth,
        "DateOfDeath" => |a| a.date_of_death,
    });

    #[test]
    fn test_generated_table_keeps_declaration_order() {
        let names: Vec<_> = Author::field_accessors().iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Id", "FirstName", "DateOfBirth", "DateOfDeath"]);
        assert_eq!(Author::TYPE_NAME, "full-author");
    }

    #[test]
    fn test_generated_getters_read_current_values() {
        let born = Utc.with_ymd_and_hms(1650, 7, 23, 0, 0, 0).unwrap();
        let author = Author {
            id: Uuid::nil(),
            first_name: "Eli".to_string(),
            date_of_birth: born,
            date_of_death: None,
        };

        let get = |name: &str| Author::accessor(name).map(|a| (a.get)(&author));
        assert_eq!(get("firstname"), Some(FieldValue::from("Eli")));
        assert_eq!(get("DATEOFBIRTH"), Some(FieldValue::DateTime(born)));
        assert_eq!(get("DateOfDeath"), Some(FieldValue::Null));
        assert_eq!(get("LastName"), None);
    }

    #[test]
    fn test_has_field_ignores_case() {
        assert!(Author::has_field("id"));
        assert!(Author::has_field("dateofdeath"));
        assert!(!Author::has_field("Name"));
    }
}
