//! Early rejection of client-supplied field lists and sort clauses
//!
//! Both checks are pure predicates. Handlers run them before fetching any
//! data and turn a failure into a `400 Bad Request` through
//! [`ProjectionError`](crate::core::error::ProjectionError)'s `IntoResponse`.

pub mod fields;
pub mod sort;

pub use fields::{has_fields, validate_fields};
pub use sort::{has_sort_keys, validate_sort};
