//! Core module containing the shaping, sorting and paging primitives

pub mod age;
pub mod error;
pub mod field;
pub mod query;
pub mod record;
pub mod shape;
pub mod sort;
pub mod validation;

pub use age::current_age;
pub use error::{
    ConfigError, ErrorResponse, LinkError, MappingError, ProjectionError, ProjectionResult,
    RequestError, ShapeError,
};
pub use field::FieldValue;
pub use query::{
    PAGINATION_HEADER, PageMeta, PagedList, PaginationHeader, ResourceParameters, parse_id_list,
};
pub use record::ProjectedRecord;
pub use shape::{FieldAccessor, Shapeable, shape, shape_all};
pub use sort::{SortField, SortSpec, translate_order_by};
pub use validation::{has_fields, has_sort_keys, validate_fields, validate_sort};
