//! # Shape-RS
//!
//! Data shaping, sort-key mapping and hypermedia negotiation for RESTful
//! APIs in Rust.
//!
//! ## Features
//!
//! - **Data Shaping**: Clients pick the fields they want (`?fields=id,name`)
//! - **Logical Sort Keys**: `?orderBy=age desc` fans out to storage fields,
//!   with per-key direction reversal
//! - **Early Rejection**: Unknown fields and sort keys are `400 Bad Request`
//!   before any data is fetched
//! - **Content Negotiation**: Vendor media types select links and detail level
//! - **Configuration-Based**: Mappings, routes and link templates come from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shape::prelude::*;
//!
//! pub struct AuthorDto {
//!     pub id: Uuid,
//!     pub name: String,
//!     pub age: i32,
//! }
//!
//! impl_shapeable!(AuthorDto, "author", {
//!     "Id" => |a| a.id,
//!     "Name" => |a| a.name.clone(),
//!     "Age" => |a| a.age,
//! });
//!
//! let projector = Projector::from_config(ProjectionConfig::default_config())?;
//! let prepared = projector.prepare::<AuthorDto>("Author", params, &headers)?;
//! // fetch a page sorted by `prepared.sort` ...
//! let response = projector.collection(&page, &prepared, &RouteParams::new(), |a| a.id.to_string())?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod links;
pub mod mapping;
pub mod server;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        age::current_age,
        error::{
            ConfigError, ErrorResponse, LinkError, MappingError, ProjectionError,
            ProjectionResult, RequestError, ShapeError,
        },
        field::FieldValue,
        query::{
            PAGINATION_HEADER, PageMeta, PagedList, PaginationHeader, ResourceParameters,
            parse_id_list,
        },
        record::ProjectedRecord,
        shape::{FieldAccessor, Shapeable, shape, shape_all},
        sort::{SortField, SortSpec, translate_order_by},
        validation::{has_fields, has_sort_keys, validate_fields, validate_sort},
    };

    // === Macros ===
    pub use crate::impl_shapeable;

    // === Mapping ===
    pub use crate::mapping::{
        MappingEntry, PropertyMapping, PropertyMappingRegistry, PropertyMappingRegistryBuilder,
    };

    // === Links ===
    pub use crate::links::{
        LinkBuilder, LinkDescriptor, LinkTemplate, MediaType, MediaTypeError, Negotiator,
        Representation, ResourceLinks, RootLink, RouteParams, RouteTable, UrlBuilder, Variant,
    };

    // === Config ===
    pub use crate::config::{MappingConfig, MediaTypesConfig, PagingConfig, ProjectionConfig};

    // === Server ===
    pub use crate::server::{
        LinkedCollection, LinkedResource, PreparedRequest, Projector, RootDocument,
        ShapedResponse,
    };

    // === External dependencies ===
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
