//! Typed error handling for the shaping layer
//!
//! Errors are split by who is at fault. User-facing kinds describe a bad
//! request (an unknown field, an unknown sort key, an unparseable media type)
//! and map to `400 Bad Request`. Everything else points at a misconfigured
//! registry or route table and maps to `500 Internal Server Error`.
//!
//! # Error Categories
//!
//! - [`RequestError`]: Rejected client input (shaping, sorting, negotiation)
//! - [`MappingError`]: Property-mapping registry misconfiguration
//! - [`ShapeError`]: Projection failures past validation
//! - [`LinkError`]: Hypermedia link construction failures
//! - [`ConfigError`]: Configuration parsing and validation
//!
//! # Example
//!
//! ```rust,ignore
//! use shape::prelude::*;
//!
//! match validate_fields::<AuthorDto>(Some("id,nickname")) {
//!     Ok(()) => {}
//!     Err(ProjectionError::Request(RequestError::UnknownField { field, .. })) => {
//!         println!("no field named {}", field);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for the shaping layer
#[derive(Debug)]
pub enum ProjectionError {
    /// Client input was rejected
    Request(RequestError),

    /// The property-mapping registry is misconfigured
    Mapping(MappingError),

    /// A validated field list could not be projected
    Shape(ShapeError),

    /// A hypermedia link could not be built
    Link(LinkError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionError::Request(e) => write!(f, "{}", e),
            ProjectionError::Mapping(e) => write!(f, "{}", e),
            ProjectionError::Shape(e) => write!(f, "{}", e),
            ProjectionError::Link(e) => write!(f, "{}", e),
            ProjectionError::Config(e) => write!(f, "{}", e),
            ProjectionError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ProjectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProjectionError::Request(e) => Some(e),
            ProjectionError::Mapping(e) => Some(e),
            ProjectionError::Shape(e) => Some(e),
            ProjectionError::Link(e) => Some(e),
            ProjectionError::Config(e) => Some(e),
            ProjectionError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ProjectionError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProjectionError::Request(e) => e.status_code(),
            ProjectionError::Mapping(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProjectionError::Shape(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProjectionError::Link(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProjectionError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProjectionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ProjectionError::Request(e) => e.error_code(),
            ProjectionError::Mapping(e) => e.error_code(),
            ProjectionError::Shape(_) => "SHAPE_RESOLUTION_ERROR",
            ProjectionError::Link(e) => e.error_code(),
            ProjectionError::Config(_) => "CONFIG_ERROR",
            ProjectionError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error was caused by the client and should be surfaced as a 4xx
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ProjectionError::Request(RequestError::UnknownField { resource, field }) => {
                Some(serde_json::json!({
                    "resource": resource,
                    "field": field
                }))
            }
            ProjectionError::Request(RequestError::UnknownSortKey { key, clause }) => {
                Some(serde_json::json!({
                    "key": key,
                    "clause": clause
                }))
            }
            ProjectionError::Request(RequestError::InvalidMediaType { value, .. }) => {
                Some(serde_json::json!({ "value": value }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ProjectionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Client input that was rejected before any data was fetched
#[derive(Debug)]
pub enum RequestError {
    /// A requested field is not a public field of the exposed resource
    UnknownField { resource: String, field: String },

    /// A sort clause names a key the property mapping does not know
    UnknownSortKey { key: String, clause: String },

    /// The Accept or Content-Type value is missing or not a media type
    InvalidMediaType { value: String, message: String },

    /// A delimited id list contains an element that is not a UUID
    InvalidIdList { value: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::UnknownField { resource, field } => {
                write!(
                    f,
                    "The resource '{}' does not have a field named '{}'",
                    resource, field
                )
            }
            RequestError::UnknownSortKey { key, clause } => {
                write!(f, "Cannot sort by '{}' (clause '{}')", key, clause)
            }
            RequestError::InvalidMediaType { value, message } => {
                write!(f, "Invalid media type '{}': {}", value, message)
            }
            RequestError::InvalidIdList { value } => {
                write!(f, "Invalid id in list: '{}'", value)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::UnknownField { .. } => "UNKNOWN_FIELD",
            RequestError::UnknownSortKey { .. } => "UNKNOWN_SORT_KEY",
            RequestError::InvalidMediaType { .. } => "INVALID_MEDIA_TYPE",
            RequestError::InvalidIdList { .. } => "INVALID_ID_LIST",
        }
    }
}

impl From<RequestError> for ProjectionError {
    fn from(err: RequestError) -> Self {
        ProjectionError::Request(err)
    }
}

// =============================================================================
// Mapping Errors
// =============================================================================

/// Misconfiguration of the property-mapping registry
///
/// These are programmer errors. They surface at startup when the registry is
/// built, or as a 500 when a handler asks for a mapping that was never
/// registered.
#[derive(Debug)]
pub enum MappingError {
    /// No table registered for the (exposed, storage) pair
    NotFound { exposed: String, storage: String },

    /// More than one table matches the (exposed, storage) pair
    Ambiguous {
        exposed: String,
        storage: String,
        matches: usize,
    },

    /// A table for the (exposed, storage) pair is already registered
    Duplicate { exposed: String, storage: String },

    /// A logical key maps to no storage field
    EmptyEntry { key: String },

    /// The same logical key (ignoring case) was declared twice
    DuplicateKey { key: String },

    /// A sort key reached translation without passing validation
    UnmappedSortKey { key: String },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::NotFound { exposed, storage } => {
                write!(
                    f,
                    "No property mapping registered for <{}, {}>",
                    exposed, storage
                )
            }
            MappingError::Ambiguous {
                exposed,
                storage,
                matches,
            } => {
                write!(
                    f,
                    "Cannot find exact property mapping for <{}, {}>: {} candidates",
                    exposed, storage, matches
                )
            }
            MappingError::Duplicate { exposed, storage } => {
                write!(
                    f,
                    "Property mapping for <{}, {}> is already registered",
                    exposed, storage
                )
            }
            MappingError::EmptyEntry { key } => {
                write!(f, "Logical key '{}' maps to no storage field", key)
            }
            MappingError::DuplicateKey { key } => {
                write!(f, "Logical key '{}' is declared more than once", key)
            }
            MappingError::UnmappedSortKey { key } => {
                write!(f, "Key mapping for '{}' is missing", key)
            }
        }
    }
}

impl std::error::Error for MappingError {}

impl MappingError {
    pub fn error_code(&self) -> &'static str {
        match self {
            MappingError::NotFound { .. } => "MAPPING_NOT_FOUND",
            MappingError::Ambiguous { .. } => "AMBIGUOUS_MAPPING",
            MappingError::Duplicate { .. } => "DUPLICATE_MAPPING",
            MappingError::EmptyEntry { .. } => "EMPTY_MAPPING_ENTRY",
            MappingError::DuplicateKey { .. } => "DUPLICATE_MAPPING_KEY",
            MappingError::UnmappedSortKey { .. } => "UNMAPPED_SORT_KEY",
        }
    }
}

impl From<MappingError> for ProjectionError {
    fn from(err: MappingError) -> Self {
        ProjectionError::Mapping(err)
    }
}

// =============================================================================
// Shape Errors
// =============================================================================

/// Errors raised while projecting a resource
#[derive(Debug)]
pub enum ShapeError {
    /// A field passed validation but has no accessor on the resource
    Resolution { resource: String, field: String },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::Resolution { resource, field } => {
                write!(f, "The field '{}' is not on '{}'", field, resource)
            }
        }
    }
}

impl std::error::Error for ShapeError {}

impl From<ShapeError> for ProjectionError {
    fn from(err: ShapeError) -> Self {
        ProjectionError::Shape(err)
    }
}

// =============================================================================
// Link Errors
// =============================================================================

/// Errors raised while building hypermedia links
#[derive(Debug)]
pub enum LinkError {
    /// The URL builder could not resolve the named route
    UnresolvedRoute { route: String },

    /// A resource has no link configuration
    UnknownResource { resource: String },
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::UnresolvedRoute { route } => {
                write!(f, "Route '{}' could not be resolved to a URL", route)
            }
            LinkError::UnknownResource { resource } => {
                write!(f, "No link configuration for resource '{}'", resource)
            }
        }
    }
}

impl std::error::Error for LinkError {}

impl LinkError {
    pub fn error_code(&self) -> &'static str {
        match self {
            LinkError::UnresolvedRoute { .. } => "UNRESOLVED_ROUTE",
            LinkError::UnknownResource { .. } => "UNKNOWN_LINK_RESOURCE",
        }
    }
}

impl From<LinkError> for ProjectionError {
    fn from(err: LinkError) -> Self {
        ProjectionError::Link(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ProjectionError {
    fn from(err: ConfigError) -> Self {
        ProjectionError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for ProjectionError {
    fn from(err: serde_json::Error) -> Self {
        ProjectionError::Internal(format!("JSON serialization failed: {}", err))
    }
}

impl From<std::io::Error> for ProjectionError {
    fn from(err: std::io::Error) -> Self {
        ProjectionError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for ProjectionError {
    fn from(err: serde_yaml::Error) -> Self {
        ProjectionError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<anyhow::Error> for ProjectionError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ProjectionError>() {
            Ok(projection_err) => projection_err,
            Err(other) => ProjectionError::Internal(other.to_string()),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for shaping operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_display() {
        let err = RequestError::UnknownField {
            resource: "author".to_string(),
            field: "nickname".to_string(),
        };
        assert!(err.to_string().contains("author"));
        assert!(err.to_string().contains("nickname"));
    }

    #[test]
    fn test_request_errors_are_bad_request() {
        let errors = vec![
            RequestError::UnknownField {
                resource: "author".to_string(),
                field: "x".to_string(),
            },
            RequestError::UnknownSortKey {
                key: "x".to_string(),
                clause: "x desc".to_string(),
            },
            RequestError::InvalidMediaType {
                value: "nope".to_string(),
                message: "missing '/'".to_string(),
            },
            RequestError::InvalidIdList {
                value: "nope".to_string(),
            },
        ];
        for err in errors {
            let err: ProjectionError = err.into();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn test_mapping_errors_are_server_errors() {
        let err: ProjectionError = MappingError::NotFound {
            exposed: "author".to_string(),
            storage: "Author".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "MAPPING_NOT_FOUND");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_error_response_details() {
        let err = ProjectionError::Request(RequestError::UnknownSortKey {
            key: "height".to_string(),
            clause: "height desc".to_string(),
        });
        let response = err.to_response();
        assert_eq!(response.code, "UNKNOWN_SORT_KEY");
        let details = response.details.expect("details should be present");
        assert_eq!(details["key"], "height");
        assert_eq!(details["clause"], "height desc");
    }

    #[test]
    fn test_server_errors_have_no_details() {
        let err = ProjectionError::Link(LinkError::UnresolvedRoute {
            route: "GetAuthor".to_string(),
        });
        assert!(err.to_response().details.is_none());
        assert_eq!(err.error_code(), "UNRESOLVED_ROUTE");
    }

    #[test]
    fn test_from_anyhow_preserves_projection_error() {
        let original = ProjectionError::Mapping(MappingError::DuplicateKey {
            key: "age".to_string(),
        });
        let wrapped = anyhow::Error::new(original);
        let restored: ProjectionError = wrapped.into();
        assert!(matches!(
            restored,
            ProjectionError::Mapping(MappingError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_from_anyhow_other_becomes_internal() {
        let restored: ProjectionError = anyhow::anyhow!("boom").into();
        assert!(matches!(restored, ProjectionError::Internal(ref m) if m == "boom"));
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<Vec<String>>("{ not: [a list").unwrap_err();
        let err: ProjectionError = yaml_err.into();
        assert!(matches!(
            err,
            ProjectionError::Config(ConfigError::ParseError { file: None, .. })
        ));
    }
}
