//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Rejected client input returns 400 and misconfiguration returns 500
//! - Error responses are properly formatted
//! - Error conversions work correctly

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use shape::prelude::*;

async fn body_json(err: ProjectionError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_request_errors_return_400() {
        let errors = [
            ProjectionError::Request(RequestError::UnknownField {
                resource: "author".to_string(),
                field: "nickname".to_string(),
            }),
            ProjectionError::Request(RequestError::UnknownSortKey {
                key: "height".to_string(),
                clause: "height desc".to_string(),
            }),
            ProjectionError::Request(RequestError::InvalidMediaType {
                value: "garbage".to_string(),
                message: "not a media type".to_string(),
            }),
            ProjectionError::Request(RequestError::InvalidIdList {
                value: "x".to_string(),
            }),
        ];
        for err in errors {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{err}");
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn test_mapping_errors_return_500() {
        let err = ProjectionError::Mapping(MappingError::NotFound {
            exposed: "author".to_string(),
            storage: "Author".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_client_error());

        let err = ProjectionError::Mapping(MappingError::Ambiguous {
            exposed: "author".to_string(),
            storage: "Author".to_string(),
            matches: 2,
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_link_and_shape_errors_return_500() {
        let err = ProjectionError::Link(LinkError::UnresolvedRoute {
            route: "GetAuthor".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ProjectionError::Shape(ShapeError::Resolution {
            resource: "author".to_string(),
            field: "Name".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// Error Response Format Tests
// =============================================================================

mod response_format_tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_field_response_names_the_field() {
        let err = validate_fields::<Course>(Some("title,rating")).unwrap_err();
        let (status, json) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "UNKNOWN_FIELD");
        assert!(json["message"].as_str().unwrap().contains("rating"));
        assert_eq!(json["details"]["field"], "rating");
        assert_eq!(json["details"]["resource"], "course");
    }

    #[tokio::test]
    async fn test_unknown_sort_key_response_names_the_clause() {
        let mapping =
            PropertyMapping::new([("Title", MappingEntry::new(["Title"], false))]).unwrap();
        let err = validate_sort(&mapping, Some("title, rating desc")).unwrap_err();
        let (status, json) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "UNKNOWN_SORT_KEY");
        assert_eq!(json["details"]["key"], "rating");
        assert_eq!(json["details"]["clause"], "rating desc");
    }

    #[tokio::test]
    async fn test_invalid_media_type_response_names_the_value() {
        let err = Negotiator::new().negotiate(Some("text")).unwrap_err();
        let (status, json) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_MEDIA_TYPE");
        assert_eq!(json["details"]["value"], "text");
    }

    #[tokio::test]
    async fn test_internal_error_has_no_details() {
        let (status, json) = body_json(ProjectionError::Internal("boom".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert!(json.get("details").is_none());
    }

    struct Course {
        title: String,
    }

    impl_shapeable!(Course, "course", {
        "Title" => |c| c.title.clone(),
    });
}

// =============================================================================
// Error Conversion Tests
// =============================================================================

mod conversion_tests {
    use super::*;

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ProjectionError = json_err.into();
        assert!(matches!(err, ProjectionError::Internal(_)));
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<ProjectionConfig>("base_url: [").unwrap_err();
        let err: ProjectionError = yaml_err.into();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_anyhow_roundtrip_keeps_variant() {
        let original = ProjectionError::Mapping(MappingError::UnmappedSortKey {
            key: "age".to_string(),
        });
        let any: anyhow::Error = original.into();
        let back: ProjectionError = any.into();
        assert_eq!(back.error_code(), "UNMAPPED_SORT_KEY");
    }

    #[test]
    fn test_error_matching() {
        let result = parse_id_list(Some("not-a-uuid"));
        match result {
            Err(ProjectionError::Request(RequestError::InvalidIdList { value })) => {
                assert_eq!(value, "not-a-uuid");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
