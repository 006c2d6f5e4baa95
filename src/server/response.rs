//! Response bodies and writing for shaped resources
//!
//! A shaped item serializes as its fields followed by a `links` array when
//! the negotiated representation asks for links. A collection is wrapped as
//! `{ "value": [...], "links": [...] }`.

use crate::core::error::{ProjectionError, ProjectionResult};
use crate::core::query::PaginationHeader;
use crate::core::record::ProjectedRecord;
use crate::links::{LinkDescriptor, Representation};
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// A projected record and, for hypermedia representations, its links
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedResource {
    #[serde(flatten)]
    pub record: ProjectedRecord,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkDescriptor>>,
}

impl LinkedResource {
    pub fn plain(record: ProjectedRecord) -> Self {
        Self {
            record,
            links: None,
        }
    }

    pub fn with_links(record: ProjectedRecord, links: Vec<LinkDescriptor>) -> Self {
        Self {
            record,
            links: Some(links),
        }
    }
}

/// Envelope of a page of linked resources
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedCollection {
    pub value: Vec<LinkedResource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkDescriptor>>,
}

/// Links of the API entry point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootDocument {
    pub links: Vec<LinkDescriptor>,
}

/// A JSON response with the negotiated `Content-Type`
///
/// The pagination header, when set, is written as `X-Pagination`.
#[derive(Debug, Clone)]
pub struct ShapedResponse<B> {
    status: StatusCode,
    content_type: String,
    pagination: Option<PaginationHeader>,
    body: B,
}

impl<B: Serialize> ShapedResponse<B> {
    pub fn new(body: B, representation: &Representation) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: representation.content_type(),
            pagination: None,
            body,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationHeader) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn pagination(&self) -> Option<&PaginationHeader> {
        self.pagination.as_ref()
    }

    fn try_into_response(self) -> ProjectionResult<Response> {
        let body = serde_json::to_vec(&self.body)?;
        let content_type = HeaderValue::from_str(&self.content_type).map_err(|e| {
            ProjectionError::Internal(format!("invalid content type header value: {}", e))
        })?;

        let mut response = (self.status, body).into_response();
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, content_type);
        if let Some(pagination) = &self.pagination {
            headers.insert(
                HeaderName::from_static("x-pagination"),
                pagination.to_header_value()?,
            );
        }
        Ok(response)
    }
}

impl<B: Serialize> IntoResponse for ShapedResponse<B> {
    fn into_response(self) -> Response {
        match self.try_into_response() {
            Ok(response) => response,
            Err(err) => err.into_response(),
        }
    }
}
