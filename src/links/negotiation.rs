//! Representation selection from the `Accept` header

use crate::core::error::{ProjectionError, ProjectionResult, RequestError};
use crate::links::media::{MediaType, MediaTypeError};
use axum::http::{HeaderMap, header};
use serde::{Deserialize, Serialize};

/// `Content-Type` of responses to a media range such as `*/*`
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

const QUALITY_PARAMETER: &str = "q";

/// Level of detail of a representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Client-friendly projection (e.g. a single `Name`, a computed `Age`)
    #[default]
    Friendly,

    /// Every stored field, unprocessed
    Full,
}

/// What the response should look like
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representation {
    /// The media type the client asked for
    pub media_type: MediaType,

    /// Whether link descriptors are part of the payload
    pub include_links: bool,

    pub variant: Variant,
}

impl Representation {
    /// Value for the response `Content-Type` header
    ///
    /// The requested media type without its `q` weight. A media range is
    /// answered with plain JSON.
    pub fn content_type(&self) -> String {
        if self.media_type.is_wildcard() {
            return DEFAULT_CONTENT_TYPE.to_string();
        }
        let mut content_type = self.media_type.essence();
        for (name, value) in &self.media_type.parameters {
            if name != QUALITY_PARAMETER {
                content_type.push_str(&format!("; {name}={value}"));
            }
        }
        content_type
    }
}

/// Maps media types onto representations
///
/// Primary types are matched exactly against the configured token lists.
/// A type matching neither list gets the default variant.
#[derive(Debug, Clone, Default)]
pub struct Negotiator {
    full: Vec<String>,
    friendly: Vec<String>,
    default_variant: Variant,
}

impl Negotiator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary type tokens selecting the full variant
    pub fn with_full<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.full.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Primary type tokens selecting the friendly variant
    pub fn with_friendly<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.friendly.extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn with_default_variant(mut self, variant: Variant) -> Self {
        self.default_variant = variant;
        self
    }

    /// Pick a representation for an `Accept` value
    ///
    /// A missing value is rejected like an unparseable one.
    pub fn negotiate(&self, accept: Option<&str>) -> ProjectionResult<Representation> {
        let media_type = match accept.map(MediaType::parse) {
            Some(Ok(media_type)) => media_type,
            Some(Err(err)) => return Err(Self::reject(err)),
            None => return Err(Self::reject(MediaTypeError::Missing)),
        };

        let include_links = media_type.is_hypermedia();
        let primary = media_type.primary_type();
        let variant = if self.full.iter().any(|token| token == primary) {
            Variant::Full
        } else if self.friendly.iter().any(|token| token == primary) {
            Variant::Friendly
        } else {
            tracing::debug!(
                media_type = %media_type,
                variant = ?self.default_variant,
                "no variant registered for media type, using default"
            );
            self.default_variant
        };

        Ok(Representation {
            media_type,
            include_links,
            variant,
        })
    }

    /// Pick a representation from request headers
    pub fn negotiate_headers(&self, headers: &HeaderMap) -> ProjectionResult<Representation> {
        match headers.get(header::ACCEPT) {
            None => self.negotiate(None),
            Some(value) => {
                let value = value.to_str().map_err(|_| {
                    ProjectionError::Request(RequestError::InvalidMediaType {
                        value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                        message: "header value is not visible ASCII".to_string(),
                    })
                })?;
                self.negotiate(Some(value))
            }
        }
    }

    fn reject(err: MediaTypeError) -> ProjectionError {
        tracing::warn!(value = err.value(), error = %err, "rejected media type");
        err.into()
    }
}
