//! Media type parsing
//!
//! Splits a header value such as
//! `application/vnd.marvin.author.friendly.hateoas+json; charset=utf-8` into
//! its type, subtype, structured-syntax suffix and parameters. Parsing is
//! pure and does not decide anything about the representation; see
//! [`Negotiator`](crate::links::Negotiator) for that.

use crate::core::error::{ProjectionError, RequestError};
use indexmap::IndexMap;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Marker at the end of a subtype that asks for hypermedia links
pub const HYPERMEDIA_MARKER: &str = "hateoas";

/// Matches any type or subtype in a media range
pub const WILDCARD: &str = "*";

/// Why a header value is not a usable media type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaTypeError {
    #[error("no media type given")]
    Missing,

    #[error("only a single media type is supported, got '{value}'")]
    MultipleValues { value: String },

    #[error("'{value}' is not of the form type/subtype")]
    Malformed { value: String },

    #[error("parameter '{parameter}' of '{value}' is not of the form name=value")]
    InvalidParameter { value: String, parameter: String },
}

impl MediaTypeError {
    /// The offending header value, empty when none was given
    pub fn value(&self) -> &str {
        match self {
            MediaTypeError::Missing => "",
            MediaTypeError::MultipleValues { value }
            | MediaTypeError::Malformed { value }
            | MediaTypeError::InvalidParameter { value, .. } => value,
        }
    }
}

impl From<MediaTypeError> for ProjectionError {
    fn from(err: MediaTypeError) -> Self {
        ProjectionError::Request(RequestError::InvalidMediaType {
            value: err.value().to_string(),
            message: err.to_string(),
        })
    }
}

/// A parsed media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    /// Top-level type, lowercased (`application`)
    pub type_: String,

    /// Full subtype including any suffix, lowercased
    /// (`vnd.marvin.author.friendly.hateoas+json`)
    pub subtype: String,

    /// Structured syntax suffix after the last `+` (`json`)
    pub suffix: Option<String>,

    /// Parameters in header order, names lowercased
    pub parameters: IndexMap<String, String>,
}

fn essence_regex() -> &'static Regex {
    static ESSENCE: OnceLock<Regex> = OnceLock::new();
    ESSENCE.get_or_init(|| {
        Regex::new(
            r"^(\*|[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*)/(\*|[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*)$",
        )
        .expect("media type pattern is valid")
    })
}

impl MediaType {
    /// Parse a single `Accept` or `Content-Type` value
    ///
    /// Lists (`a/b, c/d`) and quality weighting are not supported and are
    /// rejected as [`MediaTypeError::MultipleValues`].
    pub fn parse(value: &str) -> Result<Self, MediaTypeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(MediaTypeError::Missing);
        }
        if trimmed.contains(',') {
            return Err(MediaTypeError::MultipleValues {
                value: value.to_string(),
            });
        }

        let mut parts = trimmed.split(';');
        let essence = parts.next().unwrap_or_default().trim();
        let captures = essence_regex()
            .captures(essence)
            .ok_or_else(|| MediaTypeError::Malformed {
                value: value.to_string(),
            })?;
        // `*/json` is not a media range
        if &captures[1] == WILDCARD && &captures[2] != WILDCARD {
            return Err(MediaTypeError::Malformed {
                value: value.to_string(),
            });
        }

        let type_ = captures[1].to_ascii_lowercase();
        let subtype = captures[2].to_ascii_lowercase();
        let suffix = subtype
            .rsplit_once('+')
            .map(|(_, suffix)| suffix.to_string())
            .filter(|suffix| !suffix.is_empty());

        let mut parameters = IndexMap::new();
        for parameter in parts.map(str::trim).filter(|p| !p.is_empty()) {
            let (name, param_value) =
                parameter
                    .split_once('=')
                    .ok_or_else(|| MediaTypeError::InvalidParameter {
                        value: value.to_string(),
                        parameter: parameter.to_string(),
                    })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(MediaTypeError::InvalidParameter {
                    value: value.to_string(),
                    parameter: parameter.to_string(),
                });
            }
            parameters.insert(
                name.to_ascii_lowercase(),
                param_value.trim().trim_matches('"').to_string(),
            );
        }

        Ok(Self {
            type_,
            subtype,
            suffix,
            parameters,
        })
    }

    /// The subtype with its `+suffix` removed
    pub fn subtype_without_suffix(&self) -> &str {
        self.subtype
            .rsplit_once('+')
            .map_or(self.subtype.as_str(), |(subtype, _)| subtype)
    }

    /// Whether the client asked for a representation with links
    pub fn is_hypermedia(&self) -> bool {
        self.subtype_without_suffix().ends_with(HYPERMEDIA_MARKER)
    }

    /// The suffix-free subtype without the hypermedia marker and its separator
    ///
    /// `vnd.marvin.author.full.hateoas+json` → `vnd.marvin.author.full`
    pub fn primary_type(&self) -> &str {
        let subtype = self.subtype_without_suffix();
        let subtype = subtype.strip_suffix(HYPERMEDIA_MARKER).unwrap_or(subtype);
        subtype.strip_suffix('.').unwrap_or(subtype)
    }

    /// Whether this is a media range (`*/*`, `application/*`)
    pub fn is_wildcard(&self) -> bool {
        self.type_ == WILDCARD || self.subtype == WILDCARD
    }

    /// `type/subtype` without parameters
    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.parameters {
            write!(f, "; {}={}", name, value)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for MediaType {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vendor_type() {
        let media = MediaType::parse("application/vnd.marvin.hateoas+json").unwrap();
        assert_eq!(media.type_, "application");
        assert_eq!(media.subtype, "vnd.marvin.hateoas+json");
        assert_eq!(media.suffix.as_deref(), Some("json"));
        assert_eq!(media.subtype_without_suffix(), "vnd.marvin.hateoas");
        assert!(media.parameters.is_empty());
    }

    #[test]
    fn test_parse_plain_type_without_suffix() {
        let media = MediaType::parse("application/json").unwrap();
        assert_eq!(media.suffix, None);
        assert_eq!(media.subtype_without_suffix(), "json");
        assert!(!media.is_hypermedia());
        assert_eq!(media.primary_type(), "json");
    }

    #[test]
    fn test_parse_parameters() {
        let media =
            MediaType::parse("application/vnd.marvin.author.full+json; Charset=\"utf-8\"; v=2")
                .unwrap();
        assert_eq!(media.parameters.get("charset").map(String::as_str), Some("utf-8"));
        assert_eq!(media.parameters.get("v").map(String::as_str), Some("2"));
        assert_eq!(media.essence(), "application/vnd.marvin.author.full+json");
        assert_eq!(
            media.to_string(),
            "application/vnd.marvin.author.full+json; charset=utf-8; v=2"
        );
    }

    #[test]
    fn test_parse_media_ranges() {
        let any = MediaType::parse("*/*").unwrap();
        assert!(any.is_wildcard());
        assert!(!any.is_hypermedia());
        assert_eq!(any.primary_type(), "*");

        let application = MediaType::parse("Application/*; q=0.8").unwrap();
        assert_eq!(application.type_, "application");
        assert_eq!(application.subtype, "*");
        assert_eq!(application.suffix, None);
        assert!(application.is_wildcard());

        assert!(!MediaType::parse("application/json").unwrap().is_wildcard());
    }

    #[test]
    fn test_wildcard_type_needs_wildcard_subtype() {
        assert!(matches!(
            MediaType::parse("*/json"),
            Err(MediaTypeError::Malformed { .. })
        ));
        assert!(matches!(
            MediaType::parse("application/**"),
            Err(MediaTypeError::Malformed { .. })
        ));
    }

    #[test]
    fn test_hypermedia_marker_ignores_case() {
        let media = MediaType::parse("application/vnd.marvin.HATEOAS+json").unwrap();
        assert!(media.is_hypermedia());
    }

    #[test]
    fn test_primary_type_strips_marker() {
        let media = MediaType::parse("application/vnd.marvin.author.full.hateoas+json").unwrap();
        assert!(media.is_hypermedia());
        assert_eq!(media.primary_type(), "vnd.marvin.author.full");

        let media = MediaType::parse("application/vnd.marvin.author.friendly+json").unwrap();
        assert!(!media.is_hypermedia());
        assert_eq!(media.primary_type(), "vnd.marvin.author.friendly");
    }

    #[test]
    fn test_marker_must_end_the_subtype() {
        let media = MediaType::parse("application/vnd.hateoas.author+json").unwrap();
        assert!(!media.is_hypermedia());
    }

    #[test]
    fn test_unparseable_values() {
        assert_eq!(MediaType::parse("  "), Err(MediaTypeError::Missing));
        assert!(matches!(
            MediaType::parse("json"),
            Err(MediaTypeError::Malformed { .. })
        ));
        assert!(matches!(
            MediaType::parse("application/"),
            Err(MediaTypeError::Malformed { .. })
        ));
        assert!(matches!(
            MediaType::parse("application/json; charset"),
            Err(MediaTypeError::InvalidParameter { .. })
        ));
        assert!(matches!(
            MediaType::parse("application/json, text/html"),
            Err(MediaTypeError::MultipleValues { .. })
        ));
    }

    #[test]
    fn test_error_converts_to_bad_request() {
        let err: ProjectionError = MediaType::parse("garbage").unwrap_err().into();
        assert!(err.is_client_error());
        assert_eq!(err.error_code(), "INVALID_MEDIA_TYPE");
        assert!(err.to_string().contains("garbage"));
    }
}
