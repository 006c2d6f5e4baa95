//! Named route templates and URL building
//!
//! Templates are paths with `{name}` placeholders, e.g.
//! `api/authors/{authorId}/courses`. Binding a template fills every
//! placeholder from the parameter map; parameters no placeholder consumed
//! become the query string, in insertion order.

use crate::core::error::{ConfigError, ProjectionResult};
use indexmap::IndexMap;
use regex::{Captures, Regex};
use std::sync::OnceLock;
use url::Url;

/// Route parameters in the order they should appear in a query string
pub type RouteParams = IndexMap<String, String>;

/// Turns a route name and parameters into an absolute URL
///
/// Returns `None` when the route is unknown or a parameter it needs is
/// missing.
pub trait UrlBuilder: Send + Sync {
    fn build(&self, route: &str, params: &RouteParams) -> Option<String>;
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"))
}

/// A [`UrlBuilder`] over a fixed set of named templates
#[derive(Debug, Clone)]
pub struct RouteTable {
    base: Url,
    routes: IndexMap<String, String>,
}

impl RouteTable {
    /// Create an empty table resolving against `base_url`
    pub fn new(base_url: &str) -> ProjectionResult<Self> {
        let invalid = |message: &str| ConfigError::InvalidValue {
            field: "base_url".to_string(),
            value: base_url.to_string(),
            message: message.to_string(),
        };

        let base = Url::parse(base_url).map_err(|e| invalid(&e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base").into());
        }

        Ok(Self {
            base,
            routes: IndexMap::new(),
        })
    }

    pub fn with_route(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(name, template);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.routes.insert(name.into(), template.into());
    }

    pub fn template(&self, name: &str) -> Option<&str> {
        self.routes.get(name).map(String::as_str)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Fill the placeholders of one path segment, recording consumed names
    fn bind_segment(
        segment: &str,
        params: &RouteParams,
        consumed: &mut Vec<String>,
    ) -> Option<String> {
        let mut missing = false;
        let bound = placeholder_regex().replace_all(segment, |caps: &Captures| {
            let name = &caps[1];
            match params.get(name).filter(|value| !value.is_empty()) {
                Some(value) => {
                    consumed.push(name.to_string());
                    value.clone()
                }
                None => {
                    missing = true;
                    String::new()
                }
            }
        });

        if missing {
            None
        } else {
            Some(bound.into_owned())
        }
    }
}

impl UrlBuilder for RouteTable {
    fn build(&self, route: &str, params: &RouteParams) -> Option<String> {
        let template = self.routes.get(route)?;
        let mut consumed = Vec::new();
        let mut url = self.base.clone();

        {
            let mut segments = url.path_segments_mut().ok()?;
            segments.pop_if_empty();
            for segment in template.split('/').filter(|s| !s.is_empty()) {
                let bound = Self::bind_segment(segment, params, &mut consumed);
                let Some(bound) = bound else {
                    tracing::debug!(route, segment, "missing route parameter");
                    return None;
                };
                segments.push(&bound);
            }
        }

        let mut query = params
            .iter()
            .filter(|(name, _)| !consumed.contains(name))
            .peekable();
        if query.peek().is_some() {
            url.query_pairs_mut()
                .extend_pairs(query.map(|(name, value)| (name.as_str(), value.as_str())));
        }

        Some(url.to_string())
    }
}
