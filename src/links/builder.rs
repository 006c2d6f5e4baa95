//! Construction of hypermedia link sets
//!
//! The builder knows link relations and which parameters each link carries.
//! It never knows concrete URLs: route names come from [`ResourceLinks`]
//! and are turned into URLs by a [`UrlBuilder`]. A route the builder cannot
//! resolve fails the whole link set.

use crate::core::error::{LinkError, ProjectionResult};
use crate::core::query::{PageMeta, ResourceParameters};
use crate::links::routes::{RouteParams, UrlBuilder};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const REL_SELF: &str = "self";
pub const REL_PREVIOUS_PAGE: &str = "previous-page";
pub const REL_NEXT_PAGE: &str = "next-page";

fn default_method() -> String {
    "GET".to_string()
}

/// One navigational link of a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDescriptor {
    pub href: String,
    pub rel: String,
    pub method: String,
}

impl LinkDescriptor {
    pub fn new(href: impl Into<String>, rel: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            method: method.into(),
        }
    }
}

/// A route name and the HTTP method used to follow it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTemplate {
    pub route: String,

    #[serde(default = "default_method")]
    pub method: String,
}

impl LinkTemplate {
    pub fn new(route: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            method: method.into(),
        }
    }
}

/// A parameterless link of the API entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootLink {
    pub rel: String,
    pub route: String,

    #[serde(default = "default_method")]
    pub method: String,
}

/// Link templates of one exposed resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLinks {
    /// Route parameter carrying the resource id (`authorId`)
    pub id_param: String,

    /// Route of a single resource, bound with the id
    pub self_route: String,

    /// Route of the paged collection
    pub collection_route: String,

    /// Query parameter name of the category filter (`mainCategory`)
    #[serde(default)]
    pub category_param: Option<String>,

    /// Related-action links, relation → template, bound with the id
    #[serde(default)]
    pub related: IndexMap<String, LinkTemplate>,
}

impl ResourceLinks {
    pub fn new(
        id_param: impl Into<String>,
        self_route: impl Into<String>,
        collection_route: impl Into<String>,
    ) -> Self {
        Self {
            id_param: id_param.into(),
            self_route: self_route.into(),
            collection_route: collection_route.into(),
            category_param: None,
            related: IndexMap::new(),
        }
    }

    pub fn with_category_param(mut self, name: impl Into<String>) -> Self {
        self.category_param = Some(name.into());
        self
    }

    pub fn with_related(
        mut self,
        rel: impl Into<String>,
        route: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        self.related.insert(rel.into(), LinkTemplate::new(route, method));
        self
    }
}

/// Builds link descriptors through a [`UrlBuilder`]
#[derive(Clone)]
pub struct LinkBuilder {
    urls: Arc<dyn UrlBuilder>,
}

impl LinkBuilder {
    pub fn new(urls: Arc<dyn UrlBuilder>) -> Self {
        Self { urls }
    }

    fn url(&self, route: &str, params: &RouteParams) -> ProjectionResult<String> {
        self.urls.build(route, params).ok_or_else(|| {
            LinkError::UnresolvedRoute {
                route: route.to_string(),
            }
            .into()
        })
    }

    fn link(
        &self,
        route: &str,
        params: &RouteParams,
        rel: &str,
        method: &str,
    ) -> ProjectionResult<LinkDescriptor> {
        Ok(LinkDescriptor::new(self.url(route, params)?, rel, method))
    }

    /// Links of a single resource
    ///
    /// `self` comes first and carries the field list when one was given, so
    /// following it reproduces the same shape. Related-action links follow
    /// in template order. `scope` holds parent route parameters of nested
    /// resources.
    pub fn item_links(
        &self,
        resource: &ResourceLinks,
        scope: &RouteParams,
        id: &str,
        fields: Option<&str>,
    ) -> ProjectionResult<Vec<LinkDescriptor>> {
        let mut id_params = scope.clone();
        id_params.insert(resource.id_param.clone(), id.to_string());

        let mut self_params = id_params.clone();
        if let Some(fields) = non_blank(fields) {
            self_params.insert("fields".to_string(), fields.to_string());
        }

        let mut links = Vec::with_capacity(resource.related.len() + 1);
        links.push(self.link(&resource.self_route, &self_params, REL_SELF, "GET")?);
        for (rel, template) in &resource.related {
            links.push(self.link(&template.route, &id_params, rel, &template.method)?);
        }
        Ok(links)
    }

    /// URL of one page of a collection, reproducing every active parameter
    ///
    /// `scope` holds the route's own parameters (e.g. the parent id of a
    /// nested collection).
    pub fn page_url(
        &self,
        resource: &ResourceLinks,
        scope: &RouteParams,
        params: &ResourceParameters,
        page_number: u32,
    ) -> ProjectionResult<String> {
        let mut route_params = scope.clone();
        let mut put = |name: &str, value: Option<&str>| {
            if let Some(value) = non_blank(value) {
                route_params.insert(name.to_string(), value.to_string());
            }
        };

        put("fields", params.fields());
        put("orderBy", params.order_by());
        put("searchQuery", params.search_query.as_deref());
        if let Some(category_param) = &resource.category_param {
            put(category_param.as_str(), params.category.as_deref());
        }
        put("pageNumber", Some(&page_number.to_string()));
        put("pageSize", Some(&params.page_size.to_string()));

        self.url(&resource.collection_route, &route_params)
    }

    /// URLs of the previous and next pages, when they exist
    pub fn adjacent_pages(
        &self,
        resource: &ResourceLinks,
        scope: &RouteParams,
        params: &ResourceParameters,
        meta: &PageMeta,
    ) -> ProjectionResult<(Option<String>, Option<String>)> {
        let previous = if meta.has_previous {
            Some(self.page_url(resource, scope, params, meta.current_page - 1)?)
        } else {
            None
        };
        let next = if meta.has_next {
            Some(self.page_url(resource, scope, params, meta.current_page + 1)?)
        } else {
            None
        };
        Ok((previous, next))
    }

    /// Links of a page of a collection: `self`, then `previous-page` and
    /// `next-page` when those pages exist
    pub fn collection_links(
        &self,
        resource: &ResourceLinks,
        scope: &RouteParams,
        params: &ResourceParameters,
        meta: &PageMeta,
    ) -> ProjectionResult<Vec<LinkDescriptor>> {
        let current = self.page_url(resource, scope, params, meta.current_page)?;
        let (previous, next) = self.adjacent_pages(resource, scope, params, meta)?;

        let mut links = vec![LinkDescriptor::new(current, REL_SELF, "GET")];
        if let Some(previous) = previous {
            links.push(LinkDescriptor::new(previous, REL_PREVIOUS_PAGE, "GET"));
        }
        if let Some(next) = next {
            links.push(LinkDescriptor::new(next, REL_NEXT_PAGE, "GET"));
        }
        Ok(links)
    }

    /// Links of the API entry point document
    pub fn root_links(&self, links: &[RootLink]) -> ProjectionResult<Vec<LinkDescriptor>> {
        let no_params = RouteParams::new();
        links
            .iter()
            .map(|link| self.link(&link.route, &no_params, &link.rel, &link.method))
            .collect()
    }
}

impl std::fmt::Debug for LinkBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkBuilder").finish_non_exhaustive()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
