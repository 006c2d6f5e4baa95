//! Request-to-response pipeline for shaped resources
//!
//! [`Projector`] bundles the runtime objects built from
//! [`ProjectionConfig`] and runs the steps a handler needs, in order:
//!
//! 1. [`prepare`](Projector::prepare): reject unknown fields and sort keys,
//!    negotiate the representation, translate the sort order
//! 2. the handler fetches data with the translated [`SortSpec`]
//! 3. [`item`](Projector::item) / [`collection`](Projector::collection):
//!    shape, add links when negotiated, and wrap in a [`ShapedResponse`]

use crate::config::ProjectionConfig;
use crate::core::error::ProjectionResult;
use crate::core::query::{PagedList, PaginationHeader, ResourceParameters};
use crate::core::shape::{Shapeable, shape, shape_all};
use crate::core::sort::{SortSpec, translate_order_by};
use crate::core::validation::{validate_fields, validate_sort};
use crate::links::{LinkBuilder, Negotiator, Representation, RouteParams, UrlBuilder};
use crate::mapping::PropertyMappingRegistry;
use crate::server::response::{LinkedCollection, LinkedResource, RootDocument, ShapedResponse};
use axum::http::HeaderMap;
use std::sync::Arc;

/// A request that passed validation and negotiation
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// Parameters with paging limits applied
    pub params: ResourceParameters,

    /// Storage sort order, empty when none was asked for
    pub sort: SortSpec,

    pub representation: Representation,
}

/// Shared, read-only shaping state for all handlers
#[derive(Clone)]
pub struct Projector {
    config: Arc<ProjectionConfig>,
    registry: Arc<PropertyMappingRegistry>,
    negotiator: Arc<Negotiator>,
    links: LinkBuilder,
}

impl Projector {
    /// Build every runtime object from a configuration
    ///
    /// Misconfigured mappings or routes fail here, at startup.
    pub fn from_config(config: ProjectionConfig) -> ProjectionResult<Self> {
        config.validate()?;
        let registry = config.build_registry()?;
        let routes = config.route_table()?;
        Ok(Self::with_url_builder(config, registry, Arc::new(routes)))
    }

    /// Use a custom URL builder instead of the configured route table
    pub fn with_url_builder(
        config: ProjectionConfig,
        registry: PropertyMappingRegistry,
        urls: Arc<dyn UrlBuilder>,
    ) -> Self {
        tracing::info!(
            mappings = registry.len(),
            resources = config.resources.len(),
            "projector ready"
        );
        Self {
            negotiator: Arc::new(config.negotiator()),
            config: Arc::new(config),
            registry: Arc::new(registry),
            links: LinkBuilder::new(urls),
        }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn registry(&self) -> &PropertyMappingRegistry {
        &self.registry
    }

    pub fn negotiator(&self) -> &Negotiator {
        &self.negotiator
    }

    pub fn link_builder(&self) -> &LinkBuilder {
        &self.links
    }

    /// Validate a request for resources of type `T` stored as `storage`
    pub fn prepare<T: Shapeable>(
        &self,
        storage: &str,
        params: ResourceParameters,
        headers: &HeaderMap,
    ) -> ProjectionResult<PreparedRequest> {
        validate_fields::<T>(params.fields())?;
        let mapping = self.registry.lookup_for::<T>(storage)?;
        validate_sort(mapping, params.order_by())?;

        let representation = self.negotiator.negotiate_headers(headers)?;
        let sort = translate_order_by(params.order_by().unwrap_or_default(), mapping)?;

        Ok(PreparedRequest {
            params: params.normalize(&self.config.paging),
            sort,
            representation,
        })
    }

    /// Shape a single resource
    ///
    /// `scope` holds parent route parameters of nested resources.
    pub fn item<T: Shapeable>(
        &self,
        resource: &T,
        scope: &RouteParams,
        id: &str,
        fields: Option<&str>,
        representation: &Representation,
    ) -> ProjectionResult<ShapedResponse<LinkedResource>> {
        let record = shape(resource, fields)?;
        let body = if representation.include_links {
            let templates = self.config.resource_links(T::TYPE_NAME)?;
            let links = self.links.item_links(templates, scope, id, fields)?;
            LinkedResource::with_links(record, links)
        } else {
            LinkedResource::plain(record)
        };
        Ok(ShapedResponse::new(body, representation))
    }

    /// Shape one page of resources
    ///
    /// `scope` holds the collection route's own parameters and `id_of`
    /// renders the id each item's links are bound with. Adjacent page URIs
    /// go to the pagination header when the body carries no links.
    pub fn collection<T, F>(
        &self,
        page: &PagedList<T>,
        request: &PreparedRequest,
        scope: &RouteParams,
        id_of: F,
    ) -> ProjectionResult<ShapedResponse<LinkedCollection>>
    where
        T: Shapeable,
        F: Fn(&T) -> String,
    {
        let params = &request.params;
        let representation = &request.representation;
        let templates = self.config.resource_links(T::TYPE_NAME)?;
        let records = shape_all(page, params.fields())?;

        let mut pagination = PaginationHeader::new(&page.meta);
        let body = if representation.include_links {
            let value = page
                .iter()
                .zip(records)
                .map(|(item, record)| -> ProjectionResult<LinkedResource> {
                    let links = self
                        .links
                        .item_links(templates, scope, &id_of(item), params.fields())?;
                    Ok(LinkedResource::with_links(record, links))
                })
                .collect::<ProjectionResult<Vec<_>>>()?;
            let links = self
                .links
                .collection_links(templates, scope, params, &page.meta)?;
            LinkedCollection {
                value,
                links: Some(links),
            }
        } else {
            let (previous, next) = self
                .links
                .adjacent_pages(templates, scope, params, &page.meta)?;
            pagination = pagination.with_page_links(previous, next);
            LinkedCollection {
                value: records.into_iter().map(LinkedResource::plain).collect(),
                links: None,
            }
        };

        Ok(ShapedResponse::new(body, representation).with_pagination(pagination))
    }

    /// The API entry point document
    pub fn root(
        &self,
        representation: &Representation,
    ) -> ProjectionResult<ShapedResponse<RootDocument>> {
        let links = if representation.include_links {
            self.links.root_links(&self.config.root_links)?
        } else {
            Vec::new()
        };
        Ok(ShapedResponse::new(RootDocument { links }, representation))
    }
}

impl std::fmt::Debug for Projector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projector")
            .field("registry", &self.registry)
            .field("negotiator", &self.negotiator)
            .finish_non_exhaustive()
    }
}
