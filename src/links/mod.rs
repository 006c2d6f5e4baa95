//! Hypermedia negotiation and link construction
//!
//! This module decides, from the `Accept` header, whether a response carries
//! links and which detail level it uses, and builds the links themselves from
//! route templates. It is agnostic to resource types: every route name and
//! relation comes from configuration.

pub mod builder;
pub mod media;
pub mod negotiation;
pub mod routes;

pub use builder::{LinkBuilder, LinkDescriptor, LinkTemplate, ResourceLinks, RootLink};
pub use media::{MediaType, MediaTypeError};
pub use negotiation::{Negotiator, Representation, Variant};
pub use routes::{RouteParams, RouteTable, UrlBuilder};
