//! HTTP-facing side of the shaping layer
//!
//! This module provides:
//! - response bodies for shaped items, collections and the entry point
//! - [`ShapedResponse`], an axum response carrying the negotiated media type
//!   and the pagination header
//! - [`Projector`], the validate → shape → link pipeline used by handlers

pub mod projector;
pub mod response;

pub use projector::{PreparedRequest, Projector};
pub use response::{LinkedCollection, LinkedResource, RootDocument, ShapedResponse};
