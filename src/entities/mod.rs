//! Helpers for declaring exposed resources

pub mod macros;
