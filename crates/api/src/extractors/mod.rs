//! Custom Axum extractors.
//!
//! Extractors for parsing request data. Every rejection is reported as an
//! [`ApiError`](crate::error::ApiError) so it shares the error envelope.

pub mod json;
pub mod pagination;

pub use json::JsonBody;
pub use pagination::{ListParams, Pagination};
