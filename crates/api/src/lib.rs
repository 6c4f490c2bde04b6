//! HTTP surface of the IoT registry: configuration, router, handlers and
//! middleware.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;
