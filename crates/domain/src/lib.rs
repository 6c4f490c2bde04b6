//! Domain layer for the IoT registry backend.
//!
//! This crate contains:
//! - Domain models (Device, Sensor) and their request/response payloads
//! - Repository ports implemented by the persistence layer
//! - Use-case services with per-call deadlines
//! - Domain error types

pub mod deadline;
pub mod error;
pub mod memory;
pub mod models;
pub mod ports;
pub mod services;

pub use deadline::Deadline;
pub use error::DomainError;
