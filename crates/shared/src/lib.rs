//! Shared utilities and common types for the IoT registry backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Offset pagination request/response types
//! - Common validation logic
//! - Timestamp formatting for wire responses

pub mod pagination;
pub mod time;
pub mod validation;
