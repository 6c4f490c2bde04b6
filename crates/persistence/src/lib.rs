//! Persistence layer for the IoT registry backend.
//!
//! This crate contains:
//! - Database connection management and embedded migrations
//! - Entity definitions (database row mappings)
//! - A generic table repository and the device/sensor stores built on it

pub mod db;
pub mod entities;
pub mod error;
pub mod repositories;
pub mod timing;
