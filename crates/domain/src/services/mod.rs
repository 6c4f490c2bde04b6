//! Use-case services.
//!
//! Each operation fixes a [`Deadline`](crate::deadline::Deadline) on entry, validates input, talks to
//! its store and converts the result into a response payload. Storage
//! errors never leave this module; they are tagged with a [`DomainError`]
//! kind first.

pub mod device;
pub mod sensor;

pub use device::DeviceService;
pub use sensor::SensorService;

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::DomainError;
use crate::ports::RepositoryError;

/// Parses a path identifier. Malformed ids cannot match any row.
fn parse_id(entity: &str, raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        info!(entity, id = raw, "Malformed id, treating as not found");
        not_found(entity)
    })
}

fn not_found(entity: &str) -> DomainError {
    DomainError::NotFound(format!("{} not found", entity))
}

fn name_taken(entity: &str) -> DomainError {
    DomainError::Conflict(format!("{} name already exist", entity))
}

/// Tags a storage error with its domain kind.
fn map_repository_error(entity: &str, action: &str, err: RepositoryError) -> DomainError {
    match err {
        RepositoryError::NotFound => {
            info!(entity, action, "Record not found");
            not_found(entity)
        }
        RepositoryError::UniqueViolation(constraint) => {
            info!(entity, action, constraint = %constraint, "Unique constraint rejected write");
            name_taken(entity)
        }
        RepositoryError::Timeout | RepositoryError::Storage(_) => {
            warn!(entity, action, error = %err, "Storage operation failed");
            DomainError::Internal(format!("failed to {} {}: {}", action, entity, err))
        }
    }
}
