//! Repository ports.
//!
//! The use-case services talk to storage only through these traits. The
//! persistence crate implements them on PostgreSQL; [`crate::memory`]
//! implements them in memory.

use async_trait::async_trait;
use shared::pagination::PaginationRequest;
use thiserror::Error;
use uuid::Uuid;

use crate::deadline::Deadline;
use crate::models::{Device, Sensor};

/// Storage-level failure reported by a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("operation deadline exceeded")]
    Timeout,

    #[error("storage error: {0}")]
    Storage(String),
}

/// One page of rows plus the number of rows matching overall.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Storage operations for devices.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Inserts a device and returns the stored row.
    async fn create(&self, device: &Device, deadline: Deadline) -> Result<Device, RepositoryError>;

    /// Overwrites every mutable column of an existing device.
    async fn update(&self, device: &Device, deadline: Deadline) -> Result<Device, RepositoryError>;

    /// Hard-deletes a device. Its sensors go with it.
    async fn delete(&self, device: &Device, deadline: Deadline) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid, deadline: Deadline) -> Result<Device, RepositoryError>;

    /// Like [`DeviceStore::find_by_id`] with `sensors` populated.
    async fn find_by_id_with_sensors(
        &self,
        id: Uuid,
        deadline: Deadline,
    ) -> Result<Device, RepositoryError>;

    /// Filters by name, orders and pages. `order_by` must already be whitelisted.
    async fn find_all(
        &self,
        pagination: &PaginationRequest,
        deadline: Deadline,
    ) -> Result<Page<Device>, RepositoryError>;

    async fn count_by_name(&self, name: &str, deadline: Deadline) -> Result<i64, RepositoryError>;

    async fn exists_by_name(&self, name: &str, deadline: Deadline) -> Result<bool, RepositoryError> {
        Ok(self.count_by_name(name, deadline).await? > 0)
    }
}

/// Storage operations for sensors.
#[async_trait]
pub trait SensorStore: Send + Sync {
    /// Inserts a sensor. A dangling `device_id` fails as [`RepositoryError::Storage`].
    async fn create(&self, sensor: &Sensor, deadline: Deadline) -> Result<Sensor, RepositoryError>;

    async fn update(&self, sensor: &Sensor, deadline: Deadline) -> Result<Sensor, RepositoryError>;

    async fn delete(&self, sensor: &Sensor, deadline: Deadline) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid, deadline: Deadline) -> Result<Sensor, RepositoryError>;

    /// Like [`SensorStore::find_by_id`] with the parent `device` populated.
    async fn find_by_id_with_device(
        &self,
        id: Uuid,
        deadline: Deadline,
    ) -> Result<Sensor, RepositoryError>;

    /// Filters by name, orders and pages, with each parent `device` populated.
    async fn find_all(
        &self,
        pagination: &PaginationRequest,
        deadline: Deadline,
    ) -> Result<Page<Sensor>, RepositoryError>;

    async fn count_by_name(&self, name: &str, deadline: Deadline) -> Result<i64, RepositoryError>;

    async fn exists_by_name(&self, name: &str, deadline: Deadline) -> Result<bool, RepositoryError> {
        Ok(self.count_by_name(name, deadline).await? > 0)
    }
}
