//! Device use cases.

use chrono::Utc;
use shared::pagination::{PaginationRequest, PaginationResponse};
use shared::validation::join_messages;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use validator::Validate;

use super::{map_repository_error, name_taken, parse_id};
use crate::deadline::{Deadline, DEFAULT_OPERATION_TIMEOUT};
use crate::error::DomainError;
use crate::models::{
    CreateDeviceRequest, DeviceResponse, UpdateDeviceRequest, DEVICE_SORTABLE_COLUMNS,
};
use crate::ports::DeviceStore;

const ENTITY: &str = "device";

/// Create, list, fetch, patch and delete devices.
#[derive(Clone)]
pub struct DeviceService {
    store: Arc<dyn DeviceStore>,
    timeout: Duration,
}

impl DeviceService {
    pub fn new(store: Arc<dyn DeviceStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Overrides the per-operation deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn deadline(&self) -> Deadline {
        Deadline::after(self.timeout)
    }

    /// Validates and stores a new device. Names must be unique.
    pub async fn create(&self, request: &CreateDeviceRequest) -> Result<DeviceResponse, DomainError> {
        let deadline = self.deadline();

        request
            .validate()
            .map_err(|e| DomainError::Validation(join_messages(&e)))?;

        let exists = self
            .store
            .exists_by_name(&request.name, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "check name of", e))?;
        if exists {
            return Err(name_taken(ENTITY));
        }

        let device = request.to_device(Utc::now());
        let created = self
            .store
            .create(&device, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "create", e))?;

        info!(device_id = %created.id, name = %created.name, "Created device");

        Ok(DeviceResponse::from(&created))
    }

    /// Lists one page of devices with pagination metadata.
    pub async fn find_all(
        &self,
        pagination: &PaginationRequest,
    ) -> Result<(Vec<DeviceResponse>, PaginationResponse), DomainError> {
        let deadline = self.deadline();

        pagination
            .ensure_sortable(DEVICE_SORTABLE_COLUMNS)
            .map_err(|e| DomainError::Validation(e.to_string()))?;

        let page = self
            .store
            .find_all(pagination, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "list", e))?;

        let devices = page.items.iter().map(DeviceResponse::from).collect();
        Ok((devices, pagination.to_response(page.total)))
    }

    /// Fetches a device with its sensors.
    pub async fn find_by_id(&self, id: &str) -> Result<DeviceResponse, DomainError> {
        let deadline = self.deadline();
        let id = parse_id(ENTITY, id)?;

        let device = self
            .store
            .find_by_id_with_sensors(id, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "find", e))?;

        Ok(DeviceResponse::from(&device))
    }

    /// Applies a patch to an existing device.
    ///
    /// The device is loaded before the patch is validated, so an unknown id
    /// reports NotFound even when the patch is also invalid.
    pub async fn update(
        &self,
        id: &str,
        request: &UpdateDeviceRequest,
    ) -> Result<DeviceResponse, DomainError> {
        let deadline = self.deadline();
        let id = parse_id(ENTITY, id)?;

        let mut device = self
            .store
            .find_by_id(id, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "find", e))?;

        request
            .validate()
            .map_err(|e| DomainError::Validation(join_messages(&e)))?;

        request.apply_to(&mut device);
        device.updated_at = Utc::now();

        let updated = self
            .store
            .update(&device, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "update", e))?;

        info!(device_id = %updated.id, "Updated device");

        Ok(DeviceResponse::from(&updated))
    }

    /// Hard-deletes a device and, through the foreign key, its sensors.
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let deadline = self.deadline();
        let id = parse_id(ENTITY, id)?;

        let device = self
            .store
            .find_by_id(id, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "find", e))?;

        self.store
            .delete(&device, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "delete", e))?;

        info!(device_id = %device.id, "Deleted device");

        Ok(())
    }
}
