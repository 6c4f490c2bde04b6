//! Device repository for database operations.

use async_trait::async_trait;
use domain::deadline::Deadline;
use domain::models::{Device, Sensor};
use domain::ports::{DeviceStore, Page, RepositoryError};
use shared::pagination::PaginationRequest;
use sqlx::PgPool;
use uuid::Uuid;

use super::generic::Repository;
use crate::entities::{DeviceEntity, SensorEntity};
use crate::error::map_sqlx_error;

/// PostgreSQL-backed [`DeviceStore`].
#[derive(Clone)]
pub struct DeviceRepository {
    devices: Repository<DeviceEntity>,
    sensors: Repository<SensorEntity>,
}

impl DeviceRepository {
    /// Creates a new DeviceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            devices: Repository::new(pool.clone()),
            sensors: Repository::new(pool),
        }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        self.devices.pool()
    }
}

#[async_trait]
impl DeviceStore for DeviceRepository {
    async fn create(&self, device: &Device, deadline: Deadline) -> Result<Device, RepositoryError> {
        let entity = DeviceEntity::from(device);
        let row = deadline
            .run(self.devices.create(&entity))
            .await?
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update(&self, device: &Device, deadline: Deadline) -> Result<Device, RepositoryError> {
        let entity = DeviceEntity::from(device);
        let row = deadline
            .run(self.devices.update(&entity))
            .await?
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn delete(&self, device: &Device, deadline: Deadline) -> Result<(), RepositoryError> {
        deadline
            .run(self.devices.delete(device.id))
            .await?
            .map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: Uuid, deadline: Deadline) -> Result<Device, RepositoryError> {
        let row = deadline
            .run(self.devices.find_by_id(id))
            .await?
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn find_by_id_with_sensors(
        &self,
        id: Uuid,
        deadline: Deadline,
    ) -> Result<Device, RepositoryError> {
        deadline
            .run(async {
                let mut device: Device = self.devices.find_by_id(id).await?.into();
                let sensors = self.sensors.find_where_in("device_id", &[id]).await?;
                device.sensors = Some(sensors.into_iter().map(Sensor::from).collect());
                Ok::<_, sqlx::Error>(device)
            })
            .await?
            .map_err(map_sqlx_error)
    }

    async fn find_all(
        &self,
        pagination: &PaginationRequest,
        deadline: Deadline,
    ) -> Result<Page<Device>, RepositoryError> {
        let (rows, total) = deadline
            .run(self.devices.find_all(pagination))
            .await?
            .map_err(map_sqlx_error)?;

        Ok(Page {
            items: rows.into_iter().map(Device::from).collect(),
            total,
        })
    }

    async fn count_by_name(&self, name: &str, deadline: Deadline) -> Result<i64, RepositoryError> {
        deadline
            .run(self.devices.count_where("name", name))
            .await?
            .map_err(map_sqlx_error)
    }
}
