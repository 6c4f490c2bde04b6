//! Sensor repository for database operations.

use async_trait::async_trait;
use domain::deadline::Deadline;
use domain::models::{Device, Sensor};
use domain::ports::{Page, RepositoryError, SensorStore};
use shared::pagination::PaginationRequest;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::generic::Repository;
use crate::entities::{DeviceEntity, SensorEntity};
use crate::error::map_sqlx_error;

/// PostgreSQL-backed [`SensorStore`].
#[derive(Clone)]
pub struct SensorRepository {
    sensors: Repository<SensorEntity>,
    devices: Repository<DeviceEntity>,
}

impl SensorRepository {
    /// Creates a new SensorRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            sensors: Repository::new(pool.clone()),
            devices: Repository::new(pool),
        }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        self.sensors.pool()
    }

    /// Attaches each sensor's parent device with a single lookup.
    async fn attach_devices(&self, sensors: &mut [Sensor]) -> Result<(), sqlx::Error> {
        let mut ids: Vec<Uuid> = sensors.iter().map(|s| s.device_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let devices: HashMap<Uuid, Device> = self
            .devices
            .find_where_in("id", &ids)
            .await?
            .into_iter()
            .map(|row| (row.id, Device::from(row)))
            .collect();

        for sensor in sensors.iter_mut() {
            sensor.device = devices.get(&sensor.device_id).cloned().map(Box::new);
        }
        Ok(())
    }
}

#[async_trait]
impl SensorStore for SensorRepository {
    async fn create(&self, sensor: &Sensor, deadline: Deadline) -> Result<Sensor, RepositoryError> {
        let entity = SensorEntity::from(sensor);
        let row = deadline
            .run(self.sensors.create(&entity))
            .await?
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update(&self, sensor: &Sensor, deadline: Deadline) -> Result<Sensor, RepositoryError> {
        let entity = SensorEntity::from(sensor);
        let row = deadline
            .run(self.sensors.update(&entity))
            .await?
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn delete(&self, sensor: &Sensor, deadline: Deadline) -> Result<(), RepositoryError> {
        deadline
            .run(self.sensors.delete(sensor.id))
            .await?
            .map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: Uuid, deadline: Deadline) -> Result<Sensor, RepositoryError> {
        let row = deadline
            .run(self.sensors.find_by_id(id))
            .await?
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn find_by_id_with_device(
        &self,
        id: Uuid,
        deadline: Deadline,
    ) -> Result<Sensor, RepositoryError> {
        deadline
            .run(async {
                let sensor: Sensor = self.sensors.find_by_id(id).await?.into();
                let mut sensors = [sensor];
                self.attach_devices(&mut sensors).await?;
                let [sensor] = sensors;
                Ok::<_, sqlx::Error>(sensor)
            })
            .await?
            .map_err(map_sqlx_error)
    }

    async fn find_all(
        &self,
        pagination: &PaginationRequest,
        deadline: Deadline,
    ) -> Result<Page<Sensor>, RepositoryError> {
        deadline
            .run(async {
                let (rows, total) = self.sensors.find_all(pagination).await?;
                let mut items: Vec<Sensor> = rows.into_iter().map(Sensor::from).collect();
                self.attach_devices(&mut items).await?;
                Ok::<_, sqlx::Error>(Page { items, total })
            })
            .await?
            .map_err(map_sqlx_error)
    }

    async fn count_by_name(&self, name: &str, deadline: Deadline) -> Result<i64, RepositoryError> {
        deadline
            .run(self.sensors.count_where("name", name))
            .await?
            .map_err(map_sqlx_error)
    }
}
