//! In-memory store for development and testing.
//!
//! Mirrors the PostgreSQL schema's guarantees: unique names per table, a
//! foreign key from sensors to devices with cascading delete, and listing
//! with case-insensitive name search, ordering and paging.

use async_trait::async_trait;
use shared::pagination::{PaginationRequest, SortDirection};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::deadline::Deadline;
use crate::models::{Device, Sensor};
use crate::ports::{DeviceStore, Page, RepositoryError, SensorStore};

const DEVICE_NAME_KEY: &str = "devices_name_key";
const SENSOR_NAME_KEY: &str = "sensors_name_key";
const SENSOR_DEVICE_FKEY: &str = "sensors_device_id_fkey";

#[derive(Debug, Default)]
struct State {
    devices: HashMap<Uuid, Device>,
    sensors: HashMap<Uuid, Sensor>,
}

/// Both stores backed by one lock-protected map pair.
///
/// Rows are kept without relations; eager loads are assembled on read.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
    /// Artificial delay applied to every operation.
    latency: Option<Duration>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every operation by `latency`, for exercising deadlines.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn device_count(&self) -> usize {
        self.state.read().await.devices.len()
    }

    pub async fn sensor_count(&self) -> usize {
        self.state.read().await.sensors.len()
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn strip_device(device: &Device) -> Device {
    Device {
        sensors: None,
        ..device.clone()
    }
}

fn strip_sensor(sensor: &Sensor) -> Sensor {
    Sensor {
        device: None,
        ..sensor.clone()
    }
}

fn matches_search(name: &str, search: &str) -> bool {
    search.is_empty() || name.to_lowercase().contains(&search.to_lowercase())
}

/// NULLs sort after every value in ascending order, as in PostgreSQL.
fn cmp_nullable(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

fn compare_devices(a: &Device, b: &Device, column: &str) -> Ordering {
    match column {
        "id" => a.id.cmp(&b.id),
        "name" => a.name.cmp(&b.name),
        "location" => cmp_nullable(&a.location, &b.location),
        "status" => a.status.cmp(&b.status),
        "updated_at" => a.updated_at.cmp(&b.updated_at),
        _ => a.created_at.cmp(&b.created_at),
    }
}

fn compare_sensors(a: &Sensor, b: &Sensor, column: &str) -> Ordering {
    match column {
        "id" => a.id.cmp(&b.id),
        "device_id" => a.device_id.cmp(&b.device_id),
        "name" => a.name.cmp(&b.name),
        "type" => a.sensor_type.cmp(&b.sensor_type),
        "unit" => cmp_nullable(&a.unit, &b.unit),
        "is_active" => a.is_active.cmp(&b.is_active),
        "updated_at" => a.updated_at.cmp(&b.updated_at),
        _ => a.created_at.cmp(&b.created_at),
    }
}

/// Sorts by the requested column, breaking ties on `id` ascending.
fn paginate<T, F, I>(
    mut rows: Vec<T>,
    pagination: &PaginationRequest,
    compare: F,
    id: I,
) -> Page<T>
where
    F: Fn(&T, &T, &str) -> Ordering,
    I: Fn(&T) -> Uuid,
{
    rows.sort_by(|a, b| {
        let primary = compare(a, b, &pagination.order_by);
        let primary = match pagination.sort_by {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| id(a).cmp(&id(b)))
    });

    let total = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(pagination.offset().max(0) as usize)
        .take(pagination.limit.max(0) as usize)
        .collect();

    Page { items, total }
}

fn foreign_key_violation() -> RepositoryError {
    RepositoryError::Storage(format!(
        "insert or update on table \"sensors\" violates foreign key constraint \"{}\"",
        SENSOR_DEVICE_FKEY
    ))
}

#[async_trait]
impl DeviceStore for InMemoryStore {
    async fn create(&self, device: &Device, deadline: Deadline) -> Result<Device, RepositoryError> {
        deadline
            .run(async {
                self.pause().await;
                let mut state = self.state.write().await;
                if state.devices.values().any(|d| d.name == device.name) {
                    return Err(RepositoryError::UniqueViolation(DEVICE_NAME_KEY.into()));
                }
                let row = strip_device(device);
                state.devices.insert(row.id, row.clone());
                Ok(row)
            })
            .await?
    }

    async fn update(&self, device: &Device, deadline: Deadline) -> Result<Device, RepositoryError> {
        deadline
            .run(async {
                self.pause().await;
                let mut state = self.state.write().await;
                if !state.devices.contains_key(&device.id) {
                    return Err(RepositoryError::NotFound);
                }
                if state
                    .devices
                    .values()
                    .any(|d| d.id != device.id && d.name == device.name)
                {
                    return Err(RepositoryError::UniqueViolation(DEVICE_NAME_KEY.into()));
                }
                let row = strip_device(device);
                state.devices.insert(row.id, row.clone());
                Ok(row)
            })
            .await?
    }

    async fn delete(&self, device: &Device, deadline: Deadline) -> Result<(), RepositoryError> {
        deadline
            .run(async {
                self.pause().await;
                let mut state = self.state.write().await;
                if state.devices.remove(&device.id).is_none() {
                    return Err(RepositoryError::NotFound);
                }
                state.sensors.retain(|_, s| s.device_id != device.id);
                Ok(())
            })
            .await?
    }

    async fn find_by_id(&self, id: Uuid, deadline: Deadline) -> Result<Device, RepositoryError> {
        deadline
            .run(async {
                self.pause().await;
                let state = self.state.read().await;
                state.devices.get(&id).cloned().ok_or(RepositoryError::NotFound)
            })
            .await?
    }

    async fn find_by_id_with_sensors(
        &self,
        id: Uuid,
        deadline: Deadline,
    ) -> Result<Device, RepositoryError> {
        deadline
            .run(async {
                self.pause().await;
                let state = self.state.read().await;
                let mut device = state.devices.get(&id).cloned().ok_or(RepositoryError::NotFound)?;
                let mut sensors: Vec<Sensor> = state
                    .sensors
                    .values()
                    .filter(|s| s.device_id == id)
                    .cloned()
                    .collect();
                sensors.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
                device.sensors = Some(sensors);
                Ok::<_, RepositoryError>(device)
            })
            .await?
    }

    async fn find_all(
        &self,
        pagination: &PaginationRequest,
        deadline: Deadline,
    ) -> Result<Page<Device>, RepositoryError> {
        deadline
            .run(async {
                self.pause().await;
                let state = self.state.read().await;
                let rows: Vec<Device> = state
                    .devices
                    .values()
                    .filter(|d| matches_search(&d.name, &pagination.search))
                    .cloned()
                    .collect();
                Ok(paginate(rows, pagination, compare_devices, |d| d.id))
            })
            .await?
    }

    async fn count_by_name(&self, name: &str, deadline: Deadline) -> Result<i64, RepositoryError> {
        deadline
            .run(async {
                self.pause().await;
                let state = self.state.read().await;
                Ok(state.devices.values().filter(|d| d.name == name).count() as i64)
            })
            .await?
    }
}

#[async_trait]
impl SensorStore for InMemoryStore {
    async fn create(&self, sensor: &Sensor, deadline: Deadline) -> Result<Sensor, RepositoryError> {
        deadline
            .run(async {
                self.pause().await;
                let mut state = self.state.write().await;
                if state.sensors.values().any(|s| s.name == sensor.name) {
                    return Err(RepositoryError::UniqueViolation(SENSOR_NAME_KEY.into()));
                }
                if !state.devices.contains_key(&sensor.device_id) {
                    return Err(foreign_key_violation());
                }
                let row = strip_sensor(sensor);
                state.sensors.insert(row.id, row.clone());
                Ok(row)
            })
            .await?
    }

    async fn update(&self, sensor: &Sensor, deadline: Deadline) -> Result<Sensor, RepositoryError> {
        deadline
            .run(async {
                self.pause().await;
                let mut state = self.state.write().await;
                if !state.sensors.contains_key(&sensor.id) {
                    return Err(RepositoryError::NotFound);
                }
                if state
                    .sensors
                    .values()
                    .any(|s| s.id != sensor.id && s.name == sensor.name)
                {
                    return Err(RepositoryError::UniqueViolation(SENSOR_NAME_KEY.into()));
                }
                if !state.devices.contains_key(&sensor.device_id) {
                    return Err(foreign_key_violation());
                }
                let row = strip_sensor(sensor);
                state.sensors.insert(row.id, row.clone());
                Ok(row)
            })
            .await?
    }

    async fn delete(&self, sensor: &Sensor, deadline: Deadline) -> Result<(), RepositoryError> {
        deadline
            .run(async {
                self.pause().await;
                let mut state = self.state.write().await;
                state
                    .sensors
                    .remove(&sensor.id)
                    .map(|_| ())
                    .ok_or(RepositoryError::NotFound)
            })
            .await?
    }

    async fn find_by_id(&self, id: Uuid, deadline: Deadline) -> Result<Sensor, RepositoryError> {
        deadline
            .run(async {
                self.pause().await;
                let state = self.state.read().await;
                state.sensors.get(&id).cloned().ok_or(RepositoryError::NotFound)
            })
            .await?
    }

    async fn find_by_id_with_device(
        &self,
        id: Uuid,
        deadline: Deadline,
    ) -> Result<Sensor, RepositoryError> {
        deadline
            .run(async {
                self.pause().await;
                let state = self.state.read().await;
                let mut sensor = state.sensors.get(&id).cloned().ok_or(RepositoryError::NotFound)?;
                sensor.device = state.devices.get(&sensor.device_id).cloned().map(Box::new);
                Ok::<_, RepositoryError>(sensor)
            })
            .await?
    }

    async fn find_all(
        &self,
        pagination: &PaginationRequest,
        deadline: Deadline,
    ) -> Result<Page<Sensor>, RepositoryError> {
        deadline
            .run(async {
                self.pause().await;
                let state = self.state.read().await;
                let rows: Vec<Sensor> = state
                    .sensors
                    .values()
                    .filter(|s| matches_search(&s.name, &pagination.search))
                    .cloned()
                    .collect();
                let mut page = paginate(rows, pagination, compare_sensors, |s| s.id);
                for sensor in &mut page.items {
                    sensor.device = state.devices.get(&sensor.device_id).cloned().map(Box::new);
                }
                Ok(page)
            })
            .await?
    }

    async fn count_by_name(&self, name: &str, deadline: Deadline) -> Result<i64, RepositoryError> {
        deadline
            .run(async {
                self.pause().await;
                let state = self.state.read().await;
                Ok(state.sensors.values().filter(|s| s.name == name).count() as i64)
            })
            .await?
    }
}
