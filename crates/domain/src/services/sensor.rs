//! Sensor use cases.

use chrono::Utc;
use shared::pagination::{PaginationRequest, PaginationResponse};
use shared::validation::join_messages;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{map_repository_error, name_taken, parse_id};
use crate::deadline::{Deadline, DEFAULT_OPERATION_TIMEOUT};
use crate::error::DomainError;
use crate::models::{
    CreateSensorRequest, SensorResponse, UpdateSensorRequest, SENSOR_SORTABLE_COLUMNS,
};
use crate::ports::SensorStore;

const ENTITY: &str = "sensor";

/// Create, list, fetch, patch and delete sensors.
#[derive(Clone)]
pub struct SensorService {
    store: Arc<dyn SensorStore>,
    timeout: Duration,
}

impl SensorService {
    pub fn new(store: Arc<dyn SensorStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn deadline(&self) -> Deadline {
        Deadline::after(self.timeout)
    }

    /// Validates and stores a new sensor.
    ///
    /// The referenced device is not looked up first. A dangling `device_id`
    /// is rejected by the foreign key and reported as Internal.
    pub async fn create(&self, request: &CreateSensorRequest) -> Result<SensorResponse, DomainError> {
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

        let device_id = Uuid::parse_str(request.device_id.trim())
            .map_err(|_| DomainError::Validation("device_id must be a valid UUID".into()))?;

        let sensor = request.to_sensor(device_id, Utc::now());
        let created = self
            .store
            .create(&sensor, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "create", e))?;

        info!(
            sensor_id = %created.id,
            device_id = %created.device_id,
            name = %created.name,
            "Created sensor"
        );

        Ok(SensorResponse::from(&created))
    }

    /// Lists one page of sensors, each carrying its device name.
    pub async fn find_all(
        &self,
        pagination: &PaginationRequest,
    ) -> Result<(Vec<SensorResponse>, PaginationResponse), DomainError> {
        let deadline = self.deadline();

        pagination
            .ensure_sortable(SENSOR_SORTABLE_COLUMNS)
            .map_err(|e| DomainError::Validation(e.to_string()))?;

        let page = self
            .store
            .find_all(pagination, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "list", e))?;

        let sensors = page.items.iter().map(SensorResponse::from).collect();
        Ok((sensors, pagination.to_response(page.total)))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<SensorResponse, DomainError> {
        let deadline = self.deadline();
        let id = parse_id(ENTITY, id)?;

        let sensor = self
            .store
            .find_by_id_with_device(id, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "find", e))?;

        Ok(SensorResponse::from(&sensor))
    }

    /// Applies a patch to an existing sensor. `device_id` cannot be changed.
    pub async fn update(
        &self,
        id: &str,
        request: &UpdateSensorRequest,
    ) -> Result<SensorResponse, DomainError> {
        let deadline = self.deadline();
        let id = parse_id(ENTITY, id)?;

        let mut sensor = self
            .store
            .find_by_id_with_device(id, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "find", e))?;

        request
            .validate()
            .map_err(|e| DomainError::Validation(join_messages(&e)))?;

        request.apply_to(&mut sensor);
        sensor.updated_at = Utc::now();

        let mut updated = self
            .store
            .update(&sensor, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "update", e))?;
        if updated.device.is_none() {
            updated.device = sensor.device.take();
        }

        info!(sensor_id = %updated.id, "Updated sensor");

        Ok(SensorResponse::from(&updated))
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let deadline = self.deadline();
        let id = parse_id(ENTITY, id)?;

        let sensor = self
            .store
            .find_by_id(id, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "find", e))?;

        self.store
            .delete(&sensor, deadline)
            .await
            .map_err(|e| map_repository_error(ENTITY, "delete", e))?;

        info!(sensor_id = %sensor.id, "Deleted sensor");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::models::{CreateDeviceRequest, UpdateDeviceRequest};
    use crate::services::DeviceService;

    struct Fixture {
        devices: DeviceService,
        sensors: SensorService,
        store: Arc<InMemoryStore>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        Fixture {
            devices: DeviceService::new(store.clone()),
            sensors: SensorService::new(store.clone()),
            store,
        }
    }

    async fn create_device(fixture: &Fixture, name: &str) -> String {
        fixture
            .devices
            .create(&CreateDeviceRequest {
                name: name.to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    fn sensor_request(device_id: &str, name: &str) -> CreateSensorRequest {
        CreateSensorRequest {
            device_id: device_id.to_string(),
            name: name.to_string(),
            sensor_type: "temperature".to_string(),
            unit: Some("C".to_string()),
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_create_sensor_and_fetch_with_device_name() {
        let fixture = fixture();
        let device_id = create_device(&fixture, "gateway").await;

        let created = fixture
            .sensors
            .create(&sensor_request(&device_id, "thermo-1"))
            .await
            .unwrap();
        assert!(created.is_active);
        assert_eq!(created.device_id, device_id);

        let found = fixture.sensors.find_by_id(&created.id).await.unwrap();
        assert_eq!(found.device_name.as_deref(), Some("gateway"));
        assert_eq!(found.sensor_type, "temperature");
    }

    #[tokio::test]
    async fn test_create_sensor_duplicate_name_conflicts() {
        let fixture = fixture();
        let device_id = create_device(&fixture, "gateway").await;
        fixture
            .sensors
            .create(&sensor_request(&device_id, "thermo-1"))
            .await
            .unwrap();

        let err = fixture
            .sensors
            .create(&sensor_request(&device_id, "thermo-1"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Conflict("sensor name already exist".into()));
    }

    #[tokio::test]
    async fn test_create_sensor_malformed_device_id() {
        let fixture = fixture();
        let err = fixture
            .sensors
            .create(&sensor_request("12345", "thermo-1"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation("device_id must be a valid UUID".into())
        );
    }

    #[tokio::test]
    async fn test_create_sensor_dangling_device_is_internal() {
        let fixture = fixture();
        let err = fixture
            .sensors
            .create(&sensor_request(&Uuid::new_v4().to_string(), "thermo-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
        assert_eq!(fixture.store.sensor_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_sensor_deactivates_and_keeps_device() {
        let fixture = fixture();
        let device_id = create_device(&fixture, "gateway").await;
        let created = fixture
            .sensors
            .create(&sensor_request(&device_id, "thermo-1"))
            .await
            .unwrap();

        let patch = UpdateSensorRequest {
            is_active: Some(false),
            ..Default::default()
        };
        let updated = fixture.sensors.update(&created.id, &patch).await.unwrap();

        assert!(!updated.is_active);
        assert_eq!(updated.device_id, device_id);
        assert_eq!(updated.device_name.as_deref(), Some("gateway"));
        assert_eq!(updated.unit.as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn test_update_unknown_sensor() {
        let fixture = fixture();
        let device_id = create_device(&fixture, "gateway").await;
        let created = fixture
            .sensors
            .create(&sensor_request(&device_id, "thermo-1"))
            .await
            .unwrap();

        let patch = UpdateSensorRequest {
            name: Some("renamed".to_string()),
            ..Default::default()
        };
        let err = fixture
            .sensors
            .update(&Uuid::new_v4().to_string(), &patch)
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::NotFound("sensor not found".into()));
        assert_eq!(fixture.store.sensor_count().await, 1);
        let unchanged = fixture.sensors.find_by_id(&created.id).await.unwrap();
        assert_eq!(unchanged.name, "thermo-1");
    }

    #[tokio::test]
    async fn test_delete_unknown_sensor_leaves_storage_untouched() {
        let fixture = fixture();
        let device_id = create_device(&fixture, "gateway").await;
        fixture
            .sensors
            .create(&sensor_request(&device_id, "thermo-1"))
            .await
            .unwrap();

        let err = fixture
            .sensors
            .delete(&Uuid::new_v4().to_string())
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::NotFound("sensor not found".into()));
        assert_eq!(fixture.store.sensor_count().await, 1);
        assert_eq!(fixture.store.device_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_sensor_keeps_device() {
        let fixture = fixture();
        let device_id = create_device(&fixture, "gateway").await;
        let created = fixture
            .sensors
            .create(&sensor_request(&device_id, "thermo-1"))
            .await
            .unwrap();

        fixture.sensors.delete(&created.id).await.unwrap();

        assert!(matches!(
            fixture.sensors.find_by_id(&created.id).await,
            Err(DomainError::NotFound(_))
        ));
        let device = fixture.devices.find_by_id(&device_id).await.unwrap();
        assert_eq!(device.sensors, Some(vec![]));
    }

    #[tokio::test]
    async fn test_deleting_device_cascades_to_sensors() {
        let fixture = fixture();
        let device_id = create_device(&fixture, "gateway").await;
        let a = fixture
            .sensors
            .create(&sensor_request(&device_id, "thermo-1"))
            .await
            .unwrap();
        let b = fixture
            .sensors
            .create(&sensor_request(&device_id, "thermo-2"))
            .await
            .unwrap();

        let device = fixture.devices.find_by_id(&device_id).await.unwrap();
        assert_eq!(device.sensors.map(|s| s.len()), Some(2));

        fixture.devices.delete(&device_id).await.unwrap();

        for id in [a.id, b.id] {
            assert!(matches!(
                fixture.sensors.find_by_id(&id).await,
                Err(DomainError::NotFound(_))
            ));
        }
        assert_eq!(fixture.store.sensor_count().await, 0);
    }

    #[tokio::test]
    async fn test_sensor_reflects_renamed_device() {
        let fixture = fixture();
        let device_id = create_device(&fixture, "gateway").await;
        let created = fixture
            .sensors
            .create(&sensor_request(&device_id, "thermo-1"))
            .await
            .unwrap();

        fixture
            .devices
            .update(
                &device_id,
                &UpdateDeviceRequest {
                    name: Some("gateway-renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let found = fixture.sensors.find_by_id(&created.id).await.unwrap();
        assert_eq!(found.device_name.as_deref(), Some("gateway-renamed"));
    }

    #[tokio::test]
    async fn test_find_all_sensors_loads_devices() {
        let fixture = fixture();
        let first = create_device(&fixture, "gateway-a").await;
        let second = create_device(&fixture, "gateway-b").await;
        for (device_id, name) in [(&first, "s-1"), (&second, "s-2"), (&first, "s-3")] {
            fixture
                .sensors
                .create(&sensor_request(device_id, name))
                .await
                .unwrap();
        }

        let pagination =
            PaginationRequest::from_query(None, None, Some("name"), Some("asc"), None, 100)
                .unwrap();
        let (sensors, meta) = fixture.sensors.find_all(&pagination).await.unwrap();

        assert_eq!(meta.total_data, 3);
        assert_eq!(meta.total_page, 1);
        let names: Vec<_> = sensors
            .iter()
            .map(|s| (s.name.as_str(), s.device_name.as_deref()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("s-1", Some("gateway-a")),
                ("s-2", Some("gateway-b")),
                ("s-3", Some("gateway-a")),
            ]
        );
    }

    #[tokio::test]
    async fn test_find_all_sensors_accepts_type_column() {
        let fixture = fixture();
        let pagination =
            PaginationRequest::from_query(None, None, Some("type"), None, None, 100).unwrap();
        let (sensors, meta) = fixture.sensors.find_all(&pagination).await.unwrap();
        assert!(sensors.is_empty());
        assert_eq!(meta.total_page, 0);
    }
}
