//! Sensor domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::time::format_timestamp;
use shared::validation::{validate_not_blank, validate_uuid};
use uuid::Uuid;
use validator::Validate;

use super::device::Device;

/// Columns a sensor listing may be ordered by.
pub const SENSOR_SORTABLE_COLUMNS: &[&str] = &[
    "id",
    "device_id",
    "name",
    "type",
    "unit",
    "is_active",
    "created_at",
    "updated_at",
];

/// A sensor attached to a device.
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    pub id: Uuid,
    pub device_id: Uuid,
    pub name: String,
    pub sensor_type: String,
    pub unit: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Owning device. `None` unless eagerly loaded.
    pub device: Option<Box<Device>>,
}

/// Request payload for sensor creation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateSensorRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_uuid"))]
    pub device_id: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 100, message = "must be a maximum of 100 characters in length"))]
    pub name: String,

    #[serde(rename = "type", default)]
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 50, message = "must be a maximum of 50 characters in length"))]
    pub sensor_type: String,

    #[validate(length(max = 20, message = "must be a maximum of 20 characters in length"))]
    pub unit: Option<String>,

    pub is_active: Option<bool>,
}

/// Patch payload for sensor updates. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSensorRequest {
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 100, message = "must be a maximum of 100 characters in length"))]
    pub name: Option<String>,

    #[serde(rename = "type")]
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 50, message = "must be a maximum of 50 characters in length"))]
    pub sensor_type: Option<String>,

    #[validate(length(max = 20, message = "must be a maximum of 20 characters in length"))]
    pub unit: Option<String>,

    pub is_active: Option<bool>,
}

/// Sensor as rendered on the wire, with the parent device name inlined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorResponse {
    pub id: String,
    pub device_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub sensor_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl CreateSensorRequest {
    /// Builds a new sensor owned by `device_id`, stamped at `now`.
    pub fn to_sensor(&self, device_id: Uuid, now: DateTime<Utc>) -> Sensor {
        Sensor {
            id: Uuid::new_v4(),
            device_id,
            name: self.name.clone(),
            sensor_type: self.sensor_type.clone(),
            unit: self.unit.clone(),
            is_active: self.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
            device: None,
        }
    }
}

impl UpdateSensorRequest {
    /// Overwrites the fields present in the patch.
    pub fn apply_to(&self, sensor: &mut Sensor) {
        if let Some(name) = &self.name {
            sensor.name = name.clone();
        }
        if let Some(sensor_type) = &self.sensor_type {
            sensor.sensor_type = sensor_type.clone();
        }
        if let Some(unit) = &self.unit {
            sensor.unit = Some(unit.clone());
        }
        if let Some(is_active) = self.is_active {
            sensor.is_active = is_active;
        }
    }
}

impl From<&Sensor> for SensorResponse {
    fn from(sensor: &Sensor) -> Self {
        Self {
            id: sensor.id.to_string(),
            device_id: sensor.device_id.to_string(),
            device_name: sensor.device.as_ref().map(|d| d.name.clone()),
            name: sensor.name.clone(),
            sensor_type: sensor.sensor_type.clone(),
            unit: sensor.unit.clone(),
            is_active: sensor.is_active,
            created_at: format_timestamp(&sensor.created_at),
            updated_at: format_timestamp(&sensor.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_sensor() -> Sensor {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        Sensor {
            id: Uuid::new_v4(),
            device_id: Uuid::new_v4(),
            name: "Soil Moisture 1".to_string(),
            sensor_type: "moisture".to_string(),
            unit: Some("%".to_string()),
            is_active: true,
            created_at: ts,
            updated_at: ts,
            device: None,
        }
    }

    #[test]
    fn test_create_request_deserialization() {
        let json = r#"{
            "device_id": "550e8400-e29b-41d4-a716-446655440000",
            "name": "Thermo",
            "type": "temperature",
            "unit": "C"
        }"#;
        let request: CreateSensorRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.sensor_type, "temperature");
        assert!(request.is_active.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_defaults_active() {
        let request = CreateSensorRequest {
            device_id: Uuid::new_v4().to_string(),
            name: "Thermo".to_string(),
            sensor_type: "temperature".to_string(),
            ..Default::default()
        };
        let sensor = request.to_sensor(Uuid::new_v4(), Utc::now());
        assert!(sensor.is_active);

        let request = CreateSensorRequest {
            is_active: Some(false),
            ..request
        };
        assert!(!request.to_sensor(Uuid::new_v4(), Utc::now()).is_active);
    }

    #[test]
    fn test_create_request_malformed_device_id() {
        let request = CreateSensorRequest {
            device_id: "not-a-uuid".to_string(),
            name: "Thermo".to_string(),
            sensor_type: "temperature".to_string(),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("device_id"));
    }

    #[test]
    fn test_create_request_reports_every_missing_field() {
        let request: CreateSensorRequest = serde_json::from_str("{}").unwrap();
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 3);
    }

    #[test]
    fn test_apply_patch() {
        let mut sensor = create_test_sensor();
        let patch: UpdateSensorRequest =
            serde_json::from_str(r#"{"is_active": false, "type": "humidity"}"#).unwrap();
        patch.apply_to(&mut sensor);

        assert!(!sensor.is_active);
        assert_eq!(sensor.sensor_type, "humidity");
        assert_eq!(sensor.name, "Soil Moisture 1");
        assert_eq!(sensor.unit.as_deref(), Some("%"));
    }

    #[test]
    fn test_update_request_rejects_long_unit() {
        let patch = UpdateSensorRequest {
            unit: Some("u".repeat(21)),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_sensor_to_response_denormalizes_device_name() {
        let mut sensor = create_test_sensor();
        let response = SensorResponse::from(&sensor);
        assert!(response.device_name.is_none());

        sensor.device = Some(Box::new(Device {
            id: sensor.device_id,
            name: "Greenhouse Gateway".to_string(),
            location: None,
            status: "active".to_string(),
            created_at: sensor.created_at,
            updated_at: sensor.updated_at,
            sensors: None,
        }));
        let json = serde_json::to_value(SensorResponse::from(&sensor)).unwrap();
        assert_eq!(json["device_name"], "Greenhouse Gateway");
        assert_eq!(json["type"], "moisture");
        assert_eq!(json["device_id"], sensor.device_id.to_string());
        assert_eq!(json["updated_at"], "2024-03-01 08:30:00");
    }
}
