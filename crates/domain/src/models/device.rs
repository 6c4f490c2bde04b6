//! Device domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::time::format_timestamp;
use shared::validation::validate_not_blank;
use uuid::Uuid;
use validator::Validate;

use super::sensor::{Sensor, SensorResponse};

/// Status given to a device created without one.
pub const DEFAULT_DEVICE_STATUS: &str = "active";

/// Columns a device listing may be ordered by.
pub const DEVICE_SORTABLE_COLUMNS: &[&str] =
    &["id", "name", "location", "status", "created_at", "updated_at"];

/// A registered IoT device.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Attached sensors. `None` unless eagerly loaded.
    pub sensors: Option<Vec<Sensor>>,
}

/// Request payload for device creation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateDeviceRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 100, message = "must be a maximum of 100 characters in length"))]
    pub name: String,

    #[validate(length(max = 150, message = "must be a maximum of 150 characters in length"))]
    pub location: Option<String>,

    #[validate(length(max = 50, message = "must be a maximum of 50 characters in length"))]
    pub status: Option<String>,
}

/// Patch payload for device updates. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDeviceRequest {
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 100, message = "must be a maximum of 100 characters in length"))]
    pub name: Option<String>,

    #[validate(length(max = 150, message = "must be a maximum of 150 characters in length"))]
    pub location: Option<String>,

    /// Blank is rejected here; create falls back to the default instead.
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 50, message = "must be a maximum of 50 characters in length"))]
    pub status: Option<String>,
}

/// Device as rendered on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensors: Option<Vec<SensorResponse>>,
    pub created_at: String,
    pub updated_at: String,
}

impl CreateDeviceRequest {
    /// Builds a new device with a fresh id, stamped at `now`.
    pub fn to_device(&self, now: DateTime<Utc>) -> Device {
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_DEVICE_STATUS);

        Device {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            location: self.location.clone(),
            status: status.to_string(),
            created_at: now,
            updated_at: now,
            sensors: None,
        }
    }
}

impl UpdateDeviceRequest {
    /// Overwrites the fields present in the patch.
    pub fn apply_to(&self, device: &mut Device) {
        if let Some(name) = &self.name {
            device.name = name.clone();
        }
        if let Some(location) = &self.location {
            device.location = Some(location.clone());
        }
        if let Some(status) = &self.status {
            device.status = status.clone();
        }
    }
}

impl From<&Device> for DeviceResponse {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id.to_string(),
            name: device.name.clone(),
            location: device.location.clone(),
            status: device.status.clone(),
            sensors: device
                .sensors
                .as_ref()
                .map(|sensors| sensors.iter().map(SensorResponse::from).collect()),
            created_at: format_timestamp(&device.created_at),
            updated_at: format_timestamp(&device.updated_at),
        }
    }
}
