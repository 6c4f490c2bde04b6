//! Device entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Device;
use sqlx::query_builder::Separated;
use sqlx::{FromRow, Postgres};
use uuid::Uuid;

use crate::repositories::generic::{push_assignment, Entity};

/// Database row mapping for the devices table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for DeviceEntity {
    const TABLE: &'static str = "devices";
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "location", "status", "created_at", "updated_at"];
    const SEARCH_COLUMN: &'static str = "name";
    const SORTABLE_COLUMNS: &'static [&'static str] = domain::models::DEVICE_SORTABLE_COLUMNS;

    fn id(&self) -> Uuid {
        self.id
    }

    fn push_values<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.name.clone())
            .push_bind(self.location.clone())
            .push_bind(self.status.clone())
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }

    fn push_assignments<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        push_assignment(row, "name", self.name.clone());
        push_assignment(row, "location", self.location.clone());
        push_assignment(row, "status", self.status.clone());
        push_assignment(row, "updated_at", self.updated_at);
    }
}

impl From<DeviceEntity> for Device {
    fn from(entity: DeviceEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            location: entity.location,
            status: entity.status,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            sensors: None,
        }
    }
}

impl From<&Device> for DeviceEntity {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id,
            name: device.name.clone(),
            location: device.location.clone(),
            status: device.status.clone(),
            created_at: device.created_at,
            updated_at: device.updated_at,
        }
    }
}
