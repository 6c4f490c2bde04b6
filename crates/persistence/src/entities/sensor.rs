//! Sensor entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Sensor;
use sqlx::query_builder::Separated;
use sqlx::{FromRow, Postgres};
use uuid::Uuid;

use crate::repositories::generic::{push_assignment, Entity};

/// Database row mapping for the sensors table.
#[derive(Debug, Clone, FromRow)]
pub struct SensorEntity {
    pub id: Uuid,
    pub device_id: Uuid,
    pub name: String,
    #[sqlx(rename = "type")]
    pub sensor_type: String,
    pub unit: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for SensorEntity {
    const TABLE: &'static str = "sensors";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "device_id",
        "name",
        "type",
        "unit",
        "is_active",
        "created_at",
        "updated_at",
    ];
    const SEARCH_COLUMN: &'static str = "name";
    const SORTABLE_COLUMNS: &'static [&'static str] = domain::models::SENSOR_SORTABLE_COLUMNS;

    fn id(&self) -> Uuid {
        self.id
    }

    fn push_values<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.device_id)
            .push_bind(self.name.clone())
            .push_bind(self.sensor_type.clone())
            .push_bind(self.unit.clone())
            .push_bind(self.is_active)
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }

    fn push_assignments<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        push_assignment(row, "device_id", self.device_id);
        push_assignment(row, "name", self.name.clone());
        push_assignment(row, "type", self.sensor_type.clone());
        push_assignment(row, "unit", self.unit.clone());
        push_assignment(row, "is_active", self.is_active);
        push_assignment(row, "updated_at", self.updated_at);
    }
}

impl From<SensorEntity> for Sensor {
    fn from(entity: SensorEntity) -> Self {
        Self {
            id: entity.id,
            device_id: entity.device_id,
            name: entity.name,
            sensor_type: entity.sensor_type,
            unit: entity.unit,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            device: None,
        }
    }
}

impl From<&Sensor> for SensorEntity {
    fn from(sensor: &Sensor) -> Self {
        Self {
            id: sensor.id,
            device_id: sensor.device_id,
            name: sensor.name.clone(),
            sensor_type: sensor.sensor_type.clone(),
            unit: sensor.unit.clone(),
            is_active: sensor.is_active,
            created_at: sensor.created_at,
            updated_at: sensor.updated_at,
        }
    }
}
