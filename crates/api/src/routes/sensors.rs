//! Sensor endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use domain::models::{CreateSensorRequest, SensorResponse, UpdateSensorRequest};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, Pagination};
use crate::response::ApiSuccess;

/// POST /api/v1/sensors
pub async fn create_sensor(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateSensorRequest>,
) -> Result<ApiSuccess<SensorResponse>, ApiError> {
    let sensor = state.sensors.create(&request).await?;
    Ok(ApiSuccess::with_data(
        StatusCode::CREATED,
        "sensor created successfully",
        sensor,
    ))
}

/// GET /api/v1/sensors
pub async fn list_sensors(
    State(state): State<AppState>,
    Pagination(pagination): Pagination,
) -> Result<ApiSuccess<Vec<SensorResponse>>, ApiError> {
    let (sensors, meta) = state.sensors.find_all(&pagination).await?;
    Ok(ApiSuccess::with_pagination(
        StatusCode::OK,
        "get list sensor successfully",
        sensors,
        meta,
    ))
}

/// GET /api/v1/sensors/:id
pub async fn get_sensor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<SensorResponse>, ApiError> {
    let sensor = state.sensors.find_by_id(&id).await?;
    Ok(ApiSuccess::with_data(
        StatusCode::OK,
        "get detail sensor successfully",
        sensor,
    ))
}

/// PUT /api/v1/sensors/:id
pub async fn update_sensor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateSensorRequest>,
) -> Result<ApiSuccess<SensorResponse>, ApiError> {
    let sensor = state.sensors.update(&id, &request).await?;
    Ok(ApiSuccess::with_data(
        StatusCode::OK,
        "update sensor successfully",
        sensor,
    ))
}

/// DELETE /api/v1/sensors/:id
pub async fn delete_sensor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    state.sensors.delete(&id).await?;
    Ok(ApiSuccess::message(
        StatusCode::OK,
        "delete sensor successfully",
    ))
}
