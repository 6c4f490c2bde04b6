//! Device endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use domain::models::{CreateDeviceRequest, DeviceResponse, UpdateDeviceRequest};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, Pagination};
use crate::response::ApiSuccess;

/// Create a device.
///
/// POST /api/v1/devices
pub async fn create_device(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateDeviceRequest>,
) -> Result<ApiSuccess<DeviceResponse>, ApiError> {
    let device = state.devices.create(&request).await?;
    Ok(ApiSuccess::with_data(
        StatusCode::CREATED,
        "device created successfully",
        device,
    ))
}

/// List devices.
///
/// GET /api/v1/devices?page=&limit=&order_by=&sort_by=&search=
pub async fn list_devices(
    State(state): State<AppState>,
    Pagination(pagination): Pagination,
) -> Result<ApiSuccess<Vec<DeviceResponse>>, ApiError> {
    let (devices, meta) = state.devices.find_all(&pagination).await?;
    Ok(ApiSuccess::with_pagination(
        StatusCode::OK,
        "get list device successfully",
        devices,
        meta,
    ))
}

/// Get one device with its sensors.
///
/// GET /api/v1/devices/:id
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<DeviceResponse>, ApiError> {
    let device = state.devices.find_by_id(&id).await?;
    Ok(ApiSuccess::with_data(
        StatusCode::OK,
        "get detail device successfully",
        device,
    ))
}

/// Patch a device.
///
/// PUT /api/v1/devices/:id
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateDeviceRequest>,
) -> Result<ApiSuccess<DeviceResponse>, ApiError> {
    let device = state.devices.update(&id, &request).await?;
    Ok(ApiSuccess::with_data(
        StatusCode::OK,
        "update device successfully",
        device,
    ))
}

/// Delete a device and its sensors.
///
/// DELETE /api/v1/devices/:id
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    state.devices.delete(&id).await?;
    Ok(ApiSuccess::message(
        StatusCode::OK,
        "delete device successfully",
    ))
}
