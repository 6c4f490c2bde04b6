use axum::{
    middleware,
    routing::get,
    Router,
};
use domain::services::{DeviceService, SensorService};
use persistence::repositories::{DeviceRepository, SensorRepository};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::trace_id;
use crate::routes::{devices, health, sensors};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub devices: DeviceService,
    pub sensors: SensorService,
}

impl AppState {
    /// Wires the PostgreSQL repositories into the use-case services.
    pub fn new(config: Config, pool: PgPool) -> Self {
        let timeout = config.operation_timeout();
        let devices =
            DeviceService::new(Arc::new(DeviceRepository::new(pool.clone()))).with_timeout(timeout);
        let sensors =
            SensorService::new(Arc::new(SensorRepository::new(pool.clone()))).with_timeout(timeout);

        Self {
            pool,
            config: Arc::new(config),
            devices,
            sensors,
        }
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    router(AppState::new(config, pool))
}

/// Builds the router around an already wired state.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| match o.parse::<axum::http::HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api_routes = Router::new()
        .route(
            "/api/v1/devices",
            get(devices::list_devices).post(devices::create_device),
        )
        .route(
            "/api/v1/devices/:id",
            get(devices::get_device)
                .put(devices::update_device)
                .delete(devices::delete_device),
        )
        .route(
            "/api/v1/sensors",
            get(sensors::list_sensors).post(sensors::create_sensor),
        )
        .route(
            "/api/v1/sensors/:id",
            get(sensors::get_sensor)
                .put(sensors::update_sensor)
                .delete(sensors::delete_sensor),
        );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
