//! Domain models for the IoT registry.

pub mod device;
pub mod sensor;

pub use device::{
    CreateDeviceRequest, Device, DeviceResponse, UpdateDeviceRequest, DEFAULT_DEVICE_STATUS,
    DEVICE_SORTABLE_COLUMNS,
};
pub use sensor::{
    CreateSensorRequest, Sensor, SensorResponse, UpdateSensorRequest, SENSOR_SORTABLE_COLUMNS,
};
