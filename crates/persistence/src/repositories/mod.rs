//! Repository implementations for database operations.

pub mod device;
pub mod generic;
pub mod sensor;

pub use device::DeviceRepository;
pub use generic::{Entity, Repository};
pub use sensor::SensorRepository;
