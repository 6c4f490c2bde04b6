//! Database entity definitions.
//!
//! Entities are direct mappings to database rows. Each one also describes
//! its table to the generic repository.

pub mod device;
pub mod sensor;

pub use device::DeviceEntity;
pub use sensor::SensorEntity;
