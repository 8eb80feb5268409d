//! nettigo-air-monitor - Nettigo Air Monitor client
//!
//! Async client for Nettigo Air Monitor air quality stations. Reads
//! sensor values over the device's HTTP API, normalizes them and derives
//! the Common Air Quality Index for particulate matter sensors.

pub mod caqi;
pub mod config;
pub mod device;
pub mod error;
pub mod models;

pub use config::ConnectionOptions;
pub use device::NettigoAirMonitor;
pub use error::{NamError, Result};
pub use models::NamSensors;
