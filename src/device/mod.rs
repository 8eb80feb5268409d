//! Nettigo Air Monitor device integration
//!
//! - `client`: HTTP client, stale-data fallback, CAQI derivation
//! - `endpoints`: device URLs and methods
//! - `parser`: `sensordatavalues` normalization

pub mod client;
pub mod endpoints;
pub mod parser;


pub use client::{NettigoAirMonitor, RESPONSES_FROM_CACHE};
pub use endpoints::Endpoint;
pub use parser::SensorMap;
