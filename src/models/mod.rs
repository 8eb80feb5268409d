//! Data models for Nettigo Air Monitor payloads

use serde::{Deserialize, Serialize};

// ============================================================================
// Sensor data (data.json)
// ============================================================================

/// One entry of `sensordatavalues`
#[derive(Debug, Clone, Deserialize)]
pub struct RawSensorReading {
    pub value_type: String,
    pub value: serde_json::Value,
}

/// Sensor values reported by the device.
///
/// Which fields are set depends on the sensors attached to the device.
/// Pressures are in hPa, PM concentrations in µg/m³.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamSensors {
    pub bme280_humidity: Option<f64>,
    pub bme280_pressure: Option<f64>,
    pub bme280_temperature: Option<f64>,
    pub bmp180_pressure: Option<f64>,
    pub bmp180_temperature: Option<f64>,
    pub bmp280_pressure: Option<f64>,
    pub bmp280_temperature: Option<f64>,
    pub dht22_humidity: Option<f64>,
    pub dht22_temperature: Option<f64>,
    pub ds18b20_temperature: Option<f64>,
    pub heca_humidity: Option<f64>,
    pub heca_temperature: Option<f64>,
    pub mhz14a_carbon_dioxide: Option<f64>,
    pub pms_caqi: Option<u32>,
    pub pms_caqi_level: Option<String>,
    pub pms_p0: Option<f64>,
    pub pms_p1: Option<f64>,
    pub pms_p2: Option<f64>,
    pub sds011_caqi: Option<u32>,
    pub sds011_caqi_level: Option<String>,
    pub sds011_p1: Option<f64>,
    pub sds011_p2: Option<f64>,
    pub sht3x_humidity: Option<f64>,
    pub sht3x_temperature: Option<f64>,
    pub signal: Option<f64>,
    pub sps30_caqi: Option<u32>,
    pub sps30_caqi_level: Option<String>,
    pub sps30_p0: Option<f64>,
    pub sps30_p1: Option<f64>,
    pub sps30_p2: Option<f64>,
    pub sps30_p4: Option<f64>,
    pub uptime: Option<i64>,
}

// ============================================================================
// Device configuration (config.json)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceConfig {
    #[serde(rename = "www_basicauth_enabled", default)]
    pub basic_auth_enabled: bool,
    #[serde(rename = "SOFTWARE_VERSION", default)]
    pub software_version: String,
}
