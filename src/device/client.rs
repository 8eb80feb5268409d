//! Nettigo Air Monitor HTTP client

use regex::Regex;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use super::endpoints::Endpoint;
use super::parser;
use crate::config::ConnectionOptions;
use crate::error::{NamError, Result};
use crate::models::{DeviceConfig, NamSensors};

/// Consecutive failed updates that may still be answered from the last payload.
/// The check is `errors <= RESPONSES_FROM_CACHE`, so up to four in a row.
pub const RESPONSES_FROM_CACHE: u32 = 3;

const MAC_PATTERN: &str = r"([0-9a-fA-F]{2}[:]){5}([0-9a-fA-F]{2})";

const ATTR_SENSOR_VALUES: &str = "sensordatavalues";
const ATTR_SOFTWARE_VERSION: &str = "software_version";
const ATTR_UPTIME: &str = "uptime";

/// Client for a single Nettigo Air Monitor device
#[derive(Debug)]
pub struct NettigoAirMonitor {
    host: String,
    options: ConnectionOptions,
    http_client: Client,
    last_data: Option<Value>,
    update_errors: u32,
    software_version: Option<String>,
    auth_enabled: bool,
    mac_pattern: Regex,
}

impl NettigoAirMonitor {
    /// Create a client and run the initial config round-trip
    pub async fn create(http_client: Client, options: ConnectionOptions) -> Result<Self> {
        let mut instance = Self {
            host: options.host.clone(),
            options,
            http_client,
            last_data: None,
            update_errors: 0,
            software_version: None,
            auth_enabled: false,
            mac_pattern: Regex::new(MAC_PATTERN).expect("Failed to compile MAC pattern"),
        };
        instance.initialize().await?;
        Ok(instance)
    }

    /// Detect basic auth and software version from config.json
    pub async fn initialize(&mut self) -> Result<()> {
        tracing::debug!("[NAM] Initializing device {}", self.host);

        match self.async_check_credentials().await {
            Err(NamError::AuthFailed(_)) => {
                self.auth_enabled = true;
            }
            Err(e) => return Err(e),
            Ok(config) => {
                let config: DeviceConfig = serde_json::from_value(config).map_err(|e| {
                    NamError::api(format!("Invalid config from device {}: {}", self.host, e))
                })?;
                self.auth_enabled = config.basic_auth_enabled;
                self.software_version = Some(config.software_version);
            }
        }

        Ok(())
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Firmware version, unknown until config.json or data.json has been read
    pub fn software_version(&self) -> Option<&str> {
        self.software_version.as_deref()
    }

    /// True if the device has basic auth enabled
    pub fn auth_enabled(&self) -> bool {
        self.auth_enabled
    }

    /// Consecutive updates answered from the cached payload
    pub fn update_errors(&self) -> u32 {
        self.update_errors
    }

    fn classify_error(&self, error: reqwest::Error) -> NamError {
        if error.is_connect() || error.is_timeout() {
            tracing::info!("[NAM] Invalid response from device: {}", self.host);
            return NamError::NotResponding(format!("The device {} is not responding", self.host));
        }

        match error.status() {
            Some(StatusCode::UNAUTHORIZED) => {
                NamError::AuthFailed("Authorization has failed".to_string())
            }
            Some(status) => NamError::Api {
                status: Some(status.as_u16()),
                message: format!("Invalid response from device {}: {}", self.host, status.as_u16()),
            },
            None => NamError::api(format!("Invalid response from device {}: {}", self.host, error)),
        }
    }

    /// Send one request and read the body.
    ///
    /// Anything but 200 is an error; 401 maps to `AuthFailed`, connect
    /// failures and timeouts map to `NotResponding`.
    async fn http_request(&self, method: Method, url: &str) -> Result<String> {
        tracing::debug!("[NAM] Requesting {}, method: {}", url, method);

        let mut request = self
            .http_client
            .request(method, url)
            .timeout(self.options.timeout);
        if let Some((username, password)) = self.options.auth() {
            request = request.basic_auth(username, Some(password));
        }

        let resp = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.classify_error(e))?;

        let status = resp.status();
        tracing::debug!("[NAM] Data retrieved from {}, status: {}", self.host, status.as_u16());
        if status != StatusCode::OK {
            return Err(NamError::Api {
                status: Some(status.as_u16()),
                message: format!("Invalid response from device {}: {}", self.host, status.as_u16()),
            });
        }

        resp.text().await.map_err(|e| self.classify_error(e))
    }

    async fn request_endpoint(&self, endpoint: Endpoint) -> Result<String> {
        let url = endpoint.url(&self.host);
        self.http_request(endpoint.method(), &url).await
    }

    fn has_cached_data(&self) -> bool {
        matches!(&self.last_data, Some(Value::Object(map)) if !map.is_empty())
    }

    /// Fetch and parse the current sensor values.
    ///
    /// While the device is not responding, the last good payload is reused
    /// for a few consecutive calls before the failure is reported.
    pub async fn async_update(&mut self) -> Result<NamSensors> {
        let data = match self.request_endpoint(Endpoint::Data).await {
            Ok(body) => {
                let data: Value = serde_json::from_str(&body).map_err(|e| {
                    NamError::InvalidSensorData(format!("Invalid sensor data: {}", e))
                })?;
                self.last_data = Some(data.clone());
                self.update_errors = 0;
                data
            }
            Err(NamError::NotResponding(message)) => {
                if self.update_errors > RESPONSES_FROM_CACHE || !self.has_cached_data() {
                    return Err(NamError::api(message));
                }
                tracing::info!(
                    "[NAM] Using the cached data because the device {} is not responding",
                    self.host
                );
                self.update_errors += 1;
                self.last_data.clone().unwrap_or_default()
            }
            Err(e) => return Err(e),
        };

        if let Some(version) = data.get(ATTR_SOFTWARE_VERSION).and_then(Value::as_str) {
            self.software_version = Some(version.to_string());
        }

        let values = data
            .get(ATTR_SENSOR_VALUES)
            .ok_or_else(|| NamError::InvalidSensorData("Invalid sensor data".to_string()))?;
        let sensors = parser::parse_sensor_data(values)?;

        let mut result: serde_json::Map<String, Value> = sensors
            .iter()
            .map(|(key, value)| (key.clone(), Value::from(*value)))
            .collect();

        if let Some(uptime) = data.get(ATTR_UPTIME) {
            result.insert(ATTR_UPTIME.to_string(), Value::from(parser::parse_uptime(uptime)?));
        }

        parser::add_caqi_fields(&sensors, &mut result);

        serde_json::from_value(Value::Object(result))
            .map_err(|e| NamError::InvalidSensorData(format!("Invalid sensor data: {}", e)))
    }

    /// Read the device MAC address from the values page
    pub async fn async_get_mac_address(&self) -> Result<String> {
        let body = self
            .request_endpoint(Endpoint::Values)
            .await
            .map_err(NamError::into_api)?;

        self.mac_pattern
            .find(&body)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| NamError::CannotGetMac("Cannot get MAC address from device".to_string()))
    }

    /// Fetch config.json; fails with `AuthFailed` when credentials are wrong
    pub async fn async_check_credentials(&self) -> Result<Value> {
        let body = self
            .request_endpoint(Endpoint::Config)
            .await
            .map_err(NamError::into_api)?;

        serde_json::from_str(&body)
            .map_err(|e| NamError::api(format!("Invalid config from device {}: {}", self.host, e)))
    }

    pub async fn async_restart(&self) -> Result<()> {
        self.request_endpoint(Endpoint::Restart)
            .await
            .map_err(NamError::into_api)?;
        Ok(())
    }

    /// Trigger a firmware update over the air
    pub async fn async_ota_update(&self) -> Result<()> {
        self.request_endpoint(Endpoint::Ota)
            .await
            .map_err(NamError::into_api)?;
        Ok(())
    }
}
