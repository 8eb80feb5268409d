//! Configuration module

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for one device
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub host: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl ConnectionOptions {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Basic auth pair, only when both username and password are set
    pub fn auth(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

/// Settings for the `nam` command-line tool
#[derive(Debug, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            host: None,
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_poll_interval_secs() -> u64 {
    60
}

impl CliConfig {
    /// Load from an optional file and `NAM__*` environment variables
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let file = match path {
            Some(p) => config::File::with_name(p).required(true),
            None => config::File::with_name("config/nam").required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("NAM").separator("__"))
            .build()?;

        let config: CliConfig = settings.try_deserialize()?;
        Ok(config)
    }

    pub fn connection_options(&self) -> anyhow::Result<ConnectionOptions> {
        let host = self
            .host
            .clone()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Device host is not configured (set NAM__HOST or --host)"))?;

        let mut options =
            ConnectionOptions::new(host).with_timeout(Duration::from_secs(self.timeout_secs));
        options.username = self.username.clone();
        options.password = self.password.clone();
        Ok(options)
    }
}
