//! Device HTTP endpoints

use reqwest::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Config,
    Data,
    Ota,
    Restart,
    Values,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Config => "/config.json",
            Endpoint::Data => "/data.json",
            Endpoint::Ota => "/ota",
            Endpoint::Restart => "/reset",
            Endpoint::Values => "/values",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::Ota | Endpoint::Restart => Method::POST,
            _ => Method::GET,
        }
    }

    pub fn url(&self, host: &str) -> String {
        format!("http://{}{}", host, self.path())
    }
}
