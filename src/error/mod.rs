//! Error handling module

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NamError>;

#[derive(Error, Debug)]
pub enum NamError {
    /// Connection failure or timeout. Callers should retry later.
    #[error("{0}")]
    NotResponding(String),

    #[error("{0}")]
    AuthFailed(String),

    #[error("{message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    #[error("{0}")]
    InvalidSensorData(String),

    #[error("{0}")]
    CannotGetMac(String),
}

impl NamError {
    /// HTTP status carried by an API error, if the device sent one
    pub fn status(&self) -> Option<u16> {
        match self {
            NamError::Api { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_not_responding(&self) -> bool {
        matches!(self, NamError::NotResponding(_))
    }

    pub(crate) fn api(message: impl Into<String>) -> Self {
        NamError::Api {
            status: None,
            message: message.into(),
        }
    }

    /// Re-raise a not-responding error as a generic API error.
    /// Any other kind passes through unchanged.
    pub(crate) fn into_api(self) -> Self {
        match self {
            NamError::NotResponding(message) => NamError::Api {
                status: None,
                message,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_for_api_errors() {
        let err = NamError::Api {
            status: Some(500),
            message: "Invalid response from device 10.0.0.2: 500".to_string(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "Invalid response from device 10.0.0.2: 500");

        assert_eq!(NamError::AuthFailed("x".into()).status(), None);
    }

    #[test]
    fn test_into_api_keeps_message() {
        let err = NamError::NotResponding("The device 10.0.0.2 is not responding".into());
        assert!(err.is_not_responding());

        let api = err.into_api();
        assert!(matches!(api, NamError::Api { status: None, .. }));
        assert_eq!(api.to_string(), "The device 10.0.0.2 is not responding");
    }

    #[test]
    fn test_into_api_passes_other_kinds() {
        let err = NamError::AuthFailed("Authorization has failed".into()).into_api();
        assert!(matches!(err, NamError::AuthFailed(_)));
    }
}
