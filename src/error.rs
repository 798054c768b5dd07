// MIT License - Copyright (c) 2026 Peter Wright
// Error types

use crate::hap::CharacteristicKind;
use crate::identity::AccessoryIdentity;

/// All errors that can occur in the yale-sync-bridge library.
///
/// Device-level failures (a group that fails to load, a command the remote
/// rejects) are absorbed by the platform and only logged. The variants that
/// reach callers are transport failures of the remote client, host persistence
/// failures and routing mistakes (unknown accessory, unbound characteristic).
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication failed: {reason}")]
    Authentication { reason: String },

    #[error("Not authenticated with the remote service")]
    NotAuthenticated,

    #[error("Remote service error during {action}: {status} {details}")]
    Api {
        action: String,
        status: u16,
        details: String,
    },

    #[error("Invalid response: {details}")]
    InvalidResponse { details: String },

    #[error("Unknown remote device: {identifier}")]
    UnknownDevice { identifier: String },

    #[error("Unknown accessory: {identity}")]
    UnknownAccessory { identity: AccessoryIdentity },

    #[error("No {direction} handler bound for {characteristic:?}")]
    HandlerNotBound {
        characteristic: CharacteristicKind,
        direction: &'static str,
    },

    #[error("Invalid value for {characteristic:?}: {value}")]
    InvalidValue {
        characteristic: CharacteristicKind,
        value: String,
    },

    #[error("Discovery requested before the host finished launching")]
    NotLaunched,
}

impl BridgeError {
    /// Whether the remote session is gone and a new login is needed.
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            BridgeError::NotAuthenticated | BridgeError::Api { status: 401, .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expired() {
        let err = BridgeError::Api {
            action: "GET api/panel/info/".to_string(),
            status: 401,
            details: "token expired".to_string(),
        };
        assert!(err.is_session_expired());

        let err = BridgeError::Api {
            action: "GET api/panel/info/".to_string(),
            status: 503,
            details: "Service Unavailable".to_string(),
        };
        assert!(!err.is_session_expired());

        assert!(BridgeError::NotAuthenticated.is_session_expired());
        assert!(!BridgeError::NotLaunched.is_session_expired());
    }

    #[test]
    fn test_error_display() {
        let err = BridgeError::HandlerNotBound {
            characteristic: CharacteristicKind::MotionDetected,
            direction: "set",
        };
        assert_eq!(err.to_string(), "No set handler bound for MotionDetected");
    }
}
