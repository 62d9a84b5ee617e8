//! Error types for authgate.
//!
//! Faults raised by plugin code never surface as [`Error`]; they are
//! absorbed into adapter status. These variants cover host-side misuse.

use thiserror::Error;

/// Result type alias for authgate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in authgate operations.
#[derive(Error, Debug)]
pub enum Error {
    // Registry errors
    #[error("Plugin already registered: {0}")]
    DuplicatePlugin(String),

    #[error("Plugin not registered: {0}")]
    PluginNotRegistered(String),

    // Configuration errors
    #[error("Unknown control flag: {0}")]
    UnknownControlFlag(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DuplicatePlugin("acme::LdapPlugin".to_string());
        assert_eq!(err.to_string(), "Plugin already registered: acme::LdapPlugin");
    }

    #[test]
    fn test_from_serde_error() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::SerializationError(_)));
    }
}
