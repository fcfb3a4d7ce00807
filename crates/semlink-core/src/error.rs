//! Error types for semlink core.

use thiserror::Error;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The request is malformed at the application layer, e.g. a semantic
    /// query with no tags. Reported back to the caller, never fatal.
    #[error("Inconsistent parameters: {0}")]
    InconsistentParameters(String),

    /// The request asks for behavior this implementation does not provide
    /// (tag-value wildcards, runtime tag mutation).
    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Wire message errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Failed to decode message from {source_addr}: {message}")]
    Decode {
        source_addr: String,
        message: String,
    },

    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Device file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse device file: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Device file not found: {0}")]
    NotFound(String),

    #[error("Invalid object identifier: {0}")]
    InvalidObjectId(String),

    #[error("Duplicate object identifier: {0}")]
    DuplicateObjectId(String),

    #[error("Invalid tag name: {0}")]
    InvalidTagName(String),

    #[error("No config directory available on this platform")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inconsistent_parameters_display() {
        let err = CoreError::InconsistentParameters("at least one tag required".to_string());
        assert_eq!(
            format!("{}", err),
            "Inconsistent parameters: at least one tag required"
        );
    }

    #[test]
    fn test_core_error_from_config_error() {
        let err = CoreError::Config(ConfigError::DuplicateObjectId("device:9".to_string()));
        assert!(format!("{}", err).contains("Duplicate object identifier"));
    }

    #[test]
    fn test_protocol_decode_display() {
        let err = ProtocolError::Decode {
            source_addr: "10.0.0.7:3993".to_string(),
            message: "expected value".to_string(),
        };
        assert!(format!("{}", err).contains("10.0.0.7:3993"));
    }
}
