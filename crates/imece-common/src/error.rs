//! Error types shared across the imece workspace

use thiserror::Error;

/// Result type alias for imece operations
pub type Result<T> = std::result::Result<T, ImeceError>;

/// Workspace-level error type
#[derive(Error, Debug)]
pub enum ImeceError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("parse failure: {0}")]
    Parse(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ImeceError = io.into();
        assert!(err.to_string().contains("i/o failure"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ImeceError::Config("bad delimiter".to_string());
        assert_eq!(err.to_string(), "invalid configuration: bad delimiter");
    }
}
