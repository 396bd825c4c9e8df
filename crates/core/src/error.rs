//! Error types for U-BinFit.

use thiserror::Error;

/// Result type alias for U-BinFit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or running an allocation.
///
/// A shipment that fits nowhere is not an error; it ends up in the unfit list.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid shipment provided.
    #[error("Invalid shipment: {0}")]
    InvalidShipment(String),

    /// Invalid bin provided.
    #[error("Invalid bin: {0}")]
    InvalidBin(String),

    /// A required descriptor field was absent.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidShipment("length for 'Box' must be positive".into());
        assert_eq!(
            err.to_string(),
            "Invalid shipment: length for 'Box' must be positive"
        );

        let err = Error::MissingField("bins[0].max_weight".into());
        assert_eq!(err.to_string(), "Missing required field: bins[0].max_weight");
    }
}
