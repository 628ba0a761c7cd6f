//! Error types for pkviz

use thiserror::Error;

/// pkviz error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error (payload present but not usable)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The server answered with `success: false`
    #[error("Server reported failure: {0}")]
    Envelope(String),

    /// Network or transport failure
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_convert() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn envelope_message_is_displayed() {
        let err = Error::Envelope("Error loading plot data".into());
        assert_eq!(err.to_string(), "Server reported failure: Error loading plot data");
    }
}
