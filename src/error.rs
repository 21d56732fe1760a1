//! Error types for chart rendering.
//!
//! Normalization is total and never produces an error; everything here
//! concerns the PDF backend and the save path.

/// Result type alias for chart rendering operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while assembling or saving a chart.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file could not be parsed as an extraction payload
    #[error("Invalid extraction input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = Error::InvalidInput("expected value at line 1".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Invalid extraction input"));
        assert!(msg.contains("line 1"));
    }

    #[test]
    fn test_io_error_wraps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::from(io);
        assert!(format!("{}", err).contains("missing"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
