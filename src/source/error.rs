//! Error types for the data loading layer.

use thiserror::Error;

/// Errors that can occur while retrieving the dashboard resources.
///
/// None of these is fatal to the application: a failed load at startup is
/// replaced by the built-in sample data, and a failed reload keeps the
/// previous store and surfaces the message in the status bar.
#[derive(Debug, Error)]
pub enum LoadError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// A resource did not deserialize into the expected shape.
    #[error("Failed to parse {0}: {1}")]
    Parse(&'static str, String),

    /// A resource could not be read from disk.
    #[error("Failed to read {0}: {1}")]
    Io(&'static str, String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for a resource.
    #[error("Request timed out")]
    Timeout,
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LoadError::Timeout
        } else if err.is_connect() {
            LoadError::Connection(err.to_string())
        } else {
            LoadError::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_the_resource() {
        let err = LoadError::Parse("kpi_data.json", "expected value".to_string());
        assert_eq!(err.to_string(), "Failed to parse kpi_data.json: expected value");
    }

    #[test]
    fn test_timeout_display() {
        assert_eq!(LoadError::Timeout.to_string(), "Request timed out");
    }
}
