//! Error types shared by the Oracle crates.

use thiserror::Error;

/// Result type alias using the Oracle error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Oracle services.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Remote analysis service error
    #[error("External service error: {0}")]
    External(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this error came from the remote analysis service.
    pub fn is_external(&self) -> bool {
        match self {
            Self::External(_) => true,
            Self::WithContext { source, .. } => source.is_external(),
            _ => false,
        }
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::External(_) => 502,
            Self::WithContext { source, .. } => source.status_code(),
            _ => 500,
        }
    }
}

/// Extension trait for adding context to any error type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(Error::InvalidInput("test".into()).status_code(), 400);
        assert_eq!(Error::External("test".into()).status_code(), 502);
        assert_eq!(Error::Config("test".into()).status_code(), 500);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::External("connection refused".into());
        let with_ctx = err.with_context("calling /api/analyze");
        assert!(matches!(with_ctx, Error::WithContext { .. }));
        assert!(with_ctx.is_external());
        assert_eq!(with_ctx.status_code(), 502);
        assert_eq!(
            with_ctx.to_string(),
            "calling /api/analyze: External service error: connection refused"
        );
    }

    #[test]
    fn test_result_ext_wraps_io_errors() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = res.context("reading response dump").unwrap_err();
        assert!(err.to_string().starts_with("reading response dump: IO error"));
    }
}
