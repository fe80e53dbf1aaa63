//! Error types for the runelint library.
//!
//! This module provides structured error handling for all runelint operations.
//! Only configuration, dictionary-storage, and cancellation errors are surfaced
//! to callers of the public API; detector-level and augmentation-level failures
//! degrade to partial results and are reported through logging and engine events.

use std::io;

use thiserror::Error;

/// Main result type for runelint operations.
pub type Result<T> = std::result::Result<T, RunelintError>;

/// Comprehensive error type for all runelint operations.
#[derive(Error, Debug)]
pub enum RunelintError {
    /// I/O related errors (dictionary storage, file operations)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors raised synchronously from configure/register paths
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Parsing errors, localized to the structural analyzer
    #[error("Parse error in {language}: {message}")]
    Parse {
        /// Language tag being parsed
        language: String,
        /// Error description
        message: String,
    },

    /// External semantic provider errors (timeout, bad response, auth failure)
    #[error("External service error from {provider}: {message}")]
    ExternalService {
        /// Provider identifier
        provider: String,
        /// Error description
        message: String,
        /// Underlying transport or decoding error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed dictionary entries or dictionary bookkeeping failures
    #[error("Dictionary error: {message}")]
    Dictionary {
        /// Error description
        message: String,
        /// Dictionary name, when the error is scoped to one
        dictionary: Option<String>,
    },

    /// A finding whose offsets fall outside the source snapshot
    #[error("Invalid range [{start}, {end}) for source of length {len}")]
    InvalidRange {
        /// Start offset (characters)
        start: usize,
        /// End offset (characters)
        end: usize,
        /// Source length in characters
        len: usize,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Analysis aborted by a cancellation token
    #[error("Analysis cancelled")]
    Cancelled,

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
    },
}

impl RunelintError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new parse error
    pub fn parse(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            language: language.into(),
            message: message.into(),
        }
    }

    /// Create a new external service error
    pub fn external_service(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalService {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a new dictionary error
    pub fn dictionary(message: impl Into<String>) -> Self {
        Self::Dictionary {
            message: message.into(),
            dictionary: None,
        }
    }

    /// Create a new dictionary error scoped to a named dictionary
    pub fn dictionary_named(message: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Dictionary {
            message: message.into(),
            dictionary: Some(name.into()),
        }
    }

    /// Create a new invalid range error
    pub fn invalid_range(start: usize, end: usize, len: usize) -> Self {
        Self::InvalidRange { start, end, len }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error is recoverable at the detector boundary.
    ///
    /// Recoverable errors degrade to an empty finding set rather than
    /// aborting the analysis call.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::ExternalService { .. } | Self::InvalidRange { .. }
        )
    }
}

// Implement From traits for common error types
impl From<io::Error> for RunelintError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for RunelintError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

impl From<reqwest::Error> for RunelintError {
    fn from(err: reqwest::Error) -> Self {
        let provider = err
            .url()
            .and_then(|url| url.host_str().map(String::from))
            .unwrap_or_else(|| "unknown".to_string());
        Self::ExternalService {
            provider,
            message: format!("HTTP request failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

impl From<globset::Error> for RunelintError {
    fn from(err: globset::Error) -> Self {
        Self::config_field(format!("Invalid ignore pattern: {err}"), "ignore_patterns")
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Replace the error with an internal error carrying the given context
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<RunelintError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let inner = e.into();
            RunelintError::internal(format!("{}: {inner}", f()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = RunelintError::config("Invalid configuration");
        assert!(matches!(err, RunelintError::Config { .. }));

        let err = RunelintError::parse("python", "Syntax error");
        assert!(matches!(err, RunelintError::Parse { .. }));
    }

    #[test]
    fn test_config_field_error() {
        let err = RunelintError::config_field("Invalid value", "auto_fix_threshold");

        if let RunelintError::Config { message, field } = err {
            assert_eq!(message, "Invalid value");
            assert_eq!(field, Some("auto_fix_threshold".to_string()));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_dictionary_named_error() {
        let err = RunelintError::dictionary_named("Empty word", "english");

        if let RunelintError::Dictionary {
            message,
            dictionary,
        } = err
        {
            assert_eq!(message, "Empty word");
            assert_eq!(dictionary, Some("english".to_string()));
        } else {
            panic!("Expected Dictionary error");
        }
    }

    #[test]
    fn test_invalid_range_display() {
        let err = RunelintError::invalid_range(5, 12, 10);
        let display = format!("{}", err);
        assert!(display.contains("[5, 12)"));
        assert!(display.contains("length 10"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(RunelintError::parse("go", "bad token").is_recoverable());
        assert!(RunelintError::external_service("provider", "timeout").is_recoverable());
        assert!(!RunelintError::config("bad").is_recoverable());
        assert!(!RunelintError::Cancelled.is_recoverable());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: RunelintError = io_err.into();
        assert!(matches!(err, RunelintError::Io { .. }));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let err: RunelintError = json_err.into();
        assert!(matches!(err, RunelintError::Serialization { .. }));
    }

    #[test]
    fn test_result_ext_with_context() {
        let result: std::result::Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Bad input",
        ));

        let err = result
            .with_context(|| "Loading dictionary".to_string())
            .unwrap_err();
        let display = format!("{}", err);
        assert!(display.contains("Loading dictionary"));
    }
}
