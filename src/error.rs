//! Unified error types for chatlens.
//!
//! This module provides a single [`ChatlensError`] enum that covers all error
//! cases in the library. Every failure renders as one human-readable message
//! through its `Display` implementation.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatlens operations.
///
/// # Example
///
/// ```rust
/// use chatlens::error::Result;
/// use chatlens::models::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatlensError>;

/// The error type for all chatlens operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatlensError {
    /// An I/O error occurred.
    ///
    /// This typically happens when the input transcript doesn't exist or
    /// the output file cannot be written.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse the input transcript.
    ///
    /// Contains the format being parsed, the underlying parse error,
    /// and optionally the file path.
    #[error("Failed to parse {format}{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The format being parsed
        format: &'static str,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// The input doesn't match the expected structure.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// Invalid date in a filter or CLI argument.
    ///
    /// Date filters expect YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// An entity violated an invariant the aggregator relies on.
    ///
    /// Raised instead of silently bucketing bad data under an empty key.
    #[error("Data integrity fault: {message}")]
    DataIntegrity {
        /// Description of the offending entity
        message: String,
    },

    /// A background computation channel failed.
    ///
    /// Occurs when a worker was closed, or its blocking task panicked.
    #[error("Channel error: {context}")]
    Channel {
        /// What the channel was doing when it failed
        context: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Kinds of parse errors that can occur.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// The transcript contained no recognizable message or call entries.
    #[error("no messages found")]
    NoMessages,
    /// Regex/pattern matching error
    #[error("{0}")]
    Pattern(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatlensError {
    /// Creates the fatal "no messages found" parse error.
    pub fn no_messages() -> Self {
        ChatlensError::Parse {
            format: "chat transcript",
            source: ParseErrorKind::NoMessages,
            path: None,
        }
    }

    /// Creates a pattern (regex) error.
    pub fn pattern(message: impl Into<String>) -> Self {
        ChatlensError::Parse {
            format: "chat transcript",
            source: ParseErrorKind::Pattern(message.into()),
            path: None,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatlensError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ChatlensError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates a data integrity error.
    pub fn data_integrity(message: impl Into<String>) -> Self {
        ChatlensError::DataIntegrity {
            message: message.into(),
        }
    }

    /// Creates a channel error.
    pub fn channel(context: impl Into<String>) -> Self {
        ChatlensError::Channel {
            context: context.into(),
        }
    }

    /// Attaches a file path to a parse error. Other variants pass through.
    #[must_use]
    pub fn with_path(self, file: impl Into<PathBuf>) -> Self {
        match self {
            ChatlensError::Parse { format, source, .. } => ChatlensError::Parse {
                format,
                source,
                path: Some(file.into()),
            },
            other => other,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatlensError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ChatlensError::Parse { .. })
    }

    /// Returns `true` if the transcript had no recognizable entries.
    pub fn is_no_messages(&self) -> bool {
        matches!(
            self,
            ChatlensError::Parse {
                source: ParseErrorKind::NoMessages,
                ..
            }
        )
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatlensError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, ChatlensError::InvalidDate { .. })
    }

    /// Returns `true` if this is a data integrity error.
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, ChatlensError::DataIntegrity { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
