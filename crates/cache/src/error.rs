//! Error types for the cache crate

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Why a field failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    /// The field was absent or null
    Missing,
    /// The field held a value of the wrong JSON type
    WrongType {
        /// Name of the expected type
        expected: &'static str,
    },
    /// The field had the right type but an unacceptable value
    OutOfRange {
        /// Description of the violated bound
        detail: String,
    },
    /// The field was a string that does not follow the required syntax
    Malformed {
        /// Description of the expected syntax
        detail: String,
    },
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing"),
            Self::WrongType { expected } => write!(f, "wrong type, expected {expected}"),
            Self::OutOfRange { detail } => write!(f, "out of range, {detail}"),
            Self::Malformed { detail } => write!(f, "malformed, {detail}"),
        }
    }
}

/// Error type for cache operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A key field violates a domain constraint
    #[error("Invalid `{field}`: {reason}")]
    #[diagnostic(
        code(baw::cache::validation),
        help("Check the parameters supplied for this artifact")
    )]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Why the field was rejected
        reason: ValidationReason,
    },

    /// A file name does not follow the schema's segment structure
    #[error("Cannot parse file name '{name}': {reason}")]
    #[diagnostic(
        code(baw::cache::parse),
        help("The file was not produced by this cache schema")
    )]
    Parse {
        /// The file name that failed to parse
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// I/O error during settings loading or scanning
    #[error("I/O {operation} failed{}", path.as_ref().map_or(String::new(), |p| format!(": {}", p.display())))]
    #[diagnostic(
        code(baw::cache::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path that caused the error, if available
        path: Option<Box<Path>>,
        /// Operation that failed (e.g., "read", "walk")
        operation: String,
    },

    /// Configuration error
    #[error("Cache configuration error: {message}")]
    #[diagnostic(code(baw::cache::config))]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Settings could not be deserialized
    #[error("Serialization error: {message}")]
    #[diagnostic(code(baw::cache::serialization))]
    Serialization {
        /// Error message describing the serialization issue
        message: String,
    },
}

impl Error {
    /// Create a validation error for `field`
    #[must_use]
    pub fn validation(field: &'static str, reason: ValidationReason) -> Self {
        Self::Validation { field, reason }
    }

    /// Shorthand for a missing required field
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self::validation(field, ValidationReason::Missing)
    }

    /// Shorthand for a field holding the wrong JSON type
    #[must_use]
    pub fn wrong_type(field: &'static str, expected: &'static str) -> Self {
        Self::validation(field, ValidationReason::WrongType { expected })
    }

    /// Shorthand for a value outside its allowed range
    #[must_use]
    pub fn out_of_range(field: &'static str, detail: impl Into<String>) -> Self {
        Self::validation(
            field,
            ValidationReason::OutOfRange {
                detail: detail.into(),
            },
        )
    }

    /// Shorthand for a string value with bad syntax
    #[must_use]
    pub fn malformed(field: &'static str, detail: impl Into<String>) -> Self {
        Self::validation(
            field,
            ValidationReason::Malformed {
                detail: detail.into(),
            },
        )
    }

    /// Create a parse error for a file name
    #[must_use]
    pub fn parse(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    /// Create an I/O error with path context
    #[must_use]
    pub fn io(
        source: std::io::Error,
        path: impl AsRef<Path>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().into()),
            operation: operation.into(),
        }
    }

    /// Create an I/O error without path context
    #[must_use]
    pub fn io_no_path(source: std::io::Error, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: None,
            operation: operation.into(),
        }
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
        }
    }

    /// True when a file name did not match the schema at all ("not our file")
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// True when a key was well formed but held an unacceptable value
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// The offending field, for validation errors
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, Error>;
