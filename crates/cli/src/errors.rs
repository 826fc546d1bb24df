//! CLI error types with miette diagnostics

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// A cache operation failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Cache(#[from] baw_cache::Error),

    #[error("Settings file not found: {}", path.display())]
    #[diagnostic(
        code(baw::cli::settings_not_found),
        help("Pass --settings <FILE> or set BAW_CACHE_SETTINGS")
    )]
    SettingsNotFound { path: PathBuf },

    #[error("Invalid parameter '{argument}'")]
    #[diagnostic(
        code(baw::cli::invalid_argument),
        help("Parameters are written as field=value, e.g. --param sample_rate=22050")
    )]
    InvalidArgument { argument: String },

    #[error("Failed to write command output")]
    #[diagnostic(code(baw::cli::output))]
    Output {
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn invalid_argument(argument: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(source: std::io::Error) -> Self {
        Self::Output { source }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Cache(baw_cache::Error::serialization(e.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
