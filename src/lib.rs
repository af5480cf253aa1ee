//! Log Tabulator Library
//!
//! A Rust library for converting unstructured, line-oriented log files
//! into structured, multi-table spreadsheet reports.
//!
//! This library provides tools for:
//! - Classifying log lines against a declarative, ordered rule set
//! - Tracking a hierarchy of contextual dimensions across lines
//! - Incrementally assembling extracted key/value pairs into tables
//! - Writing the finished tables into an xlsx workbook with natively
//!   typed cells
//! - Comprehensive error handling with fatal configuration validation

pub mod config;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services;
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

pub mod processor;

// Re-export commonly used types
pub use app::models::{CellValue, LineClass, Table};
pub use config::{RuleSet, RulesSpec};

/// Result type alias for the log tabulator
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for log tabulation operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Rule-set validation or compilation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Rules file could not be read or parsed
    #[error("Rules file error in '{path}': {message}")]
    RulesFile { path: String, message: String },

    /// Input file not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Spreadsheet writing error
    #[error("Spreadsheet writing error: {message}")]
    SpreadsheetWrite {
        message: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a rules file error
    pub fn rules_file(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RulesFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a spreadsheet writing error
    pub fn spreadsheet_write(
        message: impl Into<String>,
        source: rust_xlsxwriter::XlsxError,
    ) -> Self {
        Self::SpreadsheetWrite {
            message: message.into(),
            source,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        Self::SpreadsheetWrite {
            message: "Workbook write failed".to_string(),
            source: error,
        }
    }
}
