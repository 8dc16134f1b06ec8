//! Error types for the IFC compressor.
//!
//! The compression pipeline itself never fails; these cover the file and
//! collaborator boundaries around it.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading inputs from disk.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Failed to read a file from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The replacement map is not a JSON object of strings.
    #[error("invalid replacement map '{path}': {source}")]
    InvalidReplacementMap {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors raised while loading the reference material file.
///
/// The loader logs these and falls back to the built-in defaults.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to read or decode the delimited file.
    #[error("reference file could not be read: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// The header row lacks a required column.
    #[error("reference file has no '{column}' column")]
    MissingColumn { column: &'static str },
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}
