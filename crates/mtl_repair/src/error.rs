//! Error types for the repair pipeline
//!
//! Every abort condition is a distinct variant so callers (and tests) can
//! match on the reason rather than on message text.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Repair pipeline errors
#[derive(Error, Debug)]
pub enum RepairError {
    /// Target path is missing or not a directory
    #[error("Provided path is not a valid folder: {0}")]
    InvalidDirectory(PathBuf),

    /// No mesh file in the target directory
    #[error("No .{extension} file found in the given folder")]
    NoMeshFile {
        /// Mesh extension that was searched for
        extension: String,
    },

    /// More than one mesh file in the target directory
    #[error("Multiple .{extension} files found ({}), exactly one is required", .found.join(", "))]
    AmbiguousMeshFile {
        /// Mesh extension that was searched for
        extension: String,
        /// File names of every candidate
        found: Vec<String>,
    },

    /// Mesh file has no material library directive
    #[error("The mesh file {0:?} does not reference any material file")]
    NoMaterialReference(PathBuf),

    /// Referenced material file is not present
    #[error("Referenced material file '{0}' not found in the folder")]
    MaterialNotFound(String),

    /// Textures were missing and none of them got a replacement
    #[error("No valid texture replacements were selected for {missing} missing texture(s)")]
    NoReplacementsSelected {
        /// Number of missing references discovered
        missing: usize,
    },

    /// Filesystem failure while reading or writing
    #[error("IO error on {path:?}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failure while indexing textures
    #[error("Failed to scan texture directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RepairError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
