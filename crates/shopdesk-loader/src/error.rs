//! Error types for shopdesk-loader

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Data directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Invalid JSON in {location}: {message}")]
    InvalidJson {
        location: String,
        message: String,
    },

    #[error("Unexpected layout in {location}: {message}")]
    InvalidLayout {
        location: String,
        message: String,
    },

    #[error("Invalid glob pattern: {pattern}")]
    InvalidPattern { pattern: String },

    #[error("IO error")]
    IoError(#[from] io::Error),
}
