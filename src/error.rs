//! Error types
//!
//! Only start-up can fail. Everything the host calls per tick is cosmetic and
//! never reports an error.

use std::collections::TryReserveError;

use thiserror::Error;

/// Failure to create a simulation object.
///
/// Nothing is retained on failure: every buffer acquired before the error is
/// dropped before `init` returns.
#[derive(Error, Debug)]
pub enum InitError {
    /// Both dimensions must be larger than 3 cells
    #[error("Invalid dimensions {width}x{height} (both must be greater than 3)")]
    InvalidDimensions { width: u32, height: u32 },

    /// Buffer size does not fit in the address space
    #[error("Image too large: {width}x{height}")]
    TooLarge { width: usize, height: usize },

    /// The source pixels could not be read
    #[error("Source image unreadable: {0}")]
    SourceImage(String),

    /// A buffer could not be allocated
    #[error("Buffer allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}

/// Failure to load or store settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to read or write a binary PPM image.
#[derive(Error, Debug)]
pub enum PpmError {
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed PPM: {0}")]
    Format(String),
}
