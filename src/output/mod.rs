//! Persistence of canvas snapshots to PNG files.

pub mod file;

pub use file::{default_output_dir, expand_tilde, generate_filename, save_png};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while saving a snapshot.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("output directory {} does not exist", .0.display())]
    OutputDirectoryMissing(PathBuf),

    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode PNG: {0}")]
    Encode(String),
}

/// Where and how snapshots are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTarget {
    pub directory: PathBuf,
    /// Create the directory when it is missing
    pub create_dir: bool,
    /// Reset the canvas after a successful write
    pub clean: bool,
}

impl Default for SaveTarget {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            create_dir: true,
            clean: true,
        }
    }
}
