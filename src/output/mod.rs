//! Output module for writing lemma records and reporting on a crawl
//!
//! This module handles:
//! - Creating the delimited output file and appending validated rows
//! - Recording and printing crawl statistics

mod record_writer;
pub mod stats;

pub use record_writer::RecordWriter;
pub use stats::{print_statistics, CrawlStatistics};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Output file {} already exists, refusing to overwrite it", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Failed to create output file {}: {source}", path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Row {row} not compatible with output file format")]
    Validation { row: String },

    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    Delimiter(char),

    #[error("Failed to write row: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record writer lock poisoned")]
    Poisoned,
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
