//! Output handler traits and types
//!
//! This module defines the trait interface for record exporters and the
//! errors they report.

use crate::extract::ProductRecord;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for record exporters
///
/// An exporter writes a complete set of records to its destination in one call,
/// replacing whatever was there before. Records are written in the order given.
pub trait OutputHandler {
    /// Writes all records
    ///
    /// # Arguments
    ///
    /// * `records` - The extracted records, in discovery order
    fn write_records(&self, records: &[ProductRecord]) -> OutputResult<()>;

    /// Where the records end up
    fn destination(&self) -> &Path;
}
