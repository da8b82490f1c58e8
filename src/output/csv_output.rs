//! CSV exporter
//!
//! One row per record, columns in the fixed record order, missing values as
//! empty cells. The header row is always written, even for an empty export.

use crate::extract::{ProductRecord, COLUMNS};
use crate::output::traits::{OutputHandler, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes records to a CSV file
pub struct CsvOutput {
    path: PathBuf,
}

impl CsvOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for CsvOutput {
    fn write_records(&self, records: &[ProductRecord]) -> OutputResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.path)?;
        write_csv(file, records)?;
        tracing::info!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn destination(&self) -> &Path {
        &self.path
    }
}

/// Writes the header and every record to `writer`
pub fn write_csv<W: Write>(writer: W, records: &[ProductRecord]) -> OutputResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
