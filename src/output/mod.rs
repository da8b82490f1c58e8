//! Output module for exporting harvested records
//!
//! This module handles:
//! - Writing records as CSV (always) and JSON (when configured)
//! - Recording harvest statistics

mod csv_output;
mod json_output;
pub mod stats;
mod traits;

pub use csv_output::{write_csv, CsvOutput};
pub use json_output::JsonOutput;
pub use stats::{print_statistics, ExtractionStats};
pub use traits::{OutputError, OutputHandler, OutputResult};

use crate::config::OutputConfig;
use crate::extract::ProductRecord;
use std::path::PathBuf;

/// Builds the exporters named by the output configuration
pub fn configured_outputs(config: &OutputConfig) -> Vec<Box<dyn OutputHandler>> {
    let mut outputs: Vec<Box<dyn OutputHandler>> = vec![Box::new(CsvOutput::new(&config.csv_path))];
    if let Some(json_path) = &config.json_path {
        outputs.push(Box::new(JsonOutput::new(json_path)));
    }
    outputs
}

/// Writes `records` to every configured destination
///
/// # Returns
///
/// * `Ok(paths)` - The files written
/// * `Err(OutputError)` - The first exporter that failed
pub fn export_records(
    records: &[ProductRecord],
    config: &OutputConfig,
) -> OutputResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for output in configured_outputs(config) {
        output.write_records(records)?;
        written.push(output.destination().to_path_buf());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_csv_only() {
        let dir = TempDir::new().unwrap();
        let config = OutputConfig {
            csv_path: dir.path().join("out.csv").to_string_lossy().into_owned(),
            json_path: None,
        };

        let written = export_records(&[], &config).unwrap();
        assert_eq!(written, vec![dir.path().join("out.csv")]);
        assert!(dir.path().join("out.csv").exists());
        assert!(!dir.path().join("out.json").exists());
    }

    #[test]
    fn test_export_csv_and_json() {
        let dir = TempDir::new().unwrap();
        let config = OutputConfig {
            csv_path: dir.path().join("out.csv").to_string_lossy().into_owned(),
            json_path: Some(dir.path().join("out.json").to_string_lossy().into_owned()),
        };
        let records = vec![ProductRecord::empty("https://shop.example.com/product/a/")];

        let written = export_records(&records, &config).unwrap();
        assert_eq!(written.len(), 2);
        assert!(std::fs::read_to_string(dir.path().join("out.json"))
            .unwrap()
            .contains("https://shop.example.com/product/a/"));
    }
}
