//! Run statistics
//!
//! Counters accumulated by the pipeline and printed at the end of a run.

use crate::extract::{ProductRecord, COLUMNS};
use std::collections::HashMap;

/// Harvest statistics summary
#[derive(Debug, Clone, Default)]
pub struct ExtractionStats {
    /// Listing roots whose collection completed
    pub listing_roots: u64,

    /// Listing roots skipped because their start page failed
    pub listing_roots_failed: u64,

    /// Listing page fetches across all roots
    pub listing_pages_fetched: u64,

    /// Unique product URLs collected
    pub product_links: u64,

    /// Product pages fetched successfully
    pub product_pages_fetched: u64,

    /// Product pages skipped after a failed fetch
    pub product_pages_failed: u64,

    /// Records produced
    pub records: u64,

    /// Number of records with a value, per optional field
    pub filled: HashMap<&'static str, u64>,
}

impl ExtractionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a record and the fields it carries
    pub fn record(&mut self, record: &ProductRecord) {
        self.records += 1;
        for (field, value) in record.optional_fields() {
            if value.is_some() {
                *self.filled.entry(field).or_insert(0) += 1;
            }
        }
    }

    /// Records with a value for `field`
    pub fn filled_count(&self, field: &str) -> u64 {
        self.filled.get(field).copied().unwrap_or(0)
    }

    /// Share of records with a value for `field`, as a percentage
    pub fn fill_rate(&self, field: &str) -> f64 {
        if self.records == 0 {
            return 0.0;
        }
        (self.filled_count(field) as f64 / self.records as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &ExtractionStats) {
    println!("=== Harvest Statistics ===\n");

    println!("Collection:");
    println!("  Listing roots: {}", stats.listing_roots);
    if stats.listing_roots_failed > 0 {
        println!("  Listing roots skipped: {}", stats.listing_roots_failed);
    }
    println!("  Listing pages fetched: {}", stats.listing_pages_fetched);
    println!("  Product links found: {}", stats.product_links);
    println!();

    println!("Extraction:");
    println!("  Product pages fetched: {}", stats.product_pages_fetched);
    println!("  Product pages failed: {}", stats.product_pages_failed);
    println!("  Records: {}", stats.records);
    println!();

    println!("Field Coverage:");
    for field in COLUMNS.iter().filter(|c| **c != "product_page_url") {
        println!(
            "  {}: {} ({:.1}%)",
            field,
            stats.filled_count(field),
            stats.fill_rate(field)
        );
    }
}
