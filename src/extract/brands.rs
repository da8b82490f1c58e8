//! Category -> brand reference data
//!
//! Built once from configuration and shared read-only by every extraction call.

use std::collections::{BTreeMap, HashMap};

/// Immutable category -> brand lookup table
///
/// Keys are matched case-insensitively, with whitespace collapsed and typographic
/// apostrophes folded to ASCII, so "Men’s  grooming" finds "Men's Grooming".
#[derive(Debug, Clone, Default)]
pub struct BrandTable {
    entries: HashMap<String, String>,
}

impl BrandTable {
    /// Builds a table from `(category, brand)` pairs; later duplicates win
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(category, brand)| (lookup_key(category.as_ref()), brand.into()))
            .collect();
        Self { entries }
    }

    /// Builds a table from the `[brands]` configuration section
    pub fn from_config(brands: &BTreeMap<String, String>) -> Self {
        Self::new(brands.iter().map(|(k, v)| (k.as_str(), v.clone())))
    }

    /// Exact lookup of one category term
    pub fn lookup(&self, category: &str) -> Option<&str> {
        self.entries.get(&lookup_key(category)).map(String::as_str)
    }

    /// Infers a brand from a category value
    ///
    /// Tries the whole value first, then each comma-separated term from the most
    /// specific (last) to the least specific (first).
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_harvest::extract::BrandTable;
    ///
    /// let table = BrandTable::new([("Men's Grooming", "Acme")]);
    /// assert_eq!(table.infer("Wholesale, Men's Grooming"), Some("Acme"));
    /// assert_eq!(table.infer("Serums"), None);
    /// ```
    pub fn infer(&self, category: &str) -> Option<&str> {
        if let Some(brand) = self.lookup(category) {
            return Some(brand);
        }

        category
            .split(',')
            .rev()
            .filter(|term| !term.trim().is_empty())
            .find_map(|term| self.lookup(term))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn lookup_key(category: &str) -> String {
    category
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(['\u{2019}', '\u{2018}'], "'")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_and_space_insensitive() {
        let table = BrandTable::new([("Men's Grooming", "Acme")]);
        assert_eq!(table.lookup("men's grooming"), Some("Acme"));
        assert_eq!(table.lookup("  MEN'S   Grooming "), Some("Acme"));
        assert_eq!(table.lookup("Men\u{2019}s Grooming"), Some("Acme"));
    }

    #[test]
    fn test_infer_prefers_whole_value() {
        let table = BrandTable::new([("Face Care, Serums", "Whole"), ("Serums", "Term")]);
        assert_eq!(table.infer("Face Care, Serums"), Some("Whole"));
    }

    #[test]
    fn test_infer_prefers_last_term() {
        let table = BrandTable::new([("Face Care", "First"), ("Serums", "Last")]);
        assert_eq!(table.infer("Face Care, Serums"), Some("Last"));
        assert_eq!(table.infer("Face Care, Toners"), Some("First"));
    }

    #[test]
    fn test_empty_table() {
        let table = BrandTable::default();
        assert!(table.is_empty());
        assert_eq!(table.infer("Anything"), None);
    }

    #[test]
    fn test_from_config() {
        let mut map = BTreeMap::new();
        map.insert("Serums".to_string(), "Petal".to_string());
        let table = BrandTable::from_config(&map);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("serums"), Some("Petal"));
    }
}
