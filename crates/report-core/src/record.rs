use std::collections::HashMap;

use serde::Serialize;

use crate::schema::{FALLBACK_VALUE, SCHEMA};

/// The flat field-name to value mapping a report is rendered from.
///
/// Keys are normalized to upper-case on insert so providers are free to use
/// whatever casing their payloads carry. Template substitution downstream is
/// literal and only ever sees the normalized form.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ReportRecord {
    values: HashMap<String, String>,
}

impl ReportRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.values
            .insert(key.as_ref().to_ascii_uppercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Value for `key`, or the fallback sentinel when absent.
    pub fn get_or_fallback(&self, key: &str) -> &str {
        self.get(key).unwrap_or(FALLBACK_VALUE)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(&key.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Schema fields that have no entry yet.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        SCHEMA
            .iter()
            .copied()
            .filter(|f| !self.values.contains_key(*f))
            .collect()
    }

    /// Complete the record: every schema field still absent gets the
    /// fallback sentinel. After this returns, every field in [`SCHEMA`] has
    /// an entry.
    pub fn finalize(&mut self) {
        for field in SCHEMA {
            self.values
                .entry((*field).to_string())
                .or_insert_with(|| FALLBACK_VALUE.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_normalized_on_insert() {
        let mut record = ReportRecord::new();
        record.insert("nifty_closing", "25108.30");
        assert_eq!(record.get("NIFTY_CLOSING"), Some("25108.30"));
        assert_eq!(record.get("nifty_closing"), Some("25108.30"));
    }

    #[test]
    fn finalize_covers_every_schema_field() {
        let mut record = ReportRecord::new();
        record.insert("NIFTY_CLOSING", "25108.30");
        record.finalize();

        assert!(record.missing_fields().is_empty());
        for field in SCHEMA {
            assert!(record.contains(field), "missing {field}");
        }
        assert_eq!(record.get("NIFTY_CLOSING"), Some("25108.30"));
        assert_eq!(record.get("SENSEX_CLOSING"), Some(FALLBACK_VALUE));
    }

    #[test]
    fn finalize_does_not_overwrite_fetched_values() {
        let mut record = ReportRecord::new();
        record.insert("GAINER_1_NAME", "TATAMOTORS");
        record.finalize();
        assert_eq!(record.get("GAINER_1_NAME"), Some("TATAMOTORS"));
    }

    #[test]
    fn fallback_accessor() {
        let record = ReportRecord::new();
        assert_eq!(record.get_or_fallback("GOLD_PRICE"), FALLBACK_VALUE);
    }
}
