//! Flat rows: ordered, untyped column/cell mappings.

use serde::{Deserialize, Serialize};

/// A single cell as handed over by a CSV reader or a page scraper.
///
/// The CSV decoder only ever produces [`CellValue::Text`]; the other variants
/// exist because scrape collaborators hand rows over as loosely typed
/// mappings, and downstream coercion must be able to reject them explicitly
/// instead of stringifying them silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Returns the text content, or `None` for non-text cells.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Short name of the contained type, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "text",
            CellValue::Number(_) => "number",
            CellValue::Bool(_) => "bool",
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// One tabular line: an ordered mapping from external column name to cell.
///
/// Key order is insertion order and is preserved through rekeying; repeated
/// groups rely on it (sub-records follow column order, never re-sorted).
/// The empty string is the universal "missing" sentinel, so lookups for
/// absent keys and lookups hitting an empty cell are treated alike by
/// consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    cells: Vec<(String, CellValue)>,
}

impl FlatRow {
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    /// Appends a cell, preserving insertion order.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.push((key.into(), value.into()));
    }

    /// Returns the first cell stored under `key`.
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Text content of the cell under `key`; empty string when the key is
    /// absent. `None` only when the cell exists but is not text.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(value) => value.as_text(),
            None => Some(""),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for FlatRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_preserves_insertion_order() {
        let row: FlatRow = [("B", "2"), ("A", "1"), ("C", "3")].into_iter().collect();
        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_text_defaults_to_empty_for_missing_key() {
        let row = FlatRow::new();
        assert_eq!(row.text("anything"), Some(""));
    }

    #[test]
    fn test_text_rejects_non_text_cell() {
        let mut row = FlatRow::new();
        row.push("Bounce Rate", CellValue::Number(28.77));
        assert_eq!(row.text("Bounce Rate"), None);
        assert_eq!(row.get("Bounce Rate").unwrap().kind(), "number");
    }

    #[test]
    fn test_cell_value_untagged_serde() {
        let cell: CellValue = serde_json::from_str("\"86.4B\"").unwrap();
        assert_eq!(cell, CellValue::Text("86.4B".to_string()));
        let cell: CellValue = serde_json::from_str("28.77").unwrap();
        assert_eq!(cell, CellValue::Number(28.77));
    }
}
