//! Schema traits tying record types to their alias maps.

use crate::alias::AliasMap;
use crate::error::ModelError;
use crate::row::FlatRow;

/// A record type with a registered alias map.
pub trait RecordSchema {
    /// Schema name used in error reporting.
    const NAME: &'static str;

    /// The schema's identifier <-> column-name mapping. Implementations hold
    /// this in a `LazyLock` so a malformed field table fails at first use,
    /// never during row processing.
    fn alias_map() -> &'static AliasMap;
}

/// A record type resolvable entirely by its alias map: every field is one
/// scalar text cell, with no repeated groups. Such types round-trip through
/// the tabular codec.
pub trait FlatRecord: RecordSchema + Sized {
    /// Builds the record from an identifier-keyed row. Missing keys default
    /// to the empty string; non-text cells are rejected.
    fn from_row(row: &FlatRow) -> Result<Self, ModelError>;

    /// Cell values in field-declaration order, matching
    /// [`AliasMap::columns`].
    fn cells(&self) -> Vec<String>;
}

/// Looks up one text field of an identifier-keyed row, defaulting missing
/// keys to the empty string.
pub fn text_field(row: &FlatRow, ident: &str) -> Result<String, ModelError> {
    match row.get(ident) {
        None => Ok(String::new()),
        Some(cell) => cell
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| ModelError::NonTextCell {
                field: ident.to_string(),
                kind: cell.kind(),
            }),
    }
}
