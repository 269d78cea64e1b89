//! Field aliasing: the bijection between internal field identifiers and
//! external column names, derived once per record schema.

use std::collections::BTreeMap;

use crate::error::ModelError;
use crate::row::FlatRow;

/// One field declaration: the internal identifier plus an optional external
/// column name. When no alias is declared the identifier itself is the
/// column name.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub ident: &'static str,
    pub alias: Option<&'static str>,
}

impl Field {
    pub const fn new(ident: &'static str) -> Self {
        Self { ident, alias: None }
    }

    pub const fn aliased(ident: &'static str, alias: &'static str) -> Self {
        Self {
            ident,
            alias: Some(alias),
        }
    }

    /// External column name for this field.
    pub fn column(&self) -> &'static str {
        self.alias.unwrap_or(self.ident)
    }
}

/// Immutable identifier <-> column-name mapping for one record schema.
///
/// Built once from the schema's static field table. Construction rejects
/// duplicate identifiers and duplicate column names, so reverse lookup is a
/// true bijection from then on.
#[derive(Debug)]
pub struct AliasMap {
    schema: &'static str,
    fields: &'static [Field],
    by_ident: BTreeMap<&'static str, &'static str>,
    by_column: BTreeMap<&'static str, &'static str>,
}

impl AliasMap {
    pub fn new(schema: &'static str, fields: &'static [Field]) -> Result<Self, ModelError> {
        let mut by_ident = BTreeMap::new();
        let mut by_column = BTreeMap::new();
        for field in fields {
            if by_ident.insert(field.ident, field.column()).is_some() {
                return Err(ModelError::DuplicateField {
                    schema,
                    ident: field.ident,
                });
            }
            if let Some(first) = by_column.insert(field.column(), field.ident) {
                return Err(ModelError::DuplicateAlias {
                    schema,
                    alias: field.column(),
                    first,
                    second: field.ident,
                });
            }
        }
        Ok(Self {
            schema,
            fields,
            by_ident,
            by_column,
        })
    }

    pub fn schema(&self) -> &'static str {
        self.schema
    }

    /// Field declarations in declaration order.
    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }

    /// External column names in field-declaration order. This is the header
    /// layout the tabular encoder writes.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(Field::column)
    }

    /// External column name for an identifier.
    pub fn column_of(&self, ident: &str) -> Option<&'static str> {
        self.by_ident.get(ident).copied()
    }

    /// Identifier for an external column name.
    pub fn ident_of(&self, column: &str) -> Option<&'static str> {
        self.by_column.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Rewrites a row's keys from external column names to identifiers.
    ///
    /// Keys that are not column names of this schema pass through unchanged;
    /// repeated-group columns are matched later by pattern, not by alias.
    pub fn rekey(&self, row: &FlatRow) -> FlatRow {
        row.iter()
            .map(|(key, value)| {
                let ident = self.ident_of(key).unwrap_or(key);
                (ident.to_string(), value.clone())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::CellValue;

    static FIELDS: &[Field] = &[
        Field::aliased("global_rank", "Global Rank"),
        Field::new("page"),
    ];

    #[test]
    fn test_alias_falls_back_to_ident() {
        let map = AliasMap::new("Test", FIELDS).unwrap();
        assert_eq!(map.column_of("global_rank"), Some("Global Rank"));
        assert_eq!(map.column_of("page"), Some("page"));
        assert_eq!(map.ident_of("Global Rank"), Some("global_rank"));
    }

    #[test]
    fn test_duplicate_alias_rejected_at_registration() {
        static CLASHING: &[Field] = &[
            Field::aliased("rank_a", "Rank"),
            Field::aliased("rank_b", "Rank"),
        ];
        let error = AliasMap::new("Clashing", CLASHING).unwrap_err();
        assert!(matches!(
            error,
            ModelError::DuplicateAlias {
                alias: "Rank",
                first: "rank_a",
                second: "rank_b",
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_ident_rejected_at_registration() {
        static CLASHING: &[Field] = &[
            Field::aliased("rank", "Rank A"),
            Field::aliased("rank", "Rank B"),
        ];
        let error = AliasMap::new("Clashing", CLASHING).unwrap_err();
        assert!(matches!(error, ModelError::DuplicateField { ident: "rank", .. }));
    }

    #[test]
    fn test_rekey_passes_unknown_keys_through() {
        let map = AliasMap::new("Test", FIELDS).unwrap();
        let row: FlatRow = [("Global Rank", "#1"), ("Monthly Traffic P1", "Oct:87.0B")]
            .into_iter()
            .collect();
        let rekeyed = map.rekey(&row);
        let keys: Vec<&str> = rekeyed.keys().collect();
        assert_eq!(keys, vec!["global_rank", "Monthly Traffic P1"]);
        assert_eq!(
            rekeyed.get("global_rank"),
            Some(&CellValue::Text("#1".to_string()))
        );
    }
}
