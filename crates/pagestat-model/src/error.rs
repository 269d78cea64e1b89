use thiserror::Error;

/// Errors raised by schema registration and typed flat-record construction.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Two fields of one schema declare the same external column name.
    /// This is a schema-definition bug and surfaces at registration.
    #[error("duplicate alias '{alias}' in schema {schema}: declared by both '{first}' and '{second}'")]
    DuplicateAlias {
        schema: &'static str,
        alias: &'static str,
        first: &'static str,
        second: &'static str,
    },

    /// Two fields of one schema share an identifier.
    #[error("duplicate field identifier '{ident}' in schema {schema}")]
    DuplicateField {
        schema: &'static str,
        ident: &'static str,
    },

    /// A typed flat record was built from a row containing a non-text cell.
    #[error("field '{field}' holds a {kind} cell where text was required")]
    NonTextCell { field: String, kind: &'static str },
}

pub type Result<T> = std::result::Result<T, ModelError>;
