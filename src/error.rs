//! Error and diagnostic types.
//!
//! Data problems in the input DDL are never returned as `Err`: the parsers
//! record a [`ParseDiagnostic`] and move on, and the assessor/converters turn
//! what they find into issues. [`Db2IceError`] is reserved for the ambient
//! operations that can genuinely fail (configuration loading, serialization).

use thiserror::Error;

/// Non-fatal problem recorded while parsing a DDL script.
///
/// Column and constraint level diagnostics are warnings (the table is still
/// produced); statement level diagnostics are errors (no table for that
/// statement).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDiagnostic {
    /// Statement looked like a table definition but the name or the opening
    /// parenthesis of the column list could not be found.
    #[error("Could not parse table header: {0}")]
    UnrecognizedHeader(String),
    /// Column list parenthesis is never closed.
    #[error("Could not find end of column definitions for table {0}")]
    UnbalancedColumnList(String),
    /// Column definition does not start with an identifier.
    #[error("Could not parse column name: {0}")]
    ColumnName(String),
    /// Column type is not part of the dialect's vocabulary.
    #[error("Could not parse data type for column {column}: {definition}")]
    UnknownDataType { column: String, definition: String },
    /// Constraint keyword found but its column list or reference is missing.
    #[error("Could not parse {kind} constraint: {definition}")]
    MalformedConstraint { kind: &'static str, definition: String },
}

/// Errors from the fallible, non-DDL parts of the library.
#[derive(Debug, Error)]
pub enum Db2IceError {
    /// Configuration could not be loaded or deserialized.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    /// Report or result could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Db2IceError>;

/// Shortens a definition for inclusion in a diagnostic message.
pub(crate) fn excerpt(text: &str) -> String {
    const MAX: usize = 50;
    let text = text.trim();
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
