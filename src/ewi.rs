//! Output formatting shared by both converters: EWI markers, identifier
//! quoting, and the Iceberg trailer clauses.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::config::ConversionConfig;

static SIMPLE_IDENTIFIER: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").ok());

static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ORDER", "GROUP", "SELECT", "FROM", "WHERE", "TABLE", "INDEX", "CREATE", "DROP", "ALTER",
        "INSERT", "UPDATE", "DELETE", "VALUES", "AND", "OR", "NOT", "NULL", "TRUE", "FALSE",
        "DATE", "TIME", "TIMESTAMP",
    ]
    .into_iter()
    .collect()
});

/// Inline marker flagging a manual-review item in generated DDL.
pub fn marker(code: &str, message: &str) -> String {
    format!("!!!RESOLVE EWI!!! /*** {} - {} ***/!!!", code, message)
}

/// Formats a single identifier for output.
///
/// Plain identifiers that are not reserved come out upper-cased; anything
/// else is double-quoted with its case preserved.
pub fn format_identifier(name: &str) -> String {
    let simple = SIMPLE_IDENTIFIER
        .as_ref()
        .is_some_and(|re| re.is_match(name));
    if simple && !RESERVED_WORDS.contains(name.to_ascii_uppercase().as_str()) {
        name.to_ascii_uppercase()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Formats each part of a qualified name and joins them with `.`.
pub fn format_qualified<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|p| format_identifier(p.as_ref()))
        .collect::<Vec<_>>()
        .join(".")
}

/// Formats a column list as `A, B, C`.
pub fn format_column_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format_identifier(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Substitutes `{schema}` and `{table}` in the configured pattern, lowercased.
/// A missing schema renders as `default`.
pub fn base_location(pattern: &str, schema: Option<&str>, table: &str) -> String {
    pattern
        .replace("{schema}", &schema.unwrap_or("default").to_lowercase())
        .replace("{table}", &table.to_lowercase())
}

/// The three mandatory Iceberg clauses closing a `CREATE ICEBERG TABLE`.
pub fn iceberg_trailer(config: &ConversionConfig, schema: Option<&str>, table: &str) -> Vec<String> {
    vec![
        "CATALOG = 'SNOWFLAKE'".to_string(),
        format!("EXTERNAL_VOLUME = '{}'", config.external_volume),
        format!(
            "BASE_LOCATION = '{}'",
            base_location(&config.base_location_pattern, schema, table)
        ),
    ]
}
