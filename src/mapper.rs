//! DB2 to Iceberg type mapping.
//!
//! [`map_type`] is a pure function of its inputs. The size thresholds are
//! fixed Iceberg limits and are not configurable.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::codes::db2 as codes;

const MB: u64 = 1024 * 1024;
/// Largest VARCHAR length kept as-is.
pub const MAX_VARCHAR_LENGTH: u64 = 16 * MB;
/// Largest BINARY/VARBINARY length kept as-is.
pub const MAX_BINARY_LENGTH: u64 = 8 * MB;
/// LOBs above this size may be truncated.
pub const MAX_LOB_LENGTH: u64 = 128 * MB;
pub const MAX_DECIMAL_PRECISION: u32 = 38;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStatus {
    /// Same semantics on both sides.
    Direct,
    /// Converts with a behavioral difference worth noting.
    Compatible,
    /// Values may lose precision or be truncated.
    Lossy,
    /// No faithful target; needs manual work.
    Unsupported,
}

impl ConversionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionStatus::Direct => "direct",
            ConversionStatus::Compatible => "compatible",
            ConversionStatus::Lossy => "lossy",
            ConversionStatus::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeMapping {
    pub source_type: String,
    pub target_type: String,
    pub status: ConversionStatus,
    pub ewi_code: Option<&'static str>,
    pub ewi_message: Option<String>,
    pub notes: Option<String>,
}

impl TypeMapping {
    fn new(source: &str, target: impl Into<String>, status: ConversionStatus) -> Self {
        Self {
            source_type: source.to_string(),
            target_type: target.into(),
            status,
            ewi_code: None,
            ewi_message: None,
            notes: None,
        }
    }

    fn direct(source: &str, target: impl Into<String>) -> Self {
        Self::new(source, target, ConversionStatus::Direct)
    }

    fn with_ewi(mut self, code: &'static str, message: impl Into<String>) -> Self {
        self.ewi_code = Some(code);
        self.ewi_message = Some(message.into());
        self
    }

    fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes = Some(note.into());
        self
    }

    /// True when the mapping must be flagged inline in generated DDL.
    pub fn needs_marker(&self) -> bool {
        matches!(self.status, ConversionStatus::Lossy | ConversionStatus::Unsupported)
    }
}

/// Maps a DB2 column type to its Iceberg target.
///
/// `FOR BIT DATA` overrides the declared type entirely. Types are expected
/// upper-cased with single spaces, as the DB2 parser produces them.
pub fn map_type(
    type_name: &str,
    length: Option<u64>,
    precision: Option<u32>,
    scale: Option<u32>,
    for_bit_data: bool,
    ccsid: Option<&str>,
) -> TypeMapping {
    let source = describe_source(type_name, length, precision, scale, ccsid);

    if for_bit_data {
        return TypeMapping::new(
            &source,
            format!("BINARY({})", length.unwrap_or(1)),
            ConversionStatus::Compatible,
        )
        .with_ewi(codes::FOR_BIT_DATA, "FOR BIT DATA converted to BINARY type");
    }

    if let Some(target) = direct_target(type_name) {
        return TypeMapping::direct(&source, target);
    }

    match type_name {
        "CHAR" | "CHARACTER" => TypeMapping::new(
            &source,
            format!("VARCHAR({})", length.unwrap_or(1)),
            ConversionStatus::Compatible,
        )
        .with_ewi(
            codes::CHAR_TO_VARCHAR,
            "CHAR converted to VARCHAR - Iceberg does not support fixed-length CHAR",
        )
        .with_note("Padding behavior may differ"),

        "VARCHAR" | "CHAR VARYING" | "CHARACTER VARYING" => match length {
            Some(len) if len > MAX_VARCHAR_LENGTH => {
                TypeMapping::new(&source, "VARCHAR", ConversionStatus::Lossy).with_ewi(
                    codes::SIZE_LIMIT,
                    format!("VARCHAR({}) exceeds Iceberg limit, using VARCHAR without length", len),
                )
            }
            Some(len) => TypeMapping::direct(&source, format!("VARCHAR({})", len)),
            None => TypeMapping::direct(&source, "VARCHAR"),
        },

        "LONG VARCHAR" => TypeMapping::new(&source, "VARCHAR", ConversionStatus::Compatible)
            .with_ewi(codes::LONG_VARCHAR, "LONG VARCHAR converted to VARCHAR"),

        "CLOB" => match length {
            Some(len) if len > MAX_LOB_LENGTH => lob_truncation(&source, "VARCHAR", "CLOB", len),
            _ => TypeMapping::new(&source, "VARCHAR", ConversionStatus::Compatible)
                .with_note("CLOB converted to VARCHAR"),
        },

        "DECIMAL" | "DEC" | "NUMERIC" => {
            let p = precision.unwrap_or(5);
            let s = scale.unwrap_or(0);
            if p > MAX_DECIMAL_PRECISION {
                TypeMapping::new(
                    &source,
                    format!("NUMBER({},{})", MAX_DECIMAL_PRECISION, s.min(MAX_DECIMAL_PRECISION - 1)),
                    ConversionStatus::Lossy,
                )
                .with_ewi(
                    codes::PRECISION_ADJUSTED,
                    format!("Precision {} exceeds maximum 38, adjusted to 38", p),
                )
            } else {
                TypeMapping::direct(&source, format!("NUMBER({},{})", p, s))
            }
        }

        "FLOAT" => match precision {
            Some(p) if p > 24 => TypeMapping::direct(&source, "DOUBLE"),
            _ => TypeMapping::direct(&source, "FLOAT"),
        },

        "DECFLOAT" => TypeMapping::new(&source, "DOUBLE", ConversionStatus::Lossy).with_ewi(
            codes::DECFLOAT_PRECISION,
            "DECFLOAT converted to DOUBLE - decimal floating point precision may be lost",
        ),

        "TIME" => {
            let p = precision.unwrap_or(0);
            if p != 6 {
                TypeMapping::new(&source, "TIME(6)", ConversionStatus::Compatible).with_ewi(
                    codes::TIME_PRECISION,
                    format!("TIME precision adjusted from {} to 6 (microseconds)", p),
                )
            } else {
                TypeMapping::direct(&source, "TIME(6)")
            }
        }

        "TIMESTAMP" => {
            let p = precision.unwrap_or(6);
            if p != 6 {
                TypeMapping::new(&source, "TIMESTAMP_NTZ(6)", ConversionStatus::Compatible).with_ewi(
                    codes::TIMESTAMP_PRECISION,
                    format!("TIMESTAMP precision adjusted from {} to 6 (microseconds)", p),
                )
            } else {
                TypeMapping::direct(&source, "TIMESTAMP_NTZ(6)")
            }
        }

        "BINARY" | "VARBINARY" | "BINARY VARYING" => {
            let target = if type_name == "BINARY" { "BINARY" } else { "VARBINARY" };
            match length {
                Some(len) if len > MAX_BINARY_LENGTH => {
                    TypeMapping::new(&source, target, ConversionStatus::Lossy).with_ewi(
                        codes::SIZE_LIMIT,
                        format!("{}({}) exceeds Iceberg limit", target, len),
                    )
                }
                Some(len) => TypeMapping::direct(&source, format!("{}({})", target, len)),
                None => TypeMapping::direct(&source, target),
            }
        }

        "BLOB" => match length {
            Some(len) if len > MAX_LOB_LENGTH => lob_truncation(&source, "BINARY", "BLOB", len),
            _ => TypeMapping::new(&source, "BINARY", ConversionStatus::Compatible)
                .with_ewi(codes::BLOB_TO_BINARY, "BLOB converted to BINARY"),
        },

        "GRAPHIC" | "VARGRAPHIC" => {
            // Up to four UTF-8 bytes per double-byte character.
            let bytes = length.map(|n| n.checked_mul(4).filter(|b| *b <= MAX_VARCHAR_LENGTH));
            match bytes {
                Some(None) => TypeMapping::new(&source, "VARCHAR", ConversionStatus::Lossy).with_ewi(
                    codes::SIZE_LIMIT,
                    format!(
                        "{}({}) exceeds Iceberg limit, using VARCHAR without length",
                        type_name,
                        length.unwrap_or_default()
                    ),
                ),
                _ => {
                    let target = bytes
                        .flatten()
                        .map_or_else(|| "VARCHAR".to_string(), |b| format!("VARCHAR({})", b));
                    TypeMapping::new(&source, target, ConversionStatus::Compatible).with_ewi(
                        codes::GRAPHIC_ENCODING,
                        format!("{} converted to VARCHAR - verify double-byte character encoding", type_name),
                    )
                }
            }
        }

        "LONG VARGRAPHIC" => TypeMapping::new(&source, "VARCHAR", ConversionStatus::Compatible)
            .with_ewi(
                codes::GRAPHIC_ENCODING,
                "LONG VARGRAPHIC converted to VARCHAR - verify double-byte character encoding",
            ),

        "DBCLOB" => match length {
            Some(len) if len > MAX_LOB_LENGTH => lob_truncation(&source, "VARCHAR", "DBCLOB", len),
            _ => TypeMapping::new(&source, "VARCHAR", ConversionStatus::Compatible).with_ewi(
                codes::GRAPHIC_ENCODING,
                "DBCLOB converted to VARCHAR - verify double-byte character encoding",
            ),
        },

        "XML" => TypeMapping::new(&source, "VARCHAR", ConversionStatus::Unsupported)
            .with_ewi(
                codes::XML_UNSUPPORTED,
                "XML type not supported in Iceberg tables - manual conversion required",
            )
            .with_note("Consider extracting XML data into relational columns"),

        "ROWID" => TypeMapping::new(&source, "VARCHAR(40)", ConversionStatus::Lossy).with_ewi(
            codes::ROWID,
            "ROWID converted to VARCHAR - values will not be preserved during migration",
        ),

        other => TypeMapping::new(&source, "VARCHAR", ConversionStatus::Lossy).with_ewi(
            codes::UNKNOWN_TYPE,
            format!("Unknown DB2 type {} converted to VARCHAR", other),
        ),
    }
}

fn direct_target(type_name: &str) -> Option<&'static str> {
    Some(match type_name {
        "SMALLINT" => "SMALLINT",
        "INTEGER" | "INT" => "INTEGER",
        "BIGINT" => "BIGINT",
        "REAL" => "FLOAT",
        "DOUBLE" => "DOUBLE",
        "DATE" => "DATE",
        "BOOLEAN" => "BOOLEAN",
        _ => return None,
    })
}

fn lob_truncation(source: &str, target: &str, kind: &str, len: u64) -> TypeMapping {
    TypeMapping::new(source, target, ConversionStatus::Lossy).with_ewi(
        codes::SIZE_LIMIT,
        format!("{} size {} exceeds Snowflake 128MB limit - data truncation may occur", kind, len),
    )
}

fn describe_source(
    type_name: &str,
    length: Option<u64>,
    precision: Option<u32>,
    scale: Option<u32>,
    ccsid: Option<&str>,
) -> String {
    let mut source = type_name.to_string();
    match (precision, scale) {
        (Some(p), Some(s)) => source.push_str(&format!("({},{})", p, s)),
        _ => {
            if let Some(len) = length {
                source.push_str(&format!("({})", len));
            }
        }
    }
    if let Some(ccsid) = ccsid {
        source.push_str(&format!(" CCSID {}", ccsid));
    }
    source
}

/// Category -> source type -> target type summary, for documentation output.
pub fn mapping_matrix() -> BTreeMap<&'static str, BTreeMap<&'static str, &'static str>> {
    let rows: &[(&str, &[(&str, &str)])] = &[
        (
            "numeric",
            &[
                ("SMALLINT", "SMALLINT"),
                ("INTEGER", "INTEGER"),
                ("BIGINT", "BIGINT"),
                ("DECIMAL(p,s)", "NUMBER(p,s) (p <= 38)"),
                ("REAL", "FLOAT"),
                ("DOUBLE", "DOUBLE"),
                ("FLOAT(p)", "FLOAT (p <= 24) / DOUBLE"),
                ("DECFLOAT", "DOUBLE (lossy)"),
            ],
        ),
        (
            "character",
            &[
                ("CHAR(n)", "VARCHAR(n)"),
                ("VARCHAR(n)", "VARCHAR(n) (n <= 16MB)"),
                ("LONG VARCHAR", "VARCHAR"),
                ("CLOB(n)", "VARCHAR (n <= 128MB)"),
            ],
        ),
        (
            "graphic",
            &[
                ("GRAPHIC(n)", "VARCHAR(4n)"),
                ("VARGRAPHIC(n)", "VARCHAR(4n)"),
                ("LONG VARGRAPHIC", "VARCHAR"),
                ("DBCLOB(n)", "VARCHAR"),
            ],
        ),
        (
            "binary",
            &[
                ("BINARY(n)", "BINARY(n) (n <= 8MB)"),
                ("VARBINARY(n)", "VARBINARY(n) (n <= 8MB)"),
                ("BLOB(n)", "BINARY"),
                ("CHAR(n) FOR BIT DATA", "BINARY(n)"),
            ],
        ),
        (
            "datetime",
            &[
                ("DATE", "DATE"),
                ("TIME", "TIME(6)"),
                ("TIMESTAMP(p)", "TIMESTAMP_NTZ(6)"),
            ],
        ),
        (
            "special",
            &[
                ("BOOLEAN", "BOOLEAN"),
                ("XML", "VARCHAR (unsupported)"),
                ("ROWID", "VARCHAR(40) (lossy)"),
            ],
        ),
    ];

    rows.iter()
        .map(|(category, entries)| (*category, entries.iter().copied().collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(type_name: &str, length: Option<u64>, precision: Option<u32>, scale: Option<u32>) -> TypeMapping {
        map_type(type_name, length, precision, scale, false, None)
    }

    #[test]
    fn test_direct_types() {
        for (src, target) in [("INT", "INTEGER"), ("REAL", "FLOAT"), ("BIGINT", "BIGINT")] {
            let m = map(src, None, None, None);
            assert_eq!(m.target_type, target);
            assert_eq!(m.status, ConversionStatus::Direct);
            assert!(m.ewi_code.is_none());
        }
    }

    #[test]
    fn test_for_bit_data_overrides_type() {
        let m = map_type("VARCHAR", Some(16), Some(16), None, true, None);
        assert_eq!(m.target_type, "BINARY(16)");
        assert_eq!(m.status, ConversionStatus::Compatible);
        assert_eq!(m.ewi_code, Some(codes::FOR_BIT_DATA));
    }

    #[test]
    fn test_char_defaults_to_length_one() {
        let m = map("CHAR", None, None, None);
        assert_eq!(m.target_type, "VARCHAR(1)");
        assert_eq!(m.notes.as_deref(), Some("Padding behavior may differ"));
    }

    #[test]
    fn test_decimal_precision_clamp() {
        let m = map("DECIMAL", Some(40), Some(40), Some(38));
        assert_eq!(m.target_type, "NUMBER(38,37)");
        assert_eq!(m.status, ConversionStatus::Lossy);
        assert_eq!(m.ewi_code, Some(codes::PRECISION_ADJUSTED));

        let d = map("DEC", None, None, None);
        assert_eq!(d.target_type, "NUMBER(5,0)");
        assert_eq!(d.status, ConversionStatus::Direct);
    }

    #[test]
    fn test_time_and_timestamp_defaults_differ() {
        let time = map("TIME", None, None, None);
        assert_eq!(time.status, ConversionStatus::Compatible);
        assert_eq!(time.ewi_code, Some(codes::TIME_PRECISION));

        let ts = map("TIMESTAMP", None, None, None);
        assert_eq!(ts.status, ConversionStatus::Direct);
        assert_eq!(ts.target_type, "TIMESTAMP_NTZ(6)");
    }

    #[test]
    fn test_unknown_type_falls_back_to_varchar() {
        let m = map("MYTYPE", None, None, None);
        assert_eq!(m.target_type, "VARCHAR");
        assert_eq!(m.status, ConversionStatus::Lossy);
        assert_eq!(m.ewi_code, Some(codes::UNKNOWN_TYPE));
    }

    #[test]
    fn test_source_description() {
        assert_eq!(map("DECIMAL", Some(10), Some(10), Some(2)).source_type, "DECIMAL(10,2)");
        assert_eq!(map("VARCHAR", Some(20), Some(20), None).source_type, "VARCHAR(20)");
        let m = map_type("CHAR", Some(3), Some(3), None, false, Some("1208"));
        assert_eq!(m.source_type, "CHAR(3) CCSID 1208");
    }

    #[test]
    fn test_graphic_length_in_utf8_bytes() {
        let m = map("VARGRAPHIC", Some(100), Some(100), None);
        assert_eq!(m.target_type, "VARCHAR(400)");
        assert_eq!(m.status, ConversionStatus::Compatible);
        assert_eq!(m.ewi_code, Some(codes::GRAPHIC_ENCODING));
    }

    #[test]
    fn test_oversized_graphic_drops_length() {
        for len in [MAX_VARCHAR_LENGTH, u64::MAX] {
            let m = map_type("GRAPHIC", Some(len), None, None, false, None);
            assert_eq!(m.target_type, "VARCHAR");
            assert_eq!(m.status, ConversionStatus::Lossy);
            assert_eq!(m.ewi_code, Some(codes::SIZE_LIMIT));
        }
    }

    #[test]
    fn test_mapping_matrix_categories() {
        let matrix = mapping_matrix();
        assert_eq!(matrix.len(), 6);
        assert_eq!(matrix["character"]["CHAR(n)"], "VARCHAR(n)");
    }
}
