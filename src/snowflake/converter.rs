//! Snowflake standard table to Snowflake Managed Iceberg DDL converter.
//!
//! Regular tables are converted. TEMPORARY and TRANSIENT tables have no
//! Iceberg counterpart with the same lifetime semantics and are re-emitted as
//! standard tables. DYNAMIC, EXTERNAL and HYBRID tables are skipped with a
//! comment block and a critical issue.
//!
//! Issues are always recorded; `include_ewi` only controls whether inline
//! markers are written and counted.

use log::{debug, info};
use serde::Serialize;

use super::model::{SnowflakeColumn, SnowflakeTable, SnowflakeTableKind};
use super::parser::SnowflakeParser;
use crate::assessment::{Issue, IssueSeverity};
use crate::codes::snowflake as codes;
use crate::config::ConversionConfig;
use crate::converter::constraint_notes;
use crate::ewi::{format_column_list, format_identifier, format_qualified, iceberg_trailer, marker};

const COLUMN_INDENT: &str = "    ";
const MARKER_INDENT: &str = "        ";

/// Types with no Iceberg equivalent, stored as VARCHAR instead.
const VARCHAR_FALLBACKS: &[(&str, &str, &str)] = &[
    (
        "VARIANT",
        codes::VARIANT,
        "VARIANT not supported in Iceberg - converted to VARCHAR. Parse JSON at query time or use structured types",
    ),
    (
        "OBJECT",
        codes::OBJECT,
        "Semi-structured OBJECT not supported in Iceberg - converted to VARCHAR. Use structured OBJECT with defined schema instead",
    ),
    (
        "ARRAY",
        codes::ARRAY,
        "Semi-structured ARRAY not supported in Iceberg - converted to VARCHAR. Use structured ARRAY with defined element type instead",
    ),
    (
        "GEOGRAPHY",
        codes::GEOGRAPHY,
        "GEOGRAPHY not supported in Iceberg - converted to VARCHAR. Store as WKT/GeoJSON string",
    ),
    (
        "GEOMETRY",
        codes::GEOMETRY,
        "GEOMETRY not supported in Iceberg - converted to VARCHAR. Store as WKT/GeoJSON string",
    ),
];

/// Temporal types are pinned to microsecond precision.
const TEMPORAL_TARGETS: &[(&str, &str, &str, &str)] = &[
    (
        "TIME",
        "TIME(6)",
        codes::TIME_PRECISION,
        "TIME precision adjusted to 6 (microseconds) for Iceberg compatibility",
    ),
    (
        "TIMESTAMP",
        "TIMESTAMP_NTZ(6)",
        codes::TIMESTAMP_NTZ_PRECISION,
        "TIMESTAMP precision adjusted to 6 (microseconds) for Iceberg compatibility",
    ),
    (
        "TIMESTAMP_NTZ",
        "TIMESTAMP_NTZ(6)",
        codes::TIMESTAMP_NTZ_PRECISION,
        "TIMESTAMP_NTZ precision adjusted to 6 for Iceberg compatibility",
    ),
    (
        "DATETIME",
        "TIMESTAMP_NTZ(6)",
        codes::TIMESTAMP_NTZ_PRECISION,
        "DATETIME converted to TIMESTAMP_NTZ(6) for Iceberg compatibility",
    ),
    (
        "TIMESTAMP_LTZ",
        "TIMESTAMP_LTZ(6)",
        codes::TIMESTAMP_LTZ_PRECISION,
        "TIMESTAMP_LTZ precision adjusted to 6 for Iceberg compatibility",
    ),
    (
        "TIMESTAMP_TZ",
        "TIMESTAMP_LTZ(6)",
        codes::TIMESTAMP_TZ,
        "TIMESTAMP_TZ converted to TIMESTAMP_LTZ(6) for Iceberg compatibility",
    ),
];

const ICEBERG_PRECISION: u32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnowflakeToIcebergResult {
    pub iceberg_ddl: String,
    pub tables_converted: usize,
    pub ewi_count: usize,
    pub success: bool,
    pub error_message: Option<String>,
    pub issues: Vec<Issue>,
}

/// Output for a single table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConversion {
    pub ddl: String,
    pub ewi_count: usize,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone)]
pub struct SnowflakeToIcebergConverter {
    config: ConversionConfig,
}

impl SnowflakeToIcebergConverter {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn convert(&self, ddl: &str) -> SnowflakeToIcebergResult {
        let tables = SnowflakeParser::new().parse(ddl);
        if tables.is_empty() {
            return SnowflakeToIcebergResult {
                iceberg_ddl: String::new(),
                tables_converted: 0,
                ewi_count: 0,
                success: false,
                error_message: Some("No valid CREATE TABLE statements found".to_string()),
                issues: Vec::new(),
            };
        }

        let mut statements = Vec::with_capacity(tables.len());
        let mut ewi_count = 0;
        let mut issues = Vec::new();
        for table in &tables {
            let output = self.convert_table(table);
            debug!(
                "Converted {} table {} ({} EWI, {} issues)",
                table.kind,
                table.full_name(),
                output.ewi_count,
                output.issues.len()
            );
            ewi_count += output.ewi_count;
            issues.extend(output.issues);
            if !output.ddl.is_empty() {
                statements.push(output.ddl);
            }
        }

        info!(
            "Converted {} Snowflake tables with {} EWI markers",
            tables.len(),
            ewi_count
        );

        SnowflakeToIcebergResult {
            iceberg_ddl: statements.join("\n\n"),
            tables_converted: tables.len(),
            ewi_count,
            success: true,
            error_message: None,
            issues,
        }
    }

    /// Converts one parsed table according to its kind.
    pub fn convert_table(&self, table: &SnowflakeTable) -> TableConversion {
        match table.kind {
            SnowflakeTableKind::Temporary | SnowflakeTableKind::Transient => self.keep_as_standard(table),
            SnowflakeTableKind::Dynamic | SnowflakeTableKind::External | SnowflakeTableKind::Hybrid => {
                self.skip_table(table)
            }
            SnowflakeTableKind::Regular => self.convert_regular(table),
        }
    }

    fn convert_regular(&self, table: &SnowflakeTable) -> TableConversion {
        let full_name = table.full_name();
        let mut lines = Vec::new();
        let mut issues = Vec::new();
        let mut ewi_count = 0;

        if self.config.include_comments {
            lines.push(format!("-- Converted from Snowflake Standard: {}", full_name));
        }
        lines.push(format!(
            "CREATE OR REPLACE ICEBERG TABLE {} (",
            format_qualified(&table.name_parts())
        ));

        let pk = table.primary_key();
        for (idx, col) in table.columns.iter().enumerate() {
            let (definition, col_issues, markers) = self.convert_column(col, &full_name);
            let last = idx + 1 == table.columns.len() && pk.is_none();
            let separator = if last { "" } else { "," };
            lines.push(format!("{}{}{}", COLUMN_INDENT, definition, separator));
            ewi_count += markers.len();
            lines.extend(markers.into_iter().map(|m| format!("{}{}", MARKER_INDENT, m)));
            issues.extend(col_issues);
        }
        if let Some(pk) = pk {
            lines.push(format!(
                "{}PRIMARY KEY ({})",
                COLUMN_INDENT,
                format_column_list(pk.columns())
            ));
        }
        lines.push(")".to_string());
        lines.extend(iceberg_trailer(
            &self.config,
            table.schema.as_deref(),
            &table.name,
        ));

        issues.extend(table_option_issues(table, &full_name));

        if self.config.include_comments {
            let notes = table_notes(table);
            if !notes.is_empty() {
                lines.push(String::new());
                lines.extend(notes);
            }
        }
        lines.push(";".to_string());

        TableConversion {
            ddl: lines.join("\n"),
            ewi_count,
            issues,
        }
    }

    /// Column definition, its issues, and the markers written after it.
    fn convert_column(&self, col: &SnowflakeColumn, table_name: &str) -> (String, Vec<Issue>, Vec<String>) {
        let mut issues = Vec::new();
        let mut markers = Vec::new();
        let mut record = |issue: Issue, marker_text: Option<String>| {
            if self.config.include_ewi {
                markers.push(marker(&issue.code, marker_text.as_deref().unwrap_or(&issue.message)));
            }
            issues.push(issue.on_table(table_name).on_column(&col.name));
        };

        let fallback = VARCHAR_FALLBACKS
            .iter()
            .find(|(name, _, _)| *name == col.data_type && !col.is_parameterized());
        let temporal = TEMPORAL_TARGETS
            .iter()
            .find(|(name, _, _, _)| *name == col.data_type);

        let target_type = if let Some((_, code, message)) = fallback {
            record(Issue::critical(*code, *message), None);
            "VARCHAR".to_string()
        } else if let Some((_, target, code, message)) = temporal {
            if col.precision.is_some_and(|p| p != ICEBERG_PRECISION) {
                let severity = if *code == codes::TIMESTAMP_TZ {
                    IssueSeverity::Warning
                } else {
                    IssueSeverity::Info
                };
                record(Issue::new(*code, severity, *message), None);
            }
            target.to_string()
        } else {
            col.declared_type()
        };

        let mut definition = format!("{} {}", format_identifier(&col.name), target_type);
        if !col.nullable {
            definition.push_str(" NOT NULL");
        }

        if col.identity.is_some() {
            record(
                Issue::warning(codes::IDENTITY, "IDENTITY/AUTOINCREMENT not supported in Iceberg tables")
                    .with_suggestion("Use application-generated IDs or sequences"),
                None,
            );
        }
        if let Some(policy) = &col.masking_policy {
            let message = "Masking policies need to be re-applied after conversion";
            record(
                Issue::warning(codes::MASKING_POLICY, message)
                    .with_suggestion(format!("Re-apply masking policy {} after conversion", policy)),
                Some(format!("{}: {}", message, policy)),
            );
        }
        if let Some(collate) = &col.collate {
            let message = "COLLATE clause not supported in Iceberg tables";
            record(
                Issue::info(codes::COLLATE, message),
                Some(format!("{}: {}", message, collate)),
            );
        }

        (definition, issues, markers)
    }

    fn keep_as_standard(&self, table: &SnowflakeTable) -> TableConversion {
        let label = table.kind.label();
        let (code, reason, detail, suggestion) = match table.kind {
            SnowflakeTableKind::Transient => (
                codes::TRANSIENT_KEPT,
                "Iceberg tables always have durability (no transient option)",
                "The table will remain without Fail-safe as originally intended",
                "Table will remain transient (no Fail-safe). Consider if transient behavior is needed or if Iceberg durability is acceptable.",
            ),
            _ => (
                codes::TEMPORARY_KEPT,
                "Iceberg does not support temporary tables",
                "The table will remain session-scoped as originally intended",
                "Table will remain session-scoped. Consider if temporary table is needed in target architecture.",
            ),
        };

        let mut lines = Vec::new();
        if self.config.include_comments {
            lines.push(format!(
                "-- {} table kept as Snowflake Standard (not converted to Iceberg)",
                label
            ));
            lines.push(format!("-- Reason: {}", reason));
            lines.push(format!("-- {}", detail));
        }
        lines.push(format!(
            "CREATE OR REPLACE {} TABLE {} (",
            label,
            format_qualified(&table.name_parts())
        ));

        let pk = table.primary_key();
        for (idx, col) in table.columns.iter().enumerate() {
            let last = idx + 1 == table.columns.len() && pk.is_none();
            let separator = if last { "" } else { "," };
            lines.push(format!("{}{}{}", COLUMN_INDENT, standard_column(col), separator));
        }
        if let Some(pk) = pk {
            lines.push(format!(
                "{}PRIMARY KEY ({})",
                COLUMN_INDENT,
                format_column_list(pk.columns())
            ));
        }
        lines.push(");".to_string());

        let issue = Issue::info(
            code,
            format!("{} table kept as Snowflake Standard - {}", label, reason),
        )
        .on_table(table.full_name())
        .with_suggestion(suggestion);

        TableConversion {
            ddl: lines.join("\n"),
            ewi_count: 0,
            issues: vec![issue],
        }
    }

    fn skip_table(&self, table: &SnowflakeTable) -> TableConversion {
        let label = table.kind.label();
        let (code, reason) = match table.kind {
            SnowflakeTableKind::Dynamic => (
                codes::DYNAMIC_SKIPPED,
                "Dynamic tables auto-refresh from a query and cannot be converted to Iceberg. \
                 Consider creating the underlying source tables as Iceberg instead.",
            ),
            SnowflakeTableKind::External => (
                codes::EXTERNAL_SKIPPED,
                "External tables reference data in external stages. \
                 Consider using Iceberg tables with the same external volume instead.",
            ),
            _ => (
                codes::HYBRID_SKIPPED,
                "Hybrid tables are optimized for HTAP workloads. \
                 Iceberg tables have different performance characteristics for mixed workloads.",
            ),
        };
        let full_name = table.full_name();

        let mut lines = Vec::new();
        if self.config.include_comments {
            lines.push(format!("-- !!!! {} TABLE SKIPPED - Cannot convert to Iceberg !!!!", label));
            lines.push(format!("-- Table: {}", full_name));
            lines.push(format!("-- Reason: {}", reason));
            lines.push("-- Action required: Review and handle this table manually".to_string());
        }

        let issue = Issue::critical(
            code,
            format!("{} table cannot be converted to Iceberg: {}", label, full_name),
        )
        .on_table(&full_name)
        .with_suggestion(reason);

        // The skip itself counts as one item to resolve.
        TableConversion {
            ddl: lines.join("\n"),
            ewi_count: 1,
            issues: vec![issue],
        }
    }
}

/// Column for a re-emitted standard table; keeps the original clauses.
fn standard_column(col: &SnowflakeColumn) -> String {
    let mut parts = vec![format_identifier(&col.name), col.declared_type()];
    if let Some(collate) = &col.collate {
        parts.push(format!("COLLATE {}", sql_literal(collate)));
    }
    if let Some(default) = &col.default {
        parts.push(format!("DEFAULT {}", default));
    }
    if let Some(identity) = &col.identity {
        let (start, step) = identity.split_once(',').unwrap_or(("1", "1"));
        parts.push(format!("AUTOINCREMENT START {} INCREMENT {}", start, step));
    }
    if !col.nullable {
        parts.push("NOT NULL".to_string());
    }
    if let Some(policy) = &col.masking_policy {
        parts.push(format!("WITH MASKING POLICY {}", policy));
    }
    if let Some(comment) = &col.comment {
        parts.push(format!("COMMENT {}", sql_literal(comment)));
    }
    parts.join(" ")
}

fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Informational issues for table options Iceberg has no use for.
fn table_option_issues(table: &SnowflakeTable, full_name: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    if table.is_clustered() {
        issues.push(
            Issue::info(
                codes::CLUSTER_BY,
                "CLUSTER BY not directly supported - Iceberg uses different optimization",
            )
            .on_table(full_name)
            .with_suggestion("Consider Iceberg table optimization strategies"),
        );
    }
    if table.data_retention_days.is_some() {
        issues.push(
            Issue::info(
                codes::DATA_RETENTION,
                "DATA_RETENTION_TIME_IN_DAYS not applicable to Iceberg tables",
            )
            .on_table(full_name),
        );
    }
    if table.change_tracking {
        issues.push(
            Issue::info(codes::CHANGE_TRACKING, "CHANGE_TRACKING not applicable to Iceberg tables")
                .on_table(full_name),
        );
    }
    issues
}

fn table_notes(table: &SnowflakeTable) -> Vec<String> {
    let mut notes = Vec::new();
    if table.is_clustered() {
        notes.push(format!("-- Original CLUSTER BY: ({})", table.cluster_by.join(", ")));
        notes.push("-- NOTE: Iceberg uses automatic optimization instead of explicit clustering".to_string());
    }
    if let Some(days) = table.data_retention_days {
        notes.push(format!("-- Original DATA_RETENTION_TIME_IN_DAYS: {}", days));
    }
    if table.change_tracking {
        notes.push("-- Original CHANGE_TRACKING: TRUE".to_string());
    }
    for constraint in &table.constraints {
        notes.extend(constraint_notes(constraint));
    }
    if let Some(comment) = &table.comment {
        notes.push(format!("-- Table comment: {}", comment));
    }
    notes
}
