//! DB2 to Snowflake Managed Iceberg DDL converter.
//!
//! Every parsed table produces output. Regular tables become
//! `CREATE OR REPLACE ICEBERG TABLE`; VOLATILE and GLOBAL TEMPORARY tables
//! have no Iceberg equivalent and are kept as Snowflake `TEMPORARY` tables.

use log::{debug, info};
use serde::Serialize;

use crate::assessment::{AssessmentReport, Assessor};
use crate::codes::db2 as codes;
use crate::config::ConversionConfig;
use crate::db2::{Db2Column, Db2Parser, TableDefinition};
use crate::ewi::{format_column_list, format_identifier, format_qualified, iceberg_trailer, marker};
use crate::mapper::map_type;
use crate::model::{Constraint, ConstraintKind};

const COLUMN_INDENT: &str = "    ";
const MARKER_INDENT: &str = "        ";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub iceberg_ddl: String,
    pub assessment: AssessmentReport,
    /// Number of EWI markers written into `iceberg_ddl`.
    pub ewi_count: usize,
    pub tables_converted: usize,
    pub success: bool,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Db2IceConverter {
    config: ConversionConfig,
}

/// Generated text for one table plus the markers it contains.
struct TableOutput {
    ddl: String,
    ewi_count: usize,
}

impl Db2IceConverter {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Converts every table in `ddl`. The assessment is always computed,
    /// even when nothing converts.
    pub fn convert(&self, ddl: &str) -> ConversionResult {
        let tables = Db2Parser::new().parse(ddl);
        let assessment = Assessor::new().assess_tables(&tables);

        if tables.is_empty() {
            return ConversionResult {
                iceberg_ddl: String::new(),
                assessment,
                ewi_count: 0,
                tables_converted: 0,
                success: false,
                error_message: Some("No valid CREATE TABLE statements found".to_string()),
            };
        }

        let mut statements = Vec::with_capacity(tables.len());
        let mut ewi_count = 0;
        for table in &tables {
            let output = self.convert_table(table);
            debug!(
                "Converted {} ({} EWI markers)",
                table.full_name(),
                output.ewi_count
            );
            ewi_count += output.ewi_count;
            statements.push(output.ddl);
        }

        info!(
            "Converted {} DB2 tables with {} EWI markers",
            tables.len(),
            ewi_count
        );

        ConversionResult {
            iceberg_ddl: statements.join("\n\n"),
            assessment,
            ewi_count,
            tables_converted: tables.len(),
            success: true,
            error_message: None,
        }
    }

    fn convert_table(&self, table: &TableDefinition) -> TableOutput {
        if table.kind.is_session_scoped() {
            return self.convert_session_table(table);
        }

        let mut lines = Vec::new();
        if self.config.include_comments {
            lines.push(format!("-- Converted from DB2: {}", table.full_name()));
            if let Some(editproc) = &table.editproc {
                lines.push(format!("-- WARNING: Original table had EDITPROC: {}", editproc));
            }
            if let Some(validproc) = &table.validproc {
                lines.push(format!("-- WARNING: Original table had VALIDPROC: {}", validproc));
            }
        }

        lines.push(format!(
            "CREATE OR REPLACE ICEBERG TABLE {} (",
            table_identifier(table)
        ));
        let ewi_count = self.push_body(table, &mut lines);
        lines.push(")".to_string());
        lines.extend(iceberg_trailer(
            &self.config,
            table.schema.as_deref(),
            &table.name,
        ));

        if self.config.include_comments {
            let notes = table_notes(table);
            if !notes.is_empty() {
                lines.push(String::new());
                lines.extend(notes);
            }
        }
        lines.push(";".to_string());

        TableOutput {
            ddl: lines.join("\n"),
            ewi_count,
        }
    }

    fn convert_session_table(&self, table: &TableDefinition) -> TableOutput {
        let label = table.kind.label();
        let mut lines = Vec::new();
        if self.config.include_comments {
            lines.push(format!(
                "-- Converted from DB2 {} table: {}",
                label,
                table.full_name()
            ));
            lines.push(
                "-- Kept as Snowflake TEMPORARY (Iceberg doesn't support temporary tables)".to_string(),
            );
            lines.push("-- Table will remain session-scoped as originally intended".to_string());
        }

        lines.push(format!(
            "CREATE OR REPLACE TEMPORARY TABLE {} (",
            table_identifier(table)
        ));
        let mut ewi_count = self.push_body(table, &mut lines);
        lines.push(");".to_string());

        if self.config.include_ewi {
            lines.push(String::new());
            lines.push(format!(
                "-- {}",
                marker(
                    codes::SESSION_TABLE_KEPT,
                    &format!(
                        "{} table kept as Snowflake TEMPORARY - Iceberg doesn't support temporary tables",
                        label
                    ),
                )
            ));
            ewi_count += 1;
        }

        TableOutput {
            ddl: lines.join("\n"),
            ewi_count,
        }
    }

    /// Column lines followed by the PRIMARY KEY line. Returns the number of
    /// markers written.
    fn push_body(&self, table: &TableDefinition, lines: &mut Vec<String>) -> usize {
        let pk = table.primary_key();
        let mut ewi_count = 0;

        for (idx, col) in table.columns.iter().enumerate() {
            let (definition, markers) = self.convert_column(col);
            let last = idx + 1 == table.columns.len() && pk.is_none();
            let separator = if last { "" } else { "," };
            lines.push(format!("{}{}{}", COLUMN_INDENT, definition, separator));
            ewi_count += markers.len();
            lines.extend(markers.into_iter().map(|m| format!("{}{}", MARKER_INDENT, m)));
        }

        if let Some(pk) = pk {
            lines.push(format!(
                "{}PRIMARY KEY ({})",
                COLUMN_INDENT,
                format_column_list(pk.columns())
            ));
        }
        ewi_count
    }

    /// Column definition text and the EWI markers that follow it.
    fn convert_column(&self, col: &Db2Column) -> (String, Vec<String>) {
        let mapping = map_type(
            &col.data_type,
            col.length,
            col.precision,
            col.scale,
            col.for_bit_data,
            col.ccsid.as_deref(),
        );

        let mut definition = format!("{} {}", format_identifier(&col.name), mapping.target_type);
        if !col.nullable {
            definition.push_str(" NOT NULL");
        }

        let mut markers = Vec::new();
        if self.config.include_ewi {
            if let (true, Some(code)) = (mapping.needs_marker(), mapping.ewi_code) {
                markers.push(marker(code, mapping.ewi_message.as_deref().unwrap_or_default()));
            }
            if let Some(fieldproc) = &col.fieldproc {
                markers.push(marker(
                    codes::FIELDPROC,
                    &format!("FIELDPROC {} - data may be encrypted/transformed", fieldproc),
                ));
            }
            if col.generated.is_generated() {
                markers.push(marker(
                    codes::GENERATED_COLUMN,
                    &format!("GENERATED {} not supported in Iceberg", col.generated.as_sql()),
                ));
            }
        }
        (definition, markers)
    }
}

fn table_identifier(table: &TableDefinition) -> String {
    match &table.schema {
        Some(schema) => format_qualified(&[schema.as_str(), table.name.as_str()]),
        None => format_identifier(&table.name),
    }
}

/// Documentation comments for what the Iceberg table cannot carry.
fn table_notes(table: &TableDefinition) -> Vec<String> {
    let mut notes = Vec::new();
    for constraint in &table.constraints {
        notes.extend(constraint_notes(constraint));
    }
    if let Some(partition) = &table.partition {
        notes.push(format!("-- Original partitioning: {}", partition.raw));
        notes.push("-- NOTE: Iceberg uses automatic partitioning; DB2 partitioning removed".to_string());
    }
    if let Some(tablespace) = &table.tablespace {
        notes.push(format!("-- Original tablespace: {}", tablespace));
    }
    if let Some(audit) = &table.audit {
        notes.push(format!("-- Original AUDIT {} setting not carried over", audit));
    }
    if let Some(data_capture) = &table.data_capture {
        notes.push(format!(
            "-- Original DATA CAPTURE {} setting not carried over",
            data_capture
        ));
    }
    notes
}

pub(crate) fn constraint_notes(constraint: &Constraint) -> Vec<String> {
    let name = constraint
        .name
        .as_ref()
        .map(|n| format!(" {}", n))
        .unwrap_or_default();
    match &constraint.kind {
        ConstraintKind::PrimaryKey { .. } => Vec::new(),
        ConstraintKind::ForeignKey {
            columns,
            references,
            referenced_columns,
        } => vec![
            format!(
                "-- FOREIGN KEY{}: ({}) REFERENCES {}({})",
                name,
                columns.join(", "),
                references,
                referenced_columns.join(", ")
            ),
            "-- NOTE: Foreign keys are not enforced in Iceberg tables".to_string(),
        ],
        ConstraintKind::Unique { columns } => vec![
            format!("-- UNIQUE{}: ({})", name, columns.join(", ")),
            "-- NOTE: UNIQUE constraints are not enforced in Iceberg tables".to_string(),
        ],
        ConstraintKind::Check { condition } => vec![
            format!("-- CHECK{}: {}", name, condition),
            "-- NOTE: CHECK constraints are not enforced in Iceberg tables".to_string(),
        ],
    }
}
