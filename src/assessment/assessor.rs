//! DB2 migration-readiness assessor.

use log::{debug, info};
use std::collections::BTreeMap;

use super::report::{AssessmentReport, Issue, TableAssessment, TableDisposition, ReadinessLevel};
use super::scoring::{clamp_score, total_penalty};
use crate::codes::db2 as codes;
use crate::db2::{Db2Parser, PartitionKind, TableDefinition};
use crate::mapper::{map_type, ConversionStatus};
use crate::model::ConstraintKind;

const FEATURE_KEYS: &[&str] = &[
    "editproc",
    "validproc",
    "fieldproc",
    "partitioning",
    "generated_columns",
    "foreign_keys",
    "check_constraints",
    "xml_columns",
    "graphic_columns",
    "lob_columns",
];

/// Scores DB2 tables for Iceberg conversion.
#[derive(Debug, Default, Clone, Copy)]
pub struct Assessor;

impl Assessor {
    pub fn new() -> Self {
        Self
    }

    /// Parses `ddl` and assesses every table found.
    pub fn assess(&self, ddl: &str) -> AssessmentReport {
        let tables = Db2Parser::new().parse(ddl);
        self.assess_tables(&tables)
    }

    /// Assesses already-parsed tables.
    pub fn assess_tables(&self, tables: &[TableDefinition]) -> AssessmentReport {
        if tables.is_empty() {
            info!("Assessment found no table definitions");
            return AssessmentReport::no_tables(codes::NO_TABLES);
        }

        let assessments = tables.iter().map(assess_table).collect();
        let report = AssessmentReport::from_tables(assessments, features_used(tables));
        info!(
            "Assessed {} tables: overall {:.1} ({}), {} critical, {} warnings",
            report.tables_total,
            report.overall_score,
            report.overall_level,
            report.critical_issues.len(),
            report.warnings.len()
        );
        report
    }
}

/// Issues for one table, in column, constraint, table-option order.
pub fn table_issues(table: &TableDefinition) -> Vec<Issue> {
    let full_name = table.full_name();
    let mut issues = Vec::new();

    for col in &table.columns {
        let mapping = map_type(
            &col.data_type,
            col.length,
            col.precision,
            col.scale,
            col.for_bit_data,
            col.ccsid.as_deref(),
        );
        let mapping_issue = match (mapping.status, mapping.ewi_code) {
            (ConversionStatus::Unsupported, code) => Some(
                Issue::critical(
                    code.unwrap_or(codes::UNKNOWN_TYPE),
                    mapping
                        .ewi_message
                        .clone()
                        .unwrap_or_else(|| format!("Unsupported type: {}", col.data_type)),
                )
                .with_suggestion("Manual conversion required - consider alternative data model"),
            ),
            (ConversionStatus::Lossy, code) => Some(
                Issue::warning(
                    code.unwrap_or(codes::UNKNOWN_TYPE),
                    mapping
                        .ewi_message
                        .clone()
                        .unwrap_or_else(|| format!("Lossy conversion: {}", col.data_type)),
                )
                .with_suggestion("Review data to ensure no precision/data loss"),
            ),
            (ConversionStatus::Compatible, Some(code)) => Some(Issue::info(
                code,
                mapping.ewi_message.clone().unwrap_or_default(),
            )),
            _ => None,
        };
        if let Some(issue) = mapping_issue {
            issues.push(issue.on_table(&full_name).on_column(&col.name));
        }

        if let Some(ccsid) = &col.ccsid {
            issues.push(
                Issue::info(codes::CCSID, format!("CCSID {} - verify character encoding after conversion", ccsid))
                    .on_table(&full_name)
                    .on_column(&col.name)
                    .with_suggestion("Iceberg stores character data as UTF-8"),
            );
        }

        if let Some(fieldproc) = &col.fieldproc {
            issues.push(
                Issue::critical(
                    codes::FIELDPROC,
                    format!("FIELDPROC {} - column data may be encrypted/transformed", fieldproc),
                )
                .on_table(&full_name)
                .on_column(&col.name)
                .with_suggestion("Review FIELDPROC logic - data transformation required before migration"),
            );
        }

        if col.generated.is_generated() {
            issues.push(
                Issue::warning(
                    codes::GENERATED_COLUMN,
                    format!(
                        "GENERATED {} column - Iceberg does not support generated columns",
                        col.generated.as_sql()
                    ),
                )
                .on_table(&full_name)
                .on_column(&col.name)
                .with_suggestion("Remove GENERATED clause or compute values during ETL"),
            );
        }
    }

    for constraint in &table.constraints {
        match constraint.kind {
            ConstraintKind::ForeignKey { .. } => issues.push(
                Issue::info(codes::FOREIGN_KEY, "Foreign key constraint - not enforced in Iceberg tables")
                    .on_table(&full_name)
                    .with_suggestion("Foreign key will be documented but not enforced"),
            ),
            ConstraintKind::Check { .. } => issues.push(
                Issue::info(codes::CHECK_CONSTRAINT, "CHECK constraint - not enforced in Iceberg tables")
                    .on_table(&full_name)
                    .with_suggestion("CHECK constraint will be documented but not enforced"),
            ),
            _ => {}
        }
    }

    if let Some(editproc) = &table.editproc {
        issues.push(
            Issue::critical(
                codes::EDITPROC,
                format!("EDITPROC {} - table uses edit procedure for data transformation", editproc),
            )
            .on_table(&full_name)
            .with_suggestion("Review EDITPROC logic - data may require transformation before migration"),
        );
    }

    if let Some(validproc) = &table.validproc {
        issues.push(
            Issue::critical(
                codes::VALIDPROC,
                format!("VALIDPROC {} - table uses validation procedure", validproc),
            )
            .on_table(&full_name)
            .with_suggestion("Implement validation logic in application layer or Snowflake procedures"),
        );
    }

    if let Some(partition) = &table.partition {
        let issue = match partition.kind {
            PartitionKind::Hash => Issue::warning(
                codes::PARTITIONING,
                "HASH partitioning not directly supported - will be removed",
            )
            .with_suggestion("Iceberg uses automatic micro-partitioning"),
            PartitionKind::Range => Issue::info(
                codes::PARTITIONING,
                "RANGE partitioning will be removed - Iceberg uses automatic partitioning",
            )
            .with_suggestion("Consider Iceberg partition transforms if needed"),
        };
        issues.push(issue.on_table(&full_name));
    }

    if let Some(ccsid) = &table.ccsid {
        issues.push(
            Issue::info(codes::CCSID, format!("Table CCSID {} - verify character encoding after conversion", ccsid))
                .on_table(&full_name)
                .with_suggestion("Iceberg stores character data as UTF-8"),
        );
    }

    issues
}

fn assess_table(table: &TableDefinition) -> TableAssessment {
    let issues = table_issues(table);
    let has_critical = issues.iter().any(Issue::is_critical);
    // Every blocking condition is recorded as a critical issue.
    let can_auto_convert = !has_critical;
    let score = clamp_score(100.0 - total_penalty(&issues));

    let mut type_distribution = BTreeMap::new();
    for col in &table.columns {
        *type_distribution.entry(col.data_type.clone()).or_insert(0) += 1;
    }

    debug!(
        "Assessed {}: score {:.1}, {} issues",
        table.full_name(),
        score,
        issues.len()
    );

    TableAssessment {
        name: table.full_name(),
        column_count: table.columns.len(),
        constraint_count: table.constraints.len(),
        readiness_score: score,
        readiness_level: ReadinessLevel::from_score(score),
        can_auto_convert,
        disposition: match (can_auto_convert, has_critical) {
            (true, _) => TableDisposition::Auto,
            (false, true) => TableDisposition::Blocked,
            (false, false) => TableDisposition::ManualReview,
        },
        issues,
        type_distribution,
    }
}

fn features_used(tables: &[TableDefinition]) -> BTreeMap<String, usize> {
    let mut features: BTreeMap<String, usize> =
        FEATURE_KEYS.iter().map(|k| (k.to_string(), 0)).collect();
    let mut bump = |key: &str| {
        if let Some(count) = features.get_mut(key) {
            *count += 1;
        }
    };

    for table in tables {
        if table.editproc.is_some() {
            bump("editproc");
        }
        if table.validproc.is_some() {
            bump("validproc");
        }
        if table.partition.is_some() {
            bump("partitioning");
        }
        for col in &table.columns {
            if col.fieldproc.is_some() {
                bump("fieldproc");
            }
            if col.generated.is_generated() {
                bump("generated_columns");
            }
            match col.data_type.as_str() {
                "XML" => bump("xml_columns"),
                "GRAPHIC" | "VARGRAPHIC" | "LONG VARGRAPHIC" => bump("graphic_columns"),
                "CLOB" | "BLOB" => bump("lob_columns"),
                "DBCLOB" => {
                    bump("graphic_columns");
                    bump("lob_columns");
                }
                _ => {}
            }
        }
        for constraint in &table.constraints {
            if constraint.is_foreign_key() {
                bump("foreign_keys");
            } else if constraint.is_check() {
                bump("check_constraints");
            }
        }
    }
    features
}
