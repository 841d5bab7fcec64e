//! Migration-readiness report for Snowflake standard tables.
//!
//! Issues come from the converter itself, so the report always agrees with
//! what a conversion would produce.

use log::info;
use std::collections::BTreeMap;

use super::converter::SnowflakeToIcebergConverter;
use super::model::{SnowflakeTable, SnowflakeTableKind};
use super::parser::SnowflakeParser;
use crate::assessment::scoring::{clamp_score, total_penalty};
use crate::assessment::{AssessmentReport, ReadinessLevel, TableAssessment, TableDisposition};
use crate::codes::snowflake as codes;
use crate::config::ConversionConfig;

const CLEAN_BASE_SCORE: f64 = 95.0;
const CLUSTERED_BASE_SCORE: f64 = 85.0;
const KEPT_BASE_SCORE: f64 = 70.0;
const SKIPPED_BASE_SCORE: f64 = 0.0;

const SEMI_STRUCTURED_TYPES: &[&str] = &["VARIANT", "OBJECT", "ARRAY"];
const SPATIAL_TYPES: &[&str] = &["GEOGRAPHY", "GEOMETRY"];

/// Parses `ddl` and assesses every table found.
pub fn assess(ddl: &str, config: &ConversionConfig) -> AssessmentReport {
    let tables = SnowflakeParser::new().parse(ddl);
    assess_tables(&tables, config)
}

pub fn assess_tables(tables: &[SnowflakeTable], config: &ConversionConfig) -> AssessmentReport {
    if tables.is_empty() {
        info!("Snowflake assessment found no table definitions");
        return AssessmentReport::no_tables(codes::NO_TABLES);
    }

    let converter = SnowflakeToIcebergConverter::new(config.clone());
    let assessments = tables
        .iter()
        .map(|table| assess_table(&converter, table))
        .collect();
    let report = AssessmentReport::from_tables(assessments, features_used(tables));
    info!(
        "Assessed {} Snowflake tables: overall {:.1} ({}), {} blocked",
        report.tables_total, report.overall_score, report.overall_level, report.tables_blocked
    );
    report
}

fn assess_table(converter: &SnowflakeToIcebergConverter, table: &SnowflakeTable) -> TableAssessment {
    let issues = converter.convert_table(table).issues;

    let (base, disposition) = match table.kind {
        kind if kind.is_skipped() => (SKIPPED_BASE_SCORE, TableDisposition::Blocked),
        kind if kind.is_kept_as_standard() => (KEPT_BASE_SCORE, TableDisposition::ManualReview),
        _ if table.is_clustered() => (CLUSTERED_BASE_SCORE, TableDisposition::ManualReview),
        _ => (CLEAN_BASE_SCORE, TableDisposition::Auto),
    };
    let score = clamp_score(base - total_penalty(&issues));

    let mut type_distribution = BTreeMap::new();
    for col in &table.columns {
        *type_distribution.entry(col.data_type.clone()).or_insert(0) += 1;
    }

    TableAssessment {
        name: table.full_name(),
        column_count: table.columns.len(),
        constraint_count: table.constraints.len(),
        readiness_score: score,
        readiness_level: ReadinessLevel::from_score(score),
        can_auto_convert: disposition == TableDisposition::Auto,
        disposition,
        issues,
        type_distribution,
    }
}

fn features_used(tables: &[SnowflakeTable]) -> BTreeMap<String, usize> {
    let mut features = BTreeMap::new();
    let mut bump = |key: &str, n: usize| {
        *features.entry(key.to_string()).or_insert(0) += n;
    };

    for table in tables {
        let kind_key = match table.kind {
            SnowflakeTableKind::Regular => "regular_tables",
            SnowflakeTableKind::Temporary => "temporary_tables",
            SnowflakeTableKind::Transient => "transient_tables",
            SnowflakeTableKind::Dynamic => "dynamic_tables",
            SnowflakeTableKind::External => "external_tables",
            SnowflakeTableKind::Hybrid => "hybrid_tables",
        };
        bump(kind_key, 1);
        bump("clustered_tables", usize::from(table.is_clustered()));
        bump("foreign_keys", table.constraints.iter().filter(|c| c.is_foreign_key()).count());

        for col in &table.columns {
            let semi_structured = SEMI_STRUCTURED_TYPES.contains(&col.data_type.as_str()) && !col.is_parameterized();
            bump("semi_structured_columns", usize::from(semi_structured));
            bump("spatial_columns", usize::from(SPATIAL_TYPES.contains(&col.data_type.as_str())));
            bump("identity_columns", usize::from(col.identity.is_some()));
            bump("masking_policies", usize::from(col.masking_policy.is_some()));
            bump("collated_columns", usize::from(col.collate.is_some()));
        }
    }
    features
}
