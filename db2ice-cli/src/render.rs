//! Colored text rendering for reports and summaries.

use chrono::Local;
use colored::{ColoredString, Colorize};
use db2ice::{AssessmentReport, Issue, IssueSeverity, ReadinessLevel};
use std::collections::BTreeMap;

pub fn header(title: &str) -> String {
    format!(
        "\n{} {}\n",
        title.bold(),
        format!("({})", Local::now().format("%Y-%m-%d %H:%M:%S")).dimmed()
    )
}

fn level(level: ReadinessLevel) -> ColoredString {
    let label = level.as_str().to_uppercase();
    match level {
        ReadinessLevel::Green => label.green().bold(),
        ReadinessLevel::Yellow => label.yellow().bold(),
        ReadinessLevel::Red => label.red().bold(),
    }
}

fn severity_tag(severity: IssueSeverity) -> ColoredString {
    match severity {
        IssueSeverity::Critical => "CRITICAL".red().bold(),
        IssueSeverity::Warning => "WARNING ".yellow(),
        IssueSeverity::Info => "INFO    ".blue(),
    }
}

fn issue_line(issue: &Issue) -> String {
    let location = match (&issue.table, &issue.column) {
        (Some(table), Some(column)) => format!(" [{}.{}]", table, column),
        (Some(table), None) => format!(" [{}]", table),
        _ => String::new(),
    };
    format!(
        "  {} {}{} {}",
        severity_tag(issue.severity),
        issue.code.dimmed(),
        location,
        issue.message
    )
}

/// Text rendering of an assessment report.
pub fn report(report: &AssessmentReport) -> String {
    let mut out = vec![header("📊 Migration Readiness Assessment")];

    out.push(format!(
        "Overall: {:.1} {}",
        report.overall_score,
        level(report.overall_level)
    ));
    out.push(format!(
        "  Data types {:.1} | Constraints {:.1} | Partitioning {:.1} | Special features {:.1}",
        report.datatype_score,
        report.constraint_score,
        report.partition_score,
        report.special_features_score
    ));
    out.push(format!(
        "Tables: {} total, {} auto, {} manual review, {} blocked",
        report.tables_total,
        report.tables_auto.to_string().green(),
        report.tables_manual.to_string().yellow(),
        report.tables_blocked.to_string().red()
    ));
    out.push(format!(
        "Columns: {}  Constraints: {}",
        report.total_columns, report.total_constraints
    ));

    if !report.table_assessments.is_empty() {
        out.push(String::new());
        out.push("Tables".bold().to_string());
        for table in &report.table_assessments {
            out.push(format!(
                "  {:<40} {:>5.1} {}",
                table.name,
                table.readiness_score,
                level(table.readiness_level)
            ));
        }
    }

    if report.issue_count() > 0 {
        out.push(String::new());
        out.push(
            format!(
                "Issues ({} critical, {} warnings, {} info)",
                report.critical_issues.len(),
                report.warnings.len(),
                report.info_items.len()
            )
            .bold()
            .to_string(),
        );
        out.extend(report.issues().map(issue_line));
    }

    let used: Vec<String> = report
        .features_used
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(name, count)| format!("{}={}", name, count))
        .collect();
    if !used.is_empty() {
        out.push(String::new());
        out.push(format!("Features used: {}", used.join(", ")));
    }

    out.join("\n")
}

/// Text rendering of the DB2 type-mapping matrix.
pub fn mappings(matrix: &BTreeMap<&'static str, BTreeMap<&'static str, &'static str>>) -> String {
    let mut out = vec![header("🗺  DB2 to Iceberg type mappings")];
    for (category, rows) in matrix {
        out.push(category.to_uppercase().bold().to_string());
        for (source, target) in rows {
            out.push(format!("  {:<24} -> {}", source, target));
        }
        out.push(String::new());
    }
    out.join("\n")
}
