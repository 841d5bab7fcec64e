//! Assessment result values and their JSON shape.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::scoring::ComponentScores;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Blocks automatic conversion.
    Critical,
    Warning,
    Info,
}

impl IssueSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSeverity::Critical => "critical",
            IssueSeverity::Warning => "warning",
            IssueSeverity::Info => "info",
        }
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traffic-light readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessLevel {
    Green,
    Yellow,
    Red,
}

impl ReadinessLevel {
    pub const GREEN_THRESHOLD: f64 = 80.0;
    pub const YELLOW_THRESHOLD: f64 = 50.0;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::GREEN_THRESHOLD {
            ReadinessLevel::Green
        } else if score >= Self::YELLOW_THRESHOLD {
            ReadinessLevel::Yellow
        } else {
            ReadinessLevel::Red
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadinessLevel::Green => "green",
            ReadinessLevel::Yellow => "yellow",
            ReadinessLevel::Red => "red",
        }
    }
}

impl fmt::Display for ReadinessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub code: String,
    pub severity: IssueSeverity,
    pub message: String,
    pub table: Option<String>,
    pub column: Option<String>,
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn new(code: impl Into<String>, severity: IssueSeverity, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            table: None,
            column: None,
            suggestion: None,
        }
    }

    pub fn critical(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, IssueSeverity::Critical, message)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, IssueSeverity::Warning, message)
    }

    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, IssueSeverity::Info, message)
    }

    pub fn on_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn on_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_critical(&self) -> bool {
        self.severity == IssueSeverity::Critical
    }

    fn to_json(&self) -> Value {
        json!({
            "code": self.code,
            "severity": self.severity.as_str(),
            "message": self.message,
            "table": self.table,
            "column": self.column,
            "suggestion": self.suggestion,
        })
    }
}

/// How a table is expected to migrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableDisposition {
    /// Converts without manual work.
    Auto,
    /// Converts, but needs a review.
    ManualReview,
    /// Cannot be converted as-is.
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableAssessment {
    /// Fully qualified source name.
    pub name: String,
    pub column_count: usize,
    pub constraint_count: usize,
    pub readiness_score: f64,
    pub readiness_level: ReadinessLevel,
    pub can_auto_convert: bool,
    pub disposition: TableDisposition,
    pub issues: Vec<Issue>,
    pub type_distribution: BTreeMap<String, usize>,
}

impl TableAssessment {
    pub fn has_critical(&self) -> bool {
        self.issues.iter().any(Issue::is_critical)
    }

    pub fn component_scores(&self) -> ComponentScores {
        ComponentScores::from_issues(&self.issues)
    }

    fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "columns": self.column_count,
            "constraints": self.constraint_count,
            "score": round1(self.readiness_score),
            "level": self.readiness_level.as_str(),
            "can_auto_convert": self.can_auto_convert,
            "issues": self.issues.iter().map(Issue::to_json).collect::<Vec<_>>(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentReport {
    pub tables_total: usize,
    pub tables_auto: usize,
    pub tables_manual: usize,
    pub tables_blocked: usize,

    pub overall_score: f64,
    pub overall_level: ReadinessLevel,
    pub datatype_score: f64,
    pub constraint_score: f64,
    pub partition_score: f64,
    pub special_features_score: f64,

    pub total_columns: usize,
    pub total_constraints: usize,

    pub critical_issues: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub info_items: Vec<Issue>,

    pub table_assessments: Vec<TableAssessment>,
    pub type_distribution: BTreeMap<String, usize>,
    pub features_used: BTreeMap<String, usize>,
}

impl AssessmentReport {
    fn empty() -> Self {
        Self {
            tables_total: 0,
            tables_auto: 0,
            tables_manual: 0,
            tables_blocked: 0,
            overall_score: 0.0,
            overall_level: ReadinessLevel::Red,
            datatype_score: 0.0,
            constraint_score: 0.0,
            partition_score: 0.0,
            special_features_score: 0.0,
            total_columns: 0,
            total_constraints: 0,
            critical_issues: Vec::new(),
            warnings: Vec::new(),
            info_items: Vec::new(),
            table_assessments: Vec::new(),
            type_distribution: BTreeMap::new(),
            features_used: BTreeMap::new(),
        }
    }

    /// Degenerate report for input without any table definitions.
    pub fn no_tables(code: &str) -> Self {
        let mut report = Self::empty();
        report.push_issue(Issue::critical(
            code,
            "No valid CREATE TABLE statements found in input",
        ));
        report
    }

    /// Aggregates per-table assessments into a batch report.
    ///
    /// Component scores are averaged across tables and the overall score is
    /// their weighted sum.
    pub fn from_tables(tables: Vec<TableAssessment>, features_used: BTreeMap<String, usize>) -> Self {
        let mut report = Self {
            tables_total: tables.len(),
            features_used,
            ..Self::empty()
        };

        let mut components = Vec::with_capacity(tables.len());
        for table in &tables {
            report.total_columns += table.column_count;
            report.total_constraints += table.constraint_count;
            for (ty, count) in &table.type_distribution {
                *report.type_distribution.entry(ty.clone()).or_insert(0) += count;
            }
            for issue in &table.issues {
                report.push_issue(issue.clone());
            }
            match table.disposition {
                TableDisposition::Auto => report.tables_auto += 1,
                TableDisposition::ManualReview => report.tables_manual += 1,
                TableDisposition::Blocked => report.tables_blocked += 1,
            }
            components.push(table.component_scores());
        }

        let averages = ComponentScores::average(&components);
        report.datatype_score = averages.datatype;
        report.constraint_score = averages.constraint;
        report.partition_score = averages.partition;
        report.special_features_score = averages.special;
        report.overall_score = averages.overall();
        report.overall_level = ReadinessLevel::from_score(report.overall_score);
        report.table_assessments = tables;
        report
    }

    fn push_issue(&mut self, issue: Issue) {
        match issue.severity {
            IssueSeverity::Critical => self.critical_issues.push(issue),
            IssueSeverity::Warning => self.warnings.push(issue),
            IssueSeverity::Info => self.info_items.push(issue),
        }
    }

    /// All issues, critical first, each bucket in traversal order.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.critical_issues
            .iter()
            .chain(&self.warnings)
            .chain(&self.info_items)
    }

    pub fn issue_count(&self) -> usize {
        self.critical_issues.len() + self.warnings.len() + self.info_items.len()
    }

    /// Documented JSON shape, scores rounded to one decimal.
    pub fn to_json(&self) -> Value {
        let bucket = |issues: &[Issue]| issues.iter().map(Issue::to_json).collect::<Vec<_>>();
        json!({
            "summary": {
                "tables_total": self.tables_total,
                "tables_auto_convert": self.tables_auto,
                "tables_manual_review": self.tables_manual,
                "tables_blocked": self.tables_blocked,
            },
            "readiness": {
                "overall_score": round1(self.overall_score),
                "overall_level": self.overall_level.as_str(),
                "datatype_score": round1(self.datatype_score),
                "constraint_score": round1(self.constraint_score),
                "partition_score": round1(self.partition_score),
                "special_features_score": round1(self.special_features_score),
            },
            "inventory": {
                "total_columns": self.total_columns,
                "total_constraints": self.total_constraints,
            },
            "issues": {
                "critical": bucket(&self.critical_issues),
                "warnings": bucket(&self.warnings),
                "info": bucket(&self.info_items),
            },
            "type_distribution": self.type_distribution,
            "features_used": self.features_used,
            "tables": self.table_assessments.iter().map(TableAssessment::to_json).collect::<Vec<_>>(),
        })
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
