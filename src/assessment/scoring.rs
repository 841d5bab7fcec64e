//! Code-keyed scoring rules.
//!
//! Every issue code that affects a score has exactly one [`ScoringRule`]:
//! the component it counts against, the readiness penalty it costs its
//! table, and the deduction it costs its component. Codes without a rule
//! are informational only.

use super::report::{Issue, IssueSeverity};
use crate::codes::{db2, snowflake};

pub const DATATYPE_WEIGHT: f64 = 0.40;
pub const CONSTRAINT_WEIGHT: f64 = 0.20;
pub const PARTITION_WEIGHT: f64 = 0.15;
pub const SPECIAL_WEIGHT: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Datatype,
    Constraint,
    Partition,
    Special,
}

/// Points per severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityPoints {
    pub info: f64,
    pub warning: f64,
    pub critical: f64,
}

impl SeverityPoints {
    const fn new(info: f64, warning: f64, critical: f64) -> Self {
        Self { info, warning, critical }
    }

    const fn flat(points: f64) -> Self {
        Self::new(points, points, points)
    }

    pub fn for_severity(&self, severity: IssueSeverity) -> f64 {
        match severity {
            IssueSeverity::Info => self.info,
            IssueSeverity::Warning => self.warning,
            IssueSeverity::Critical => self.critical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringRule {
    pub component: Component,
    /// Subtracted from the table's readiness score.
    pub penalty: SeverityPoints,
    /// Subtracted from the table's component score.
    pub deduction: SeverityPoints,
}

const DATATYPE_DEDUCTION: SeverityPoints = SeverityPoints::new(5.0, 15.0, 30.0);
const CONSTRAINT_DEDUCTION: SeverityPoints = SeverityPoints::new(5.0, 10.0, 10.0);
const PARTITION_DEDUCTION: SeverityPoints = SeverityPoints::new(10.0, 20.0, 20.0);
const SPECIAL_DEDUCTION: SeverityPoints = SeverityPoints::new(10.0, 25.0, 50.0);

/// DB2 type mapping penalties: compatible 2, lossy 10, unsupported 25.
const TYPE_PENALTY: SeverityPoints = SeverityPoints::new(2.0, 10.0, 25.0);
/// Snowflake readiness loses 5 per warning and 15 per critical issue.
const SNOWFLAKE_PENALTY: SeverityPoints = SeverityPoints::new(0.0, 5.0, 15.0);

const fn rule(component: Component, penalty: SeverityPoints, deduction: SeverityPoints) -> ScoringRule {
    ScoringRule { component, penalty, deduction }
}

/// Scoring rule for an issue code, if the code affects scores.
pub fn rule_for(code: &str) -> Option<ScoringRule> {
    use Component::*;

    let rule = match code {
        db2::CHAR_TO_VARCHAR
        | db2::PRECISION_ADJUSTED
        | db2::TIME_PRECISION
        | db2::TIMESTAMP_PRECISION
        | db2::XML_UNSUPPORTED
        | db2::GRAPHIC_ENCODING
        | db2::DECFLOAT_PRECISION
        | db2::SIZE_LIMIT
        | db2::ROWID
        | db2::FOR_BIT_DATA
        | db2::LONG_VARCHAR
        | db2::BLOB_TO_BINARY
        | db2::UNKNOWN_TYPE => rule(Datatype, TYPE_PENALTY, DATATYPE_DEDUCTION),

        db2::CHECK_CONSTRAINT | db2::FOREIGN_KEY => {
            rule(Constraint, SeverityPoints::flat(5.0), CONSTRAINT_DEDUCTION)
        }

        // RANGE partitioning (info) is free, HASH costs 20.
        db2::PARTITIONING => rule(Partition, SeverityPoints::new(0.0, 20.0, 20.0), PARTITION_DEDUCTION),

        db2::FIELDPROC | db2::EDITPROC => rule(Special, SeverityPoints::flat(50.0), SPECIAL_DEDUCTION),
        db2::VALIDPROC => rule(Special, SeverityPoints::flat(40.0), SPECIAL_DEDUCTION),
        db2::GENERATED_COLUMN => rule(Special, SeverityPoints::flat(15.0), SPECIAL_DEDUCTION),

        snowflake::VARIANT
        | snowflake::OBJECT
        | snowflake::ARRAY
        | snowflake::GEOGRAPHY
        | snowflake::GEOMETRY
        | snowflake::TIME_PRECISION
        | snowflake::TIMESTAMP_NTZ_PRECISION
        | snowflake::TIMESTAMP_LTZ_PRECISION
        | snowflake::TIMESTAMP_TZ => rule(Datatype, SNOWFLAKE_PENALTY, DATATYPE_DEDUCTION),

        snowflake::CLUSTER_BY => rule(Partition, SNOWFLAKE_PENALTY, PARTITION_DEDUCTION),

        snowflake::DATA_RETENTION
        | snowflake::CHANGE_TRACKING
        | snowflake::IDENTITY
        | snowflake::MASKING_POLICY
        | snowflake::COLLATE
        | snowflake::TEMPORARY_KEPT
        | snowflake::TRANSIENT_KEPT
        | snowflake::DYNAMIC_SKIPPED
        | snowflake::EXTERNAL_SKIPPED
        | snowflake::HYBRID_SKIPPED => rule(Special, SNOWFLAKE_PENALTY, SPECIAL_DEDUCTION),

        _ => return None,
    };
    Some(rule)
}

/// Sum of readiness penalties for a set of issues.
pub fn total_penalty(issues: &[Issue]) -> f64 {
    issues
        .iter()
        .filter_map(|issue| rule_for(&issue.code).map(|r| r.penalty.for_severity(issue.severity)))
        .sum()
}

/// Clamps a raw score into `0..=100`.
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub datatype: f64,
    pub constraint: f64,
    pub partition: f64,
    pub special: f64,
}

impl Default for ComponentScores {
    fn default() -> Self {
        Self {
            datatype: 100.0,
            constraint: 100.0,
            partition: 100.0,
            special: 100.0,
        }
    }
}

impl ComponentScores {
    /// Per-table component scores; each component floors at 0.
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut scores = Self::default();
        for issue in issues {
            let Some(rule) = rule_for(&issue.code) else {
                continue;
            };
            let slot = scores.component_mut(rule.component);
            *slot = (*slot - rule.deduction.for_severity(issue.severity)).max(0.0);
        }
        scores
    }

    /// Arithmetic mean of each component. An empty slice averages to 100.
    pub fn average(all: &[ComponentScores]) -> Self {
        if all.is_empty() {
            return Self::default();
        }
        let n = all.len() as f64;
        let sum = all.iter().fold(
            Self {
                datatype: 0.0,
                constraint: 0.0,
                partition: 0.0,
                special: 0.0,
            },
            |acc, s| Self {
                datatype: acc.datatype + s.datatype,
                constraint: acc.constraint + s.constraint,
                partition: acc.partition + s.partition,
                special: acc.special + s.special,
            },
        );
        Self {
            datatype: sum.datatype / n,
            constraint: sum.constraint / n,
            partition: sum.partition / n,
            special: sum.special / n,
        }
    }

    /// Weighted overall score.
    pub fn overall(&self) -> f64 {
        self.datatype * DATATYPE_WEIGHT
            + self.constraint * CONSTRAINT_WEIGHT
            + self.partition * PARTITION_WEIGHT
            + self.special * SPECIAL_WEIGHT
    }

    fn component_mut(&mut self, component: Component) -> &mut f64 {
        match component {
            Component::Datatype => &mut self.datatype,
            Component::Constraint => &mut self.constraint,
            Component::Partition => &mut self.partition,
            Component::Special => &mut self.special,
        }
    }
}
