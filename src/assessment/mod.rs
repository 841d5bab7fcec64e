//! Migration-readiness assessment: issues, per-table scores, and the batch
//! report.

pub mod assessor;
pub mod report;
pub mod scoring;

pub use assessor::Assessor;
pub use report::{
    AssessmentReport, Issue, IssueSeverity, ReadinessLevel, TableAssessment, TableDisposition,
};
pub use scoring::ComponentScores;
