//! # db2ice
//!
//! Converts IBM DB2 and Snowflake Standard `CREATE TABLE` DDL into Snowflake
//! Managed Iceberg table DDL, and scores each source table for migration
//! readiness.
//!
//! The pipeline is text in, values out:
//!
//! ```text
//! DDL text -> scanner -> db2::Db2Parser / snowflake::SnowflakeParser
//!          -> assessment::Assessor (AssessmentReport)
//!          -> converter::Db2IceConverter / snowflake::SnowflakeToIcebergConverter
//! ```
//!
//! No I/O happens inside the library apart from [`ConversionConfig::load`].
//!
//! ```rust
//! use db2ice::{ConversionConfig, Db2IceConverter};
//!
//! let converter = Db2IceConverter::new(ConversionConfig::default());
//! let result = converter.convert("CREATE TABLE S.T (A INTEGER NOT NULL, PRIMARY KEY (A));");
//! assert!(result.success);
//! assert!(result.iceberg_ddl.contains("CREATE OR REPLACE ICEBERG TABLE S.T"));
//! ```

pub mod assessment;
pub mod codes;
pub mod config;
pub mod converter;
pub mod db2;
pub mod error;
pub mod ewi;
pub mod mapper;
pub mod model;
pub mod scanner;
pub mod snowflake;

pub use assessment::{
    AssessmentReport, Assessor, Issue, IssueSeverity, ReadinessLevel, TableAssessment,
};
pub use config::ConversionConfig;
pub use converter::{ConversionResult, Db2IceConverter};
pub use db2::{Db2Parser, TableDefinition};
pub use error::{Db2IceError, ParseDiagnostic};
pub use mapper::{map_type, ConversionStatus, TypeMapping};
pub use model::{Constraint, ConstraintKind, GeneratedMode};
pub use snowflake::{SnowflakeParser, SnowflakeTable, SnowflakeToIcebergConverter, SnowflakeToIcebergResult};
