//! Snowflake standard table DDL: parsing, Iceberg conversion, and readiness
//! assessment.

pub mod assessment;
pub mod converter;
pub mod model;
pub mod parser;

pub use assessment::{assess, assess_tables};
pub use converter::{SnowflakeToIcebergConverter, SnowflakeToIcebergResult, TableConversion};
pub use model::{SnowflakeColumn, SnowflakeTable, SnowflakeTableKind};
pub use parser::SnowflakeParser;
