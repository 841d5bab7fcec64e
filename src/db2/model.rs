//! Parsed DB2 table model.

use serde::Serialize;
use std::fmt;

use crate::model::{Constraint, GeneratedMode};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Db2Column {
    pub name: String,
    /// Upper-cased, single-spaced (`CHARACTER VARYING`).
    pub data_type: String,
    pub length: Option<u64>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub nullable: bool,
    pub default: Option<String>,
    pub generated: GeneratedMode,
    pub for_bit_data: bool,
    pub ccsid: Option<String>,
    pub fieldproc: Option<String>,
}

impl Db2Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartitionKind {
    Range,
    Hash,
}

impl fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionKind::Range => f.write_str("RANGE"),
            PartitionKind::Hash => f.write_str("HASH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionSpec {
    pub kind: PartitionKind,
    pub columns: Vec<String>,
    /// Clause as written, for documentation only.
    pub raw: String,
}

/// Which session-scoped form a DB2 table was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionScope {
    Volatile,
    /// `CREATE GLOBAL TEMPORARY TABLE`
    CreatedGlobalTemporary,
    /// `DECLARE GLOBAL TEMPORARY TABLE`
    DeclaredGlobalTemporary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Db2TableKind {
    #[default]
    Regular,
    SessionScoped(SessionScope),
}

impl Db2TableKind {
    pub fn is_session_scoped(&self) -> bool {
        matches!(self, Db2TableKind::SessionScoped(_))
    }

    /// Label used in generated comments and messages.
    pub fn label(&self) -> &'static str {
        match self {
            Db2TableKind::Regular => "REGULAR",
            Db2TableKind::SessionScoped(SessionScope::Volatile) => "VOLATILE",
            Db2TableKind::SessionScoped(_) => "GLOBAL TEMPORARY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TableDefinition {
    pub schema: Option<String>,
    pub name: String,
    pub columns: Vec<Db2Column>,
    pub constraints: Vec<Constraint>,
    pub partition: Option<PartitionSpec>,
    pub tablespace: Option<String>,
    pub editproc: Option<String>,
    pub validproc: Option<String>,
    pub audit: Option<String>,
    pub data_capture: Option<String>,
    pub ccsid: Option<String>,
    pub kind: Db2TableKind,
    pub raw_ddl: String,
}

impl TableDefinition {
    /// `SCHEMA.NAME`, or just `NAME` when unqualified.
    pub fn full_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }

    pub fn primary_key(&self) -> Option<&Constraint> {
        crate::model::primary_key(&self.constraints)
    }
}
