//! Parsed Snowflake table model.

use serde::Serialize;
use std::fmt;

use crate::model::Constraint;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SnowflakeColumn {
    pub name: String,
    /// Upper-cased base type name without arguments (`TIMESTAMP_NTZ`).
    pub data_type: String,
    /// Text inside the type's parentheses, as written (`10,2`, `VARCHAR`).
    pub type_args: Option<String>,
    pub length: Option<u64>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub nullable: bool,
    pub default: Option<String>,
    /// `seed,step` of an IDENTITY / AUTOINCREMENT column.
    pub identity: Option<String>,
    pub comment: Option<String>,
    pub collate: Option<String>,
    pub masking_policy: Option<String>,
}

impl SnowflakeColumn {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            ..Default::default()
        }
    }

    /// Type as declared, arguments included (`NUMBER(10,2)`).
    pub fn declared_type(&self) -> String {
        match &self.type_args {
            Some(args) => format!("{}({})", self.data_type, args),
            None => self.data_type.clone(),
        }
    }

    pub fn is_parameterized(&self) -> bool {
        self.type_args.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnowflakeTableKind {
    #[default]
    Regular,
    Temporary,
    Transient,
    Dynamic,
    External,
    Hybrid,
}

impl SnowflakeTableKind {
    /// Keyword used in DDL and messages.
    pub fn label(&self) -> &'static str {
        match self {
            SnowflakeTableKind::Regular => "REGULAR",
            SnowflakeTableKind::Temporary => "TEMPORARY",
            SnowflakeTableKind::Transient => "TRANSIENT",
            SnowflakeTableKind::Dynamic => "DYNAMIC",
            SnowflakeTableKind::External => "EXTERNAL",
            SnowflakeTableKind::Hybrid => "HYBRID",
        }
    }

    /// Tables kept as Snowflake standard tables instead of converting.
    pub fn is_kept_as_standard(&self) -> bool {
        matches!(self, SnowflakeTableKind::Temporary | SnowflakeTableKind::Transient)
    }

    /// Tables that cannot become Iceberg tables at all.
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            SnowflakeTableKind::Dynamic | SnowflakeTableKind::External | SnowflakeTableKind::Hybrid
        )
    }
}

impl fmt::Display for SnowflakeTableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SnowflakeTable {
    pub database: Option<String>,
    pub schema: Option<String>,
    pub name: String,
    pub kind: SnowflakeTableKind,
    pub columns: Vec<SnowflakeColumn>,
    pub constraints: Vec<Constraint>,
    /// Clustering expressions as written; empty when not clustered.
    pub cluster_by: Vec<String>,
    pub comment: Option<String>,
    pub data_retention_days: Option<u32>,
    pub change_tracking: bool,
    pub raw_ddl: String,
}

impl SnowflakeTable {
    /// Name parts that are present, outermost first.
    pub fn name_parts(&self) -> Vec<&str> {
        self.database
            .iter()
            .chain(self.schema.iter())
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
            .collect()
    }

    /// `DB.SCHEMA.NAME` with absent parts left out.
    pub fn full_name(&self) -> String {
        self.name_parts().join(".")
    }

    pub fn primary_key(&self) -> Option<&Constraint> {
        crate::model::primary_key(&self.constraints)
    }

    pub fn is_clustered(&self) -> bool {
        !self.cluster_by.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_skips_absent_parts() {
        let mut table = SnowflakeTable {
            name: "ORDERS".to_string(),
            ..Default::default()
        };
        assert_eq!(table.full_name(), "ORDERS");
        table.database = Some("DB".to_string());
        assert_eq!(table.full_name(), "DB.ORDERS");
        table.schema = Some("SALES".to_string());
        assert_eq!(table.full_name(), "DB.SALES.ORDERS");
    }

    #[test]
    fn test_kind_classes() {
        assert!(SnowflakeTableKind::Transient.is_kept_as_standard());
        assert!(SnowflakeTableKind::Hybrid.is_skipped());
        assert!(!SnowflakeTableKind::Regular.is_skipped());
        assert!(!SnowflakeTableKind::Regular.is_kept_as_standard());
        assert_eq!(SnowflakeTableKind::Dynamic.to_string(), "DYNAMIC");
    }

    #[test]
    fn test_declared_type() {
        let mut col = SnowflakeColumn::new("AMOUNT", "NUMBER");
        assert_eq!(col.declared_type(), "NUMBER");
        col.type_args = Some("10,2".to_string());
        assert_eq!(col.declared_type(), "NUMBER(10,2)");
        assert!(col.nullable);
    }
}
