//! Dialect-neutral pieces of the parsed table model.

use serde::Serialize;

/// `GENERATED` clause of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeneratedMode {
    #[default]
    None,
    Always,
    ByDefault,
}

impl GeneratedMode {
    pub fn is_generated(&self) -> bool {
        !matches!(self, GeneratedMode::None)
    }

    /// SQL spelling used in messages (`ALWAYS`, `BY DEFAULT`).
    pub fn as_sql(&self) -> &'static str {
        match self {
            GeneratedMode::None => "",
            GeneratedMode::Always => "ALWAYS",
            GeneratedMode::ByDefault => "BY DEFAULT",
        }
    }
}

/// Table constraint. The variant decides which parts are populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constraint {
    pub name: Option<String>,
    pub kind: ConstraintKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintKind {
    PrimaryKey {
        columns: Vec<String>,
    },
    Unique {
        columns: Vec<String>,
    },
    ForeignKey {
        columns: Vec<String>,
        references: String,
        referenced_columns: Vec<String>,
    },
    /// Raw boolean expression, kept verbatim.
    Check {
        condition: String,
    },
}

impl Constraint {
    pub fn new(name: Option<String>, kind: ConstraintKind) -> Self {
        Self { name, kind }
    }

    /// SQL keyword for the constraint kind.
    pub fn keyword(&self) -> &'static str {
        match self.kind {
            ConstraintKind::PrimaryKey { .. } => "PRIMARY KEY",
            ConstraintKind::Unique { .. } => "UNIQUE",
            ConstraintKind::ForeignKey { .. } => "FOREIGN KEY",
            ConstraintKind::Check { .. } => "CHECK",
        }
    }

    /// Participating columns in declaration order (empty for CHECK).
    pub fn columns(&self) -> &[String] {
        match &self.kind {
            ConstraintKind::PrimaryKey { columns }
            | ConstraintKind::Unique { columns }
            | ConstraintKind::ForeignKey { columns, .. } => columns,
            ConstraintKind::Check { .. } => &[],
        }
    }

    pub fn is_primary_key(&self) -> bool {
        matches!(self.kind, ConstraintKind::PrimaryKey { .. })
    }

    pub fn is_foreign_key(&self) -> bool {
        matches!(self.kind, ConstraintKind::ForeignKey { .. })
    }

    pub fn is_check(&self) -> bool {
        matches!(self.kind, ConstraintKind::Check { .. })
    }
}

/// First PRIMARY KEY constraint of a list, if any.
pub fn primary_key(constraints: &[Constraint]) -> Option<&Constraint> {
    constraints.iter().find(|c| c.is_primary_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_columns_by_kind() {
        let fk = Constraint::new(
            Some("FK_DEPT".to_string()),
            ConstraintKind::ForeignKey {
                columns: vec!["DEPT_ID".to_string()],
                references: "HR.DEPT".to_string(),
                referenced_columns: vec!["ID".to_string()],
            },
        );
        assert_eq!(fk.columns(), ["DEPT_ID".to_string()]);
        assert_eq!(fk.keyword(), "FOREIGN KEY");
        assert!(fk.is_foreign_key());

        let check = Constraint::new(
            None,
            ConstraintKind::Check {
                condition: "A > 0".to_string(),
            },
        );
        assert!(check.columns().is_empty());
        assert!(check.is_check());
    }

    #[test]
    fn test_primary_key_lookup() {
        let constraints = vec![
            Constraint::new(None, ConstraintKind::Unique { columns: vec!["B".into()] }),
            Constraint::new(None, ConstraintKind::PrimaryKey { columns: vec!["A".into()] }),
        ];
        assert_eq!(primary_key(&constraints).map(|c| c.columns().to_vec()), Some(vec!["A".to_string()]));
        assert!(primary_key(&constraints[..1]).is_none());
    }

    #[test]
    fn test_generated_mode() {
        assert!(!GeneratedMode::default().is_generated());
        assert_eq!(GeneratedMode::ByDefault.as_sql(), "BY DEFAULT");
    }
}
