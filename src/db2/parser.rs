//! DB2 `CREATE TABLE` / `DECLARE GLOBAL TEMPORARY TABLE` parser.
//!
//! Each statement is parsed in isolation. Problems are recorded as
//! [`ParseDiagnostic`]s instead of aborting: a bad column or constraint is
//! dropped with a warning, a bad statement is dropped with an error, and
//! statements that are not table definitions are skipped silently.

use log::{debug, warn};

use super::model::{
    Db2Column, Db2TableKind, PartitionKind, PartitionSpec, SessionScope, TableDefinition,
};
use crate::error::{excerpt, ParseDiagnostic};
use crate::model::{Constraint, ConstraintKind, GeneratedMode};
use crate::scanner::{
    find_matching_paren, find_words, read_identifier_list, read_qualified_name, span_text,
    split_statements, split_top_level, starts_with_words, strip_leading_comments, tokenize, Token,
    TokenKind, DB2,
};

/// DB2 type vocabulary. Multi-word spellings come first so they win over
/// their one-word prefixes.
const TYPE_VOCABULARY: &[(&[&str], &str)] = &[
    (&["CHARACTER", "VARYING"], "CHARACTER VARYING"),
    (&["CHAR", "VARYING"], "CHAR VARYING"),
    (&["LONG", "VARCHAR"], "LONG VARCHAR"),
    (&["LONG", "VARGRAPHIC"], "LONG VARGRAPHIC"),
    (&["BINARY", "VARYING"], "BINARY VARYING"),
    (&["DOUBLE", "PRECISION"], "DOUBLE"),
    (&["SMALLINT"], "SMALLINT"),
    (&["INTEGER"], "INTEGER"),
    (&["INT"], "INT"),
    (&["BIGINT"], "BIGINT"),
    (&["DECIMAL"], "DECIMAL"),
    (&["DEC"], "DEC"),
    (&["NUMERIC"], "NUMERIC"),
    (&["REAL"], "REAL"),
    (&["FLOAT"], "FLOAT"),
    (&["DOUBLE"], "DOUBLE"),
    (&["DECFLOAT"], "DECFLOAT"),
    (&["CHARACTER"], "CHARACTER"),
    (&["CHAR"], "CHAR"),
    (&["VARCHAR"], "VARCHAR"),
    (&["CLOB"], "CLOB"),
    (&["GRAPHIC"], "GRAPHIC"),
    (&["VARGRAPHIC"], "VARGRAPHIC"),
    (&["DBCLOB"], "DBCLOB"),
    (&["BINARY"], "BINARY"),
    (&["VARBINARY"], "VARBINARY"),
    (&["BLOB"], "BLOB"),
    (&["DATE"], "DATE"),
    (&["TIMESTAMP"], "TIMESTAMP"),
    (&["TIME"], "TIME"),
    (&["XML"], "XML"),
    (&["ROWID"], "ROWID"),
    (&["BOOLEAN"], "BOOLEAN"),
];

const CONSTRAINT_KEYWORDS: &[&[&str]] = &[
    &["PRIMARY", "KEY"],
    &["FOREIGN", "KEY"],
    &["UNIQUE"],
    &["CHECK"],
    &["CONSTRAINT"],
];

/// Words that end a `DEFAULT` clause without a value (`WITH DEFAULT NOT NULL`).
const COLUMN_OPTION_WORDS: &[&str] = &[
    "NOT", "GENERATED", "FOR", "CCSID", "FIELDPROC", "PRIMARY", "UNIQUE", "CHECK", "REFERENCES",
    "CONSTRAINT", "WITH",
];

#[derive(Debug, Default)]
pub struct Db2Parser {
    warnings: Vec<ParseDiagnostic>,
    errors: Vec<ParseDiagnostic>,
}

impl Db2Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every table definition in `ddl`, in script order.
    pub fn parse(&mut self, ddl: &str) -> Vec<TableDefinition> {
        self.warnings.clear();
        self.errors.clear();

        let mut tables = Vec::new();
        for stmt in split_statements(ddl, &DB2) {
            let stmt = strip_leading_comments(stmt);
            if stmt.is_empty() {
                continue;
            }
            if let Some(table) = self.parse_statement(stmt) {
                debug!(
                    "Parsed DB2 table {} ({} columns, {} constraints)",
                    table.full_name(),
                    table.columns.len(),
                    table.constraints.len()
                );
                tables.push(table);
            }
        }
        tables
    }

    /// Column and constraint problems from the last `parse` call.
    pub fn warnings(&self) -> &[ParseDiagnostic] {
        &self.warnings
    }

    /// Statement-level problems from the last `parse` call.
    pub fn errors(&self) -> &[ParseDiagnostic] {
        &self.errors
    }

    fn parse_statement(&mut self, stmt: &str) -> Option<TableDefinition> {
        let tokens = tokenize(stmt, &DB2);
        let (kind, name_at) = match_header(&tokens)?;

        let Some((parts, open)) = read_qualified_name(&tokens, name_at)
            .filter(|(_, next)| tokens.get(*next).is_some_and(|t| t.is_punct('(')))
        else {
            self.errors
                .push(ParseDiagnostic::UnrecognizedHeader(excerpt(stmt)));
            return None;
        };

        let mut table = TableDefinition {
            kind,
            raw_ddl: stmt.to_string(),
            ..Default::default()
        };
        (table.schema, table.name) = split_name(parts);

        let Some(close) = find_matching_paren(&tokens, open) else {
            self.errors
                .push(ParseDiagnostic::UnbalancedColumnList(table.full_name()));
            return None;
        };

        for chunk in split_top_level(&tokens[open + 1..close], ',') {
            if is_constraint_start(chunk) {
                if let Some(constraint) = self.parse_constraint(stmt, chunk) {
                    table.constraints.push(constraint);
                }
            } else if let Some(column) = self.parse_column(stmt, chunk, &mut table.constraints) {
                table.columns.push(column);
            }
        }

        parse_table_options(stmt, &tokens[close + 1..], &mut table);
        Some(table)
    }

    fn parse_column(
        &mut self,
        stmt: &str,
        chunk: &[Token<'_>],
        constraints: &mut Vec<Constraint>,
    ) -> Option<Db2Column> {
        let definition = span_text(stmt, chunk);
        let Some(name_token) = chunk.first().filter(|t| t.is_identifier()) else {
            warn!("Skipping column without a name: {}", excerpt(definition));
            self.warnings
                .push(ParseDiagnostic::ColumnName(excerpt(definition)));
            return None;
        };
        let name = name_token.identifier();

        let Some((data_type, after_type)) = match_type(chunk, 1) else {
            warn!("Skipping column {} with unrecognized type", name);
            self.warnings.push(ParseDiagnostic::UnknownDataType {
                column: name,
                definition: excerpt(definition),
            });
            return None;
        };

        let mut column = Db2Column::new(name, data_type);
        let options_at = read_size(chunk, after_type, &mut column);
        parse_column_options(stmt, &chunk[options_at..], &mut column, constraints);
        Some(column)
    }

    fn parse_constraint(&mut self, stmt: &str, chunk: &[Token<'_>]) -> Option<Constraint> {
        let (name, body) = if chunk[0].is_word("CONSTRAINT") {
            let name = chunk.get(1).filter(|t| t.is_identifier()).map(|t| t.identifier());
            (name, chunk.get(2..).unwrap_or_default())
        } else {
            (None, chunk)
        };

        let (keyword, kind) = if let Some(at) = find_words(body, &["PRIMARY", "KEY"]) {
            (
                "PRIMARY KEY",
                read_identifier_list(body, at + 2).map(|(columns, _)| ConstraintKind::PrimaryKey { columns }),
            )
        } else if let Some(at) = find_words(body, &["FOREIGN", "KEY"]) {
            ("FOREIGN KEY", foreign_key(body, at + 2))
        } else if let Some(at) = find_words(body, &["UNIQUE"]) {
            (
                "UNIQUE",
                read_identifier_list(body, at + 1).map(|(columns, _)| ConstraintKind::Unique { columns }),
            )
        } else if let Some(at) = find_words(body, &["CHECK"]) {
            ("CHECK", check_condition(stmt, body, at + 1))
        } else {
            ("CONSTRAINT", None)
        };

        match kind {
            Some(kind) => Some(Constraint::new(name, kind)),
            None => {
                let definition = excerpt(span_text(stmt, chunk));
                warn!("Skipping malformed {} constraint: {}", keyword, definition);
                self.warnings.push(ParseDiagnostic::MalformedConstraint {
                    kind: keyword,
                    definition,
                });
                None
            }
        }
    }
}

/// Recognizes the statement header and returns the table kind plus the
/// index of the first token of the table name.
fn match_header(tokens: &[Token<'_>]) -> Option<(Db2TableKind, usize)> {
    if starts_with_words(tokens, 0, &["DECLARE", "GLOBAL", "TEMPORARY", "TABLE"]) {
        return Some((
            Db2TableKind::SessionScoped(SessionScope::DeclaredGlobalTemporary),
            4,
        ));
    }
    if !tokens.first()?.is_word("CREATE") {
        return None;
    }

    let mut at = 1;
    let mut volatile = false;
    let mut global_temporary = false;
    loop {
        if starts_with_words(tokens, at, &["VOLATILE"]) {
            volatile = true;
            at += 1;
        } else if starts_with_words(tokens, at, &["GLOBAL", "TEMPORARY"]) {
            global_temporary = true;
            at += 2;
        } else {
            break;
        }
    }
    if !starts_with_words(tokens, at, &["TABLE"]) {
        return None;
    }

    let kind = if volatile {
        Db2TableKind::SessionScoped(SessionScope::Volatile)
    } else if global_temporary {
        Db2TableKind::SessionScoped(SessionScope::CreatedGlobalTemporary)
    } else {
        Db2TableKind::Regular
    };
    Some((kind, at + 1))
}

/// Uses the last two name parts as schema and table.
fn split_name(mut parts: Vec<String>) -> (Option<String>, String) {
    let name = parts.pop().unwrap_or_default();
    (parts.pop(), name)
}

fn is_constraint_start(chunk: &[Token<'_>]) -> bool {
    CONSTRAINT_KEYWORDS
        .iter()
        .any(|words| starts_with_words(chunk, 0, words))
}

fn match_type(tokens: &[Token<'_>], at: usize) -> Option<(String, usize)> {
    TYPE_VOCABULARY
        .iter()
        .find(|(words, _)| starts_with_words(tokens, at, words))
        .map(|(words, canonical)| (canonical.to_string(), at + words.len()))
}

/// Reads `(n [K|M|G] [units] [, m])` after the type name. Returns the index
/// where column options start.
fn read_size(chunk: &[Token<'_>], at: usize, column: &mut Db2Column) -> usize {
    if !chunk.get(at).is_some_and(|t| t.is_punct('(')) {
        return at;
    }
    let Some(close) = find_matching_paren(chunk, at) else {
        return at;
    };

    let args = split_top_level(&chunk[at + 1..close], ',');
    if let Some(first) = args.first() {
        if let Some(n) = first.first().and_then(|t| t.number()) {
            let multiplier = match first.get(1) {
                Some(t) if t.is_word("K") => 1024,
                Some(t) if t.is_word("M") => 1024 * 1024,
                Some(t) if t.is_word("G") => 1024 * 1024 * 1024,
                _ => 1,
            };
            let length = n.saturating_mul(multiplier);
            column.length = Some(length);
            column.precision = u32::try_from(length).ok();
        }
    }
    if let Some(second) = args.get(1) {
        column.scale = second
            .first()
            .and_then(|t| t.number())
            .and_then(|n| u32::try_from(n).ok());
    }
    close + 1
}

fn parse_column_options(
    stmt: &str,
    opts: &[Token<'_>],
    column: &mut Db2Column,
    constraints: &mut Vec<Constraint>,
) {
    let mut pending_name: Option<String> = None;
    let mut inline = |name: &mut Option<String>, kind: ConstraintKind| {
        constraints.push(Constraint::new(name.take(), kind));
    };
    let column_name = column.name.clone();
    let own_column = || vec![column_name.clone()];

    let mut i = 0;
    while i < opts.len() {
        let token = &opts[i];
        if token.is_punct('(') {
            i = find_matching_paren(opts, i).map_or(opts.len(), |close| close + 1);
        } else if starts_with_words(opts, i, &["NOT", "NULL"]) {
            column.nullable = false;
            i += 2;
        } else if token.is_word("DEFAULT") {
            let (value, next) = read_default(stmt, opts, i + 1);
            if value.is_some() {
                column.default = value;
            }
            i = next;
        } else if starts_with_words(opts, i, &["GENERATED", "ALWAYS"]) {
            column.generated = GeneratedMode::Always;
            i += 2;
        } else if starts_with_words(opts, i, &["GENERATED", "BY", "DEFAULT"]) {
            column.generated = GeneratedMode::ByDefault;
            i += 3;
        } else if starts_with_words(opts, i, &["FOR", "BIT", "DATA"]) {
            column.for_bit_data = true;
            i += 3;
        } else if token.is_word("CCSID") {
            match opts.get(i + 1).filter(|t| matches!(t.kind, TokenKind::Word | TokenKind::Number)) {
                Some(value) => {
                    column.ccsid = Some(value.text.to_uppercase());
                    i += 2;
                }
                None => i += 1,
            }
        } else if token.is_word("FIELDPROC") {
            match read_qualified_name(opts, i + 1) {
                Some((parts, next)) => {
                    column.fieldproc = Some(parts.join("."));
                    i = next;
                }
                None => i += 1,
            }
        } else if token.is_word("CONSTRAINT") {
            pending_name = opts.get(i + 1).filter(|t| t.is_identifier()).map(|t| t.identifier());
            i += 2;
        } else if starts_with_words(opts, i, &["PRIMARY", "KEY"]) {
            inline(&mut pending_name, ConstraintKind::PrimaryKey { columns: own_column() });
            i += 2;
        } else if token.is_word("UNIQUE") {
            inline(&mut pending_name, ConstraintKind::Unique { columns: own_column() });
            i += 1;
        } else if token.is_word("CHECK") {
            match check_condition(stmt, opts, i + 1) {
                Some(kind) => {
                    inline(&mut pending_name, kind);
                    i = find_matching_paren(opts, i + 1).map_or(opts.len(), |close| close + 1);
                }
                None => i += 1,
            }
        } else if token.is_word("REFERENCES") {
            match read_qualified_name(opts, i + 1) {
                Some((parts, next)) => {
                    let (referenced_columns, after) = match read_identifier_list(opts, next) {
                        Some((cols, close)) => (cols, close + 1),
                        None => (Vec::new(), next),
                    };
                    inline(
                        &mut pending_name,
                        ConstraintKind::ForeignKey {
                            columns: own_column(),
                            references: parts.join("."),
                            referenced_columns,
                        },
                    );
                    i = after;
                }
                None => i += 1,
            }
        } else {
            i += 1;
        }
    }
}

/// Reads a DEFAULT value starting at `at`: a literal, a signed number, a
/// function call, or a `CURRENT <register>` special register.
fn read_default(stmt: &str, opts: &[Token<'_>], at: usize) -> (Option<String>, usize) {
    let Some(token) = opts.get(at) else {
        return (None, at);
    };

    let end = match token.kind {
        TokenKind::Punct('-') | TokenKind::Punct('+')
            if opts.get(at + 1).is_some_and(|t| t.kind == TokenKind::Number) =>
        {
            at + 1
        }
        TokenKind::Word if COLUMN_OPTION_WORDS.iter().any(|w| token.is_word(w)) => {
            return (None, at);
        }
        TokenKind::Word if token.is_word("CURRENT") && opts.get(at + 1).is_some_and(|t| t.kind == TokenKind::Word) => {
            at + 1
        }
        TokenKind::Word if opts.get(at + 1).is_some_and(|t| t.is_punct('(')) => {
            find_matching_paren(opts, at + 1).unwrap_or(at)
        }
        TokenKind::Punct(_) => return (None, at),
        _ => at,
    };
    (
        Some(span_text(stmt, &opts[at..=end]).to_string()),
        end + 1,
    )
}

/// `(cols) REFERENCES table [(cols)]` with the column list opened at `open`.
pub(crate) fn foreign_key(body: &[Token<'_>], open: usize) -> Option<ConstraintKind> {
    let (columns, close) = read_identifier_list(body, open)?;
    if !body.get(close + 1)?.is_word("REFERENCES") {
        return None;
    }
    let (parts, next) = read_qualified_name(body, close + 2)?;
    let referenced_columns = read_identifier_list(body, next)
        .map(|(cols, _)| cols)
        .unwrap_or_default();
    Some(ConstraintKind::ForeignKey {
        columns,
        references: parts.join("."),
        referenced_columns,
    })
}

/// Verbatim text inside the parenthesis group opened at `open`.
fn check_condition(stmt: &str, tokens: &[Token<'_>], open: usize) -> Option<ConstraintKind> {
    if !tokens.get(open)?.is_punct('(') {
        return None;
    }
    let close = find_matching_paren(tokens, open)?;
    let condition = span_text(stmt, &tokens[open + 1..close]);
    if condition.is_empty() {
        return None;
    }
    Some(ConstraintKind::Check {
        condition: condition.to_string(),
    })
}

/// Scans the text after the column list for table options.
fn parse_table_options(stmt: &str, rest: &[Token<'_>], table: &mut TableDefinition) {
    let keyword_value = |at: usize, allowed: &[&str]| -> Option<String> {
        rest.get(at)
            .filter(|t| allowed.iter().any(|w| t.is_word(w)))
            .map(|t| t.text.to_uppercase())
    };

    let mut i = 0;
    while i < rest.len() {
        let token = &rest[i];
        if token.is_punct('(') {
            i = find_matching_paren(rest, i).map_or(rest.len(), |close| close + 1);
            continue;
        }

        if token.is_word("IN") {
            let qualifies_other = i > 0 && (rest[i - 1].is_word("INDEX") || rest[i - 1].is_word("LONG"));
            if let Some((parts, next)) = read_qualified_name(rest, i + 1) {
                if !qualifies_other && table.tablespace.is_none() {
                    table.tablespace = Some(parts.join("."));
                }
                i = next;
                continue;
            }
        } else if token.is_word("EDITPROC") || token.is_word("VALIDPROC") {
            if let Some((parts, next)) = read_qualified_name(rest, i + 1) {
                let name = Some(parts.join("."));
                if token.is_word("EDITPROC") {
                    table.editproc = name;
                } else {
                    table.validproc = name;
                }
                i = next;
                continue;
            }
        } else if token.is_word("AUDIT") {
            if let Some(value) = keyword_value(i + 1, &["NONE", "CHANGES", "ALL"]) {
                table.audit = Some(value);
                i += 2;
                continue;
            }
        } else if starts_with_words(rest, i, &["DATA", "CAPTURE"]) {
            if let Some(value) = keyword_value(i + 2, &["NONE", "CHANGES"]) {
                table.data_capture = Some(value);
                i += 3;
                continue;
            }
        } else if token.is_word("CCSID") {
            if let Some(value) = keyword_value(i + 1, &["ASCII", "UNICODE", "EBCDIC"]) {
                table.ccsid = Some(value);
                i += 2;
                continue;
            }
        } else if starts_with_words(rest, i, &["PARTITION", "BY"]) {
            if let Some((spec, next)) = partition_spec(stmt, rest, i) {
                table.partition = Some(spec);
                i = next;
                continue;
            }
        }
        i += 1;
    }
}

/// `PARTITION BY [RANGE|HASH] (cols)` starting at `at`. A bare
/// `PARTITION BY (cols)` is range partitioning.
fn partition_spec(stmt: &str, rest: &[Token<'_>], at: usize) -> Option<(PartitionSpec, usize)> {
    let mut open = at + 2;
    let kind = if rest.get(open)?.is_word("HASH") {
        open += 1;
        PartitionKind::Hash
    } else {
        if rest.get(open)?.is_word("RANGE") {
            open += 1;
        }
        PartitionKind::Range
    };
    let (columns, close) = read_identifier_list(rest, open)?;
    let spec = PartitionSpec {
        kind,
        columns,
        raw: span_text(stmt, &rest[at..=close]).to_string(),
    };
    Some((spec, close + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(ddl: &str) -> TableDefinition {
        let mut parser = Db2Parser::new();
        let mut tables = parser.parse(ddl);
        assert_eq!(tables.len(), 1, "expected one table from {}", ddl);
        tables.remove(0)
    }

    #[test]
    fn test_header_forms() {
        assert_eq!(parse_one("CREATE TABLE T (A INT)").kind, Db2TableKind::Regular);
        assert_eq!(
            parse_one("CREATE VOLATILE TABLE T (A INT)").kind,
            Db2TableKind::SessionScoped(SessionScope::Volatile)
        );
        assert_eq!(
            parse_one("CREATE GLOBAL TEMPORARY TABLE T (A INT)").kind,
            Db2TableKind::SessionScoped(SessionScope::CreatedGlobalTemporary)
        );
        assert_eq!(
            parse_one("DECLARE GLOBAL TEMPORARY TABLE SESSION.T (A INT)").kind,
            Db2TableKind::SessionScoped(SessionScope::DeclaredGlobalTemporary)
        );
        assert_eq!(
            parse_one("CREATE VOLATILE GLOBAL TEMPORARY TABLE T (A INT)").kind,
            Db2TableKind::SessionScoped(SessionScope::Volatile)
        );
    }

    #[test]
    fn test_qualified_name_uses_last_two_parts() {
        let table = parse_one("CREATE TABLE DB.HR.EMP (A INT)");
        assert_eq!(table.schema.as_deref(), Some("HR"));
        assert_eq!(table.name, "EMP");
    }

    #[test]
    fn test_size_suffixes() {
        let table = parse_one("CREATE TABLE T (DOC CLOB(2M), PIC BLOB(1 G), NOTE VARCHAR(100 OCTETS))");
        assert_eq!(table.columns[0].length, Some(2 * 1024 * 1024));
        assert_eq!(table.columns[1].length, Some(1024 * 1024 * 1024));
        assert_eq!(table.columns[2].length, Some(100));
    }

    #[test]
    fn test_whole_word_types() {
        let table = parse_one("CREATE TABLE T (A DECFLOAT(34), B DOUBLE PRECISION, C CHARACTER VARYING(5))");
        assert_eq!(table.columns[0].data_type, "DECFLOAT");
        assert_eq!(table.columns[1].data_type, "DOUBLE");
        assert_eq!(table.columns[2].data_type, "CHARACTER VARYING");
        assert_eq!(table.columns[2].length, Some(5));
    }

    #[test]
    fn test_default_forms() {
        let table = parse_one(
            "CREATE TABLE T (A INT DEFAULT -1, B CHAR(3) DEFAULT 'a,b', \
             C TIMESTAMP NOT NULL DEFAULT CURRENT TIMESTAMP, D INT NOT NULL WITH DEFAULT)",
        );
        assert_eq!(table.columns.len(), 4);
        assert_eq!(table.columns[0].default.as_deref(), Some("-1"));
        assert_eq!(table.columns[1].default.as_deref(), Some("'a,b'"));
        assert_eq!(table.columns[2].default.as_deref(), Some("CURRENT TIMESTAMP"));
        assert!(!table.columns[2].nullable);
        assert_eq!(table.columns[3].default, None);
        assert!(!table.columns[3].nullable);
    }

    #[test]
    fn test_generated_identity_options_skipped() {
        let table = parse_one(
            "CREATE TABLE T (ID INTEGER GENERATED ALWAYS AS IDENTITY (START WITH 1, INCREMENT BY 1) NOT NULL)",
        );
        assert_eq!(table.columns[0].generated, GeneratedMode::Always);
        assert!(!table.columns[0].nullable);
    }

    #[test]
    fn test_inline_constraints() {
        let table = parse_one(
            "CREATE TABLE T (ID INTEGER NOT NULL PRIMARY KEY, \
             STATUS CHAR(1) CHECK (STATUS IN ('A','I')), \
             DEPT_ID INTEGER CONSTRAINT FK_D REFERENCES HR.DEPT(ID))",
        );
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.constraints.len(), 3);
        assert_eq!(table.constraints[0].kind, ConstraintKind::PrimaryKey { columns: vec!["ID".into()] });
        assert_eq!(
            table.constraints[1].kind,
            ConstraintKind::Check { condition: "STATUS IN ('A','I')".into() }
        );
        assert_eq!(table.constraints[2].name.as_deref(), Some("FK_D"));
        assert_eq!(
            table.constraints[2].kind,
            ConstraintKind::ForeignKey {
                columns: vec!["DEPT_ID".into()],
                references: "HR.DEPT".into(),
                referenced_columns: vec!["ID".into()],
            }
        );
    }

    #[test]
    fn test_table_options() {
        let table = parse_one(
            "CREATE TABLE T (A INT) IN DB1.TS1 INDEX IN TS2 EDITPROC MYEDIT VALIDPROC MYVAL \
             AUDIT CHANGES DATA CAPTURE CHANGES CCSID UNICODE PARTITION BY HASH (A)",
        );
        assert_eq!(table.tablespace.as_deref(), Some("DB1.TS1"));
        assert_eq!(table.editproc.as_deref(), Some("MYEDIT"));
        assert_eq!(table.validproc.as_deref(), Some("MYVAL"));
        assert_eq!(table.audit.as_deref(), Some("CHANGES"));
        assert_eq!(table.data_capture.as_deref(), Some("CHANGES"));
        assert_eq!(table.ccsid.as_deref(), Some("UNICODE"));
        let partition = table.partition.unwrap();
        assert_eq!(partition.kind, PartitionKind::Hash);
        assert_eq!(partition.columns, vec!["A".to_string()]);
        assert_eq!(partition.raw, "PARTITION BY HASH (A)");
    }

    #[test]
    fn test_bare_partition_is_range() {
        let table = parse_one("CREATE TABLE T (A INT, B DATE) PARTITION BY (B) (STARTING '2020-01-01' ENDING '2020-12-31')");
        let partition = table.partition.unwrap();
        assert_eq!(partition.kind, PartitionKind::Range);
        assert_eq!(partition.columns, vec!["B".to_string()]);
    }

    #[test]
    fn test_unknown_type_drops_column_with_warning() {
        let mut parser = Db2Parser::new();
        let tables = parser.parse("CREATE TABLE T (A INT, B FOOTYPE(3), C DATE)");
        assert_eq!(tables[0].columns.len(), 2);
        assert_eq!(parser.warnings().len(), 1);
        assert!(matches!(
            parser.warnings()[0],
            ParseDiagnostic::UnknownDataType { ref column, .. } if column == "B"
        ));
    }

    #[test]
    fn test_statement_errors_and_reset() {
        let mut parser = Db2Parser::new();
        let tables = parser.parse("CREATE TABLE T A INT; CREATE TABLE U (A INT");
        assert!(tables.is_empty());
        assert_eq!(parser.errors().len(), 2);

        parser.parse("CREATE TABLE V (A INT)");
        assert!(parser.errors().is_empty());
        assert!(parser.warnings().is_empty());
    }

    #[test]
    fn test_non_table_statements_are_skipped() {
        let mut parser = Db2Parser::new();
        let tables = parser.parse("CREATE INDEX I ON T (A); CREATE VIEW V AS SELECT 1; CREATE TABLE T (A INT)");
        assert_eq!(tables.len(), 1);
        assert!(parser.errors().is_empty());
    }

    #[test]
    fn test_trailing_backslash_in_default_keeps_next_statement() {
        let mut parser = Db2Parser::new();
        let tables = parser.parse("CREATE TABLE A (P VARCHAR(10) DEFAULT 'C:\\'); CREATE TABLE B (X INT);");
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].name, "B");
        assert!(parser.errors().is_empty());
    }
}
