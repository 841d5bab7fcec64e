//! Snowflake `CREATE TABLE` parser.
//!
//! Shares the lexer and diagnostics policy with the DB2 parser: a bad column
//! or constraint is dropped with a warning, a bad statement is dropped with
//! an error, and other statements are ignored.

use log::{debug, warn};

use super::model::{SnowflakeColumn, SnowflakeTable, SnowflakeTableKind};
use crate::db2::parser::foreign_key;
use crate::error::{excerpt, ParseDiagnostic};
use crate::model::{Constraint, ConstraintKind};
use crate::scanner::{
    find_matching_paren, find_words, read_identifier_list, read_qualified_name, span_text,
    split_statements, split_top_level, starts_with_words, strip_leading_comments, tokenize, unquote,
    Token, TokenKind, SNOWFLAKE,
};

/// Header modifiers and the kind each one selects.
const KIND_MODIFIERS: &[(&[&str], SnowflakeTableKind)] = &[
    (&["LOCAL", "TEMPORARY"], SnowflakeTableKind::Temporary),
    (&["LOCAL", "TEMP"], SnowflakeTableKind::Temporary),
    (&["GLOBAL", "TEMPORARY"], SnowflakeTableKind::Temporary),
    (&["GLOBAL", "TEMP"], SnowflakeTableKind::Temporary),
    (&["TEMPORARY"], SnowflakeTableKind::Temporary),
    (&["TEMP"], SnowflakeTableKind::Temporary),
    (&["VOLATILE"], SnowflakeTableKind::Temporary),
    (&["TRANSIENT"], SnowflakeTableKind::Transient),
    (&["DYNAMIC"], SnowflakeTableKind::Dynamic),
    (&["EXTERNAL"], SnowflakeTableKind::External),
    (&["HYBRID"], SnowflakeTableKind::Hybrid),
];

const MULTI_WORD_TYPES: &[&[&str]] = &[
    &["DOUBLE", "PRECISION"],
    &["CHARACTER", "VARYING"],
    &["CHAR", "VARYING"],
];

const CONSTRAINT_KEYWORDS: &[&[&str]] = &[
    &["PRIMARY", "KEY"],
    &["FOREIGN", "KEY"],
    &["UNIQUE"],
    &["CONSTRAINT"],
];

/// Words that cannot start a DEFAULT expression.
const COLUMN_OPTION_WORDS: &[&str] = &[
    "NOT", "IDENTITY", "AUTOINCREMENT", "COMMENT", "COLLATE", "WITH", "MASKING", "PRIMARY", "UNIQUE",
    "REFERENCES", "CONSTRAINT", "TAG",
];

#[derive(Debug, Default)]
pub struct SnowflakeParser {
    warnings: Vec<ParseDiagnostic>,
    errors: Vec<ParseDiagnostic>,
}

impl SnowflakeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every table definition in `ddl`, in script order.
    pub fn parse(&mut self, ddl: &str) -> Vec<SnowflakeTable> {
        self.warnings.clear();
        self.errors.clear();

        let mut tables = Vec::new();
        for stmt in split_statements(ddl, &SNOWFLAKE) {
            let stmt = strip_leading_comments(stmt);
            if stmt.is_empty() {
                continue;
            }
            if let Some(table) = self.parse_statement(stmt) {
                debug!(
                    "Parsed Snowflake {} table {} ({} columns)",
                    table.kind,
                    table.full_name(),
                    table.columns.len()
                );
                tables.push(table);
            }
        }
        tables
    }

    pub fn warnings(&self) -> &[ParseDiagnostic] {
        &self.warnings
    }

    pub fn errors(&self) -> &[ParseDiagnostic] {
        &self.errors
    }

    fn parse_statement(&mut self, stmt: &str) -> Option<SnowflakeTable> {
        let tokens = tokenize(stmt, &SNOWFLAKE);
        let (kind, name_at) = match_header(&tokens)?;

        let Some((parts, after_name)) = read_qualified_name(&tokens, name_at) else {
            self.errors
                .push(ParseDiagnostic::UnrecognizedHeader(excerpt(stmt)));
            return None;
        };

        let mut table = SnowflakeTable {
            kind,
            raw_ddl: stmt.to_string(),
            ..Default::default()
        };
        (table.database, table.schema, table.name) = split_name(parts);

        let has_column_list = tokens.get(after_name).is_some_and(|t| t.is_punct('('));
        if !has_column_list {
            // Dynamic and external tables may derive their columns from a
            // query or a stage; they are never converted, so keep the name.
            if kind.is_skipped() {
                parse_table_options(stmt, &tokens[after_name..], &mut table);
                return Some(table);
            }
            self.errors
                .push(ParseDiagnostic::UnrecognizedHeader(excerpt(stmt)));
            return None;
        }

        let Some(close) = find_matching_paren(&tokens, after_name) else {
            self.errors
                .push(ParseDiagnostic::UnbalancedColumnList(table.full_name()));
            return None;
        };

        for chunk in split_top_level(&tokens[after_name + 1..close], ',') {
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
    ) -> Option<SnowflakeColumn> {
        let definition = span_text(stmt, chunk);
        let Some(name_token) = chunk.first().filter(|t| t.is_identifier()) else {
            warn!("Skipping column without a name: {}", excerpt(definition));
            self.warnings
                .push(ParseDiagnostic::ColumnName(excerpt(definition)));
            return None;
        };
        let name = name_token.identifier();

        let Some((data_type, after_type)) = match_type(chunk, 1) else {
            warn!("Skipping column {} without a data type", name);
            self.warnings.push(ParseDiagnostic::UnknownDataType {
                column: name,
                definition: excerpt(definition),
            });
            return None;
        };

        let mut column = SnowflakeColumn::new(name, data_type);
        let options_at = read_type_args(stmt, chunk, after_type, &mut column);
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

/// `CREATE [OR REPLACE] [modifier] TABLE [IF NOT EXISTS]`. Returns the kind
/// and the index of the table name.
fn match_header(tokens: &[Token<'_>]) -> Option<(SnowflakeTableKind, usize)> {
    if !tokens.first()?.is_word("CREATE") {
        return None;
    }
    let mut at = 1;
    if starts_with_words(tokens, at, &["OR", "REPLACE"]) {
        at += 2;
    }

    let mut kind = SnowflakeTableKind::Regular;
    if let Some((words, modifier)) = KIND_MODIFIERS
        .iter()
        .find(|(words, _)| starts_with_words(tokens, at, words))
    {
        kind = *modifier;
        at += words.len();
    }

    if !starts_with_words(tokens, at, &["TABLE"]) {
        return None;
    }
    at += 1;
    if starts_with_words(tokens, at, &["IF", "NOT", "EXISTS"]) {
        at += 3;
    }
    Some((kind, at))
}

/// Assigns name parts right to left: table, schema, database.
fn split_name(mut parts: Vec<String>) -> (Option<String>, Option<String>, String) {
    let name = parts.pop().unwrap_or_default();
    let schema = parts.pop();
    let database = parts.pop();
    (database, schema, name)
}

fn is_constraint_start(chunk: &[Token<'_>]) -> bool {
    CONSTRAINT_KEYWORDS
        .iter()
        .any(|words| starts_with_words(chunk, 0, words))
}

/// Base type name at `at`, upper-cased.
fn match_type(chunk: &[Token<'_>], at: usize) -> Option<(String, usize)> {
    if let Some(words) = MULTI_WORD_TYPES
        .iter()
        .find(|words| starts_with_words(chunk, at, words))
    {
        return Some((words.join(" "), at + words.len()));
    }
    chunk
        .get(at)
        .filter(|t| t.kind == TokenKind::Word)
        .map(|t| (t.text.to_uppercase(), at + 1))
}

/// Reads the type's parenthesized arguments, if any. Numeric arguments also
/// fill length, precision and scale.
fn read_type_args(stmt: &str, chunk: &[Token<'_>], at: usize, column: &mut SnowflakeColumn) -> usize {
    if !chunk.get(at).is_some_and(|t| t.is_punct('(')) {
        return at;
    }
    let Some(close) = find_matching_paren(chunk, at) else {
        return at;
    };

    let inner = &chunk[at + 1..close];
    column.type_args = Some(span_text(stmt, inner).to_string());

    let args = split_top_level(inner, ',');
    if let Some(n) = args.first().and_then(|a| a.first()).and_then(|t| t.number()) {
        column.length = Some(n);
        column.precision = u32::try_from(n).ok();
    }
    column.scale = args
        .get(1)
        .and_then(|a| a.first())
        .and_then(|t| t.number())
        .and_then(|n| u32::try_from(n).ok());
    close + 1
}

fn parse_column_options(
    stmt: &str,
    opts: &[Token<'_>],
    column: &mut SnowflakeColumn,
    constraints: &mut Vec<Constraint>,
) {
    let mut pending_name: Option<String> = None;
    let column_name = column.name.clone();

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
        } else if token.is_word("IDENTITY") || token.is_word("AUTOINCREMENT") {
            let (identity, next) = read_identity(opts, i + 1);
            column.identity = Some(identity);
            i = next;
        } else if token.is_word("COMMENT") {
            let at = skip_equals(opts, i + 1);
            match opts.get(at).filter(|t| t.kind == TokenKind::StringLiteral) {
                Some(literal) => {
                    column.comment = Some(unquote(literal.text));
                    i = at + 1;
                }
                None => i += 1,
            }
        } else if token.is_word("COLLATE") {
            match opts.get(i + 1).filter(|t| t.is_identifier()) {
                Some(value) => {
                    column.collate = Some(value.identifier());
                    i += 2;
                }
                None => i += 1,
            }
        } else if starts_with_words(opts, i, &["WITH", "MASKING", "POLICY"])
            || starts_with_words(opts, i, &["MASKING", "POLICY"])
        {
            let at = if token.is_word("WITH") { i + 3 } else { i + 2 };
            match read_qualified_name(opts, at) {
                Some((parts, next)) => {
                    column.masking_policy = Some(parts.join("."));
                    i = next;
                }
                None => i = at,
            }
        } else if token.is_word("CONSTRAINT") {
            pending_name = opts.get(i + 1).filter(|t| t.is_identifier()).map(|t| t.identifier());
            i += 2;
        } else if starts_with_words(opts, i, &["PRIMARY", "KEY"]) {
            constraints.push(Constraint::new(
                pending_name.take(),
                ConstraintKind::PrimaryKey { columns: vec![column_name.clone()] },
            ));
            i += 2;
        } else if token.is_word("UNIQUE") {
            constraints.push(Constraint::new(
                pending_name.take(),
                ConstraintKind::Unique { columns: vec![column_name.clone()] },
            ));
            i += 1;
        } else if token.is_word("REFERENCES") {
            match read_qualified_name(opts, i + 1) {
                Some((parts, next)) => {
                    let (referenced_columns, after) = match read_identifier_list(opts, next) {
                        Some((cols, close)) => (cols, close + 1),
                        None => (Vec::new(), next),
                    };
                    constraints.push(Constraint::new(
                        pending_name.take(),
                        ConstraintKind::ForeignKey {
                            columns: vec![column_name.clone()],
                            references: parts.join("."),
                            referenced_columns,
                        },
                    ));
                    i = after;
                }
                None => i += 1,
            }
        } else {
            i += 1;
        }
    }
}

fn skip_equals(tokens: &[Token<'_>], at: usize) -> usize {
    if tokens.get(at).is_some_and(|t| t.is_punct('=')) {
        at + 1
    } else {
        at
    }
}

/// DEFAULT value at `at`: a literal, a signed number, a function call, or a
/// (possibly qualified) name such as `SEQ1.NEXTVAL`.
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
        TokenKind::Word if opts.get(at + 1).is_some_and(|t| t.is_punct('(')) => {
            find_matching_paren(opts, at + 1).unwrap_or(at)
        }
        TokenKind::Word => read_qualified_name(opts, at).map_or(at, |(_, next)| next - 1),
        TokenKind::Punct(_) => return (None, at),
        _ => at,
    };
    (
        Some(span_text(stmt, &opts[at..=end]).to_string()),
        end + 1,
    )
}

/// `(seed, step)` or `START s INCREMENT i` after IDENTITY/AUTOINCREMENT.
/// Defaults to `1,1`.
fn read_identity(opts: &[Token<'_>], at: usize) -> (String, usize) {
    let number_at = |idx: usize| opts.get(idx).and_then(|t| t.number());

    if opts.get(at).is_some_and(|t| t.is_punct('(')) {
        if let Some(close) = find_matching_paren(opts, at) {
            let args: Vec<String> = split_top_level(&opts[at + 1..close], ',')
                .into_iter()
                .filter_map(|group| group.first().and_then(|t| t.number()))
                .map(|n| n.to_string())
                .collect();
            let identity = if args.len() == 2 { args.join(",") } else { "1,1".to_string() };
            return (identity, close + 1);
        }
    }

    if opts.get(at).is_some_and(|t| t.is_word("START")) {
        let seed_at = skip_equals(opts, at + 1);
        if let Some(seed) = number_at(seed_at) {
            let mut next = seed_at + 1;
            let mut step = 1;
            if opts.get(next).is_some_and(|t| t.is_word("INCREMENT")) {
                let step_at = skip_equals(opts, next + 1);
                if let Some(n) = number_at(step_at) {
                    step = n;
                    next = step_at + 1;
                }
            }
            return (format!("{},{}", seed, step), next);
        }
    }

    ("1,1".to_string(), at)
}

/// Scans table options up to the end of the statement or a top-level `AS`.
fn parse_table_options(stmt: &str, rest: &[Token<'_>], table: &mut SnowflakeTable) {
    let mut i = 0;
    while i < rest.len() {
        let token = &rest[i];
        if token.is_word("AS") {
            break;
        }
        if starts_with_words(rest, i, &["CLUSTER", "BY"]) {
            let open = i + 2;
            if rest.get(open).is_some_and(|t| t.is_punct('(')) {
                if let Some(close) = find_matching_paren(rest, open) {
                    table.cluster_by = split_top_level(&rest[open + 1..close], ',')
                        .into_iter()
                        .map(|expr| span_text(stmt, expr).to_string())
                        .collect();
                    i = close + 1;
                    continue;
                }
            }
        } else if token.is_punct('(') {
            i = find_matching_paren(rest, i).map_or(rest.len(), |close| close + 1);
            continue;
        } else if token.is_word("COMMENT") {
            let at = skip_equals(rest, i + 1);
            if let Some(literal) = rest.get(at).filter(|t| t.kind == TokenKind::StringLiteral) {
                table.comment = Some(unquote(literal.text));
                i = at + 1;
                continue;
            }
        } else if token.is_word("DATA_RETENTION_TIME_IN_DAYS") {
            let at = skip_equals(rest, i + 1);
            if let Some(days) = rest.get(at).and_then(|t| t.number()) {
                table.data_retention_days = u32::try_from(days).ok();
                i = at + 1;
                continue;
            }
        } else if token.is_word("CHANGE_TRACKING") {
            let at = skip_equals(rest, i + 1);
            if let Some(value) = rest.get(at).filter(|t| t.kind == TokenKind::Word) {
                table.change_tracking = value.is_word("TRUE");
                i = at + 1;
                continue;
            }
        }
        i += 1;
    }
}
