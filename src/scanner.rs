//! SQL lexer and the bracket/string aware helpers shared by both dialect parsers.
//!
//! The lexer only knows the handful of token classes DDL parsing needs:
//! words, numbers, single-quoted string literals, double-quoted (or
//! backtick-quoted) identifiers, and single-character punctuation. `--` line
//! comments and `/* */` block comments are skipped as trivia. Every token
//! keeps its byte span into the source so callers can recover raw text
//! (CHECK conditions, DEFAULT expressions, partition clauses) verbatim.

/// Dialect-level lexical rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexicon {
    /// Characters that end a statement at parenthesis depth 0.
    pub terminators: &'static [char],
    /// `\` escapes the next character inside `'...'`.
    pub backslash_escapes: bool,
}

/// DB2: `;` or `@` terminate, and `''` is the only escape in literals.
pub const DB2: Lexicon = Lexicon {
    terminators: &[';', '@'],
    backslash_escapes: false,
};

/// Snowflake: `;` terminates, and literals accept backslash escapes.
pub const SNOWFLAKE: Lexicon = Lexicon {
    terminators: &[';'],
    backslash_escapes: true,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Number,
    /// `'...'`, quotes included in the token text.
    StringLiteral,
    /// `"..."` or `` `...` ``, delimiters included in the token text.
    QuotedIdent,
    Punct(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl<'a> Token<'a> {
    /// Case-insensitive keyword comparison. Quoted identifiers never match.
    pub fn is_word(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(keyword)
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    /// True for tokens that can name a table, column or constraint.
    pub fn is_identifier(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Word | TokenKind::QuotedIdent | TokenKind::StringLiteral
        )
    }

    /// Identifier value with quoting removed; case is preserved.
    pub fn identifier(&self) -> String {
        match self.kind {
            TokenKind::QuotedIdent | TokenKind::StringLiteral => unquote(self.text),
            _ => self.text.to_string(),
        }
    }

    /// Parses a `Number` token; `None` for anything else or on overflow.
    pub fn number(&self) -> Option<u64> {
        match self.kind {
            TokenKind::Number => self.text.split('.').next()?.parse().ok(),
            _ => None,
        }
    }
}

/// Removes one level of quoting (`'`, `"` or `` ` ``) and collapses doubled
/// delimiters. Unquoted text is returned unchanged.
pub fn unquote(text: &str) -> String {
    let mut chars = text.chars();
    let Some(open) = chars.next() else {
        return String::new();
    };
    if !matches!(open, '\'' | '"' | '`') {
        return text.to_string();
    }
    let inner = &text[open.len_utf8()..];
    let inner = inner.strip_suffix(open).unwrap_or(inner);
    let doubled: String = [open, open].iter().collect();
    inner.replace(&doubled, &open.to_string())
}

/// Splits `src` into tokens.
pub fn tokenize<'a>(src: &'a str, lexicon: &Lexicon) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(ch) = src[pos..].chars().next() {
        let start = pos;
        if ch.is_whitespace() {
            pos += ch.len_utf8();
            continue;
        }
        let rest = &src[pos..];
        if rest.starts_with("--") {
            pos = rest.find('\n').map_or(src.len(), |n| pos + n);
            continue;
        }
        if rest.starts_with("/*") {
            pos = rest[2..].find("*/").map_or(src.len(), |n| pos + 2 + n + 2);
            continue;
        }

        let kind = match ch {
            '\'' => {
                pos = scan_quoted(src, pos, '\'', lexicon.backslash_escapes);
                TokenKind::StringLiteral
            }
            '"' | '`' => {
                pos = scan_quoted(src, pos, ch, false);
                TokenKind::QuotedIdent
            }
            c if c.is_ascii_digit() => {
                pos = scan_number(src, pos);
                TokenKind::Number
            }
            c if c.is_alphabetic() || c == '_' => {
                pos = scan_while(src, pos, |c| c.is_alphanumeric() || matches!(c, '_' | '$' | '#'));
                TokenKind::Word
            }
            c => {
                pos += c.len_utf8();
                TokenKind::Punct(c)
            }
        };

        tokens.push(Token {
            kind,
            text: &src[start..pos],
            start,
            end: pos,
        });
    }

    tokens
}

fn scan_quoted(src: &str, start: usize, delim: char, backslash_escapes: bool) -> usize {
    let mut iter = src[start..].char_indices().skip(1).peekable();
    while let Some((offset, c)) = iter.next() {
        if backslash_escapes && c == '\\' {
            iter.next();
            continue;
        }
        if c == delim {
            if matches!(iter.peek(), Some((_, next)) if *next == delim) {
                iter.next();
                continue;
            }
            return start + offset + c.len_utf8();
        }
    }
    src.len()
}

fn scan_number(src: &str, start: usize) -> usize {
    let mut end = scan_while(src, start, |c| c.is_ascii_digit());
    let rest = &src[end..];
    if rest.starts_with('.') && rest[1..].starts_with(|c: char| c.is_ascii_digit()) {
        end = scan_while(src, end + 1, |c| c.is_ascii_digit());
    }
    end
}

fn scan_while(src: &str, start: usize, pred: impl Fn(char) -> bool) -> usize {
    src[start..]
        .char_indices()
        .find(|(_, c)| !pred(*c))
        .map_or(src.len(), |(offset, _)| start + offset)
}

/// Splits a script into statements on the dialect's terminators.
///
/// Terminators inside string literals, quoted identifiers, comments, or an
/// open parenthesis group do not split. Each statement is trimmed and has
/// its terminator removed; a trailing statement without terminator is kept.
pub fn split_statements<'a>(src: &'a str, lexicon: &Lexicon) -> Vec<&'a str> {
    let mut statements = Vec::new();
    let mut depth = 0usize;
    let mut stmt_start = 0;

    for token in tokenize(src, lexicon) {
        match token.kind {
            TokenKind::Punct('(') => depth += 1,
            TokenKind::Punct(')') => depth = depth.saturating_sub(1),
            TokenKind::Punct(c) if depth == 0 && lexicon.terminators.contains(&c) => {
                push_statement(&mut statements, &src[stmt_start..token.start]);
                stmt_start = token.end;
            }
            _ => {}
        }
    }
    push_statement(&mut statements, &src[stmt_start..]);

    statements
}

fn push_statement<'a>(statements: &mut Vec<&'a str>, text: &'a str) {
    let text = text.trim();
    if !text.is_empty() {
        statements.push(text);
    }
}

/// Drops blank and `--` comment lines that precede the first line of code.
pub fn strip_leading_comments(stmt: &str) -> &str {
    let mut offset = 0;
    for line in stmt.split_inclusive('\n') {
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with("--") {
            break;
        }
        offset += line.len();
    }
    stmt[offset..].trim()
}

/// Index of the `)` closing the `(` at `open`, tracking nesting depth.
pub fn find_matching_paren(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(open) {
        if token.is_punct('(') {
            depth += 1;
        } else if token.is_punct(')') {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

/// Splits a token run on `sep` occurring at parenthesis depth zero.
/// Empty groups are dropped.
pub fn split_top_level<'t, 'a>(tokens: &'t [Token<'a>], sep: char) -> Vec<&'t [Token<'a>]> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Punct('(') => depth += 1,
            TokenKind::Punct(')') => depth = depth.saturating_sub(1),
            TokenKind::Punct(c) if c == sep && depth == 0 => {
                if idx > start {
                    groups.push(&tokens[start..idx]);
                }
                start = idx + 1;
            }
            _ => {}
        }
    }
    if start < tokens.len() {
        groups.push(&tokens[start..]);
    }

    groups
}

/// Source text spanned by a token run.
pub fn span_text<'a>(src: &'a str, tokens: &[Token<'_>]) -> &'a str {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => &src[first.start..last.end],
        _ => "",
    }
}

/// True when `tokens[at..]` starts with the keyword sequence.
pub fn starts_with_words(tokens: &[Token<'_>], at: usize, words: &[&str]) -> bool {
    words.len() <= tokens.len().saturating_sub(at)
        && words
            .iter()
            .zip(&tokens[at..])
            .all(|(word, token)| token.is_word(word))
}

/// Position of the first occurrence of a keyword sequence at parenthesis
/// depth zero.
pub fn find_words(tokens: &[Token<'_>], words: &[&str]) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Punct('(') => depth += 1,
            TokenKind::Punct(')') => depth = depth.saturating_sub(1),
            _ if depth == 0 && starts_with_words(tokens, idx, words) => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Reads a possibly qualified name (`a`, `a.b`, `a.b.c`) starting at `at`.
/// Returns the unquoted parts and the index just past the name.
pub fn read_qualified_name(tokens: &[Token<'_>], at: usize) -> Option<(Vec<String>, usize)> {
    let first = tokens.get(at).filter(|t| t.is_identifier())?;
    let mut parts = vec![first.identifier()];
    let mut idx = at + 1;
    while tokens.get(idx).is_some_and(|t| t.is_punct('.')) {
        match tokens.get(idx + 1).filter(|t| t.is_identifier()) {
            Some(part) => {
                parts.push(part.identifier());
                idx += 2;
            }
            None => break,
        }
    }
    Some((parts, idx))
}

/// Identifier list inside the parenthesis group opened at `open`, e.g. the
/// `(A, B)` of `PRIMARY KEY (A, B)`. Returns the names and the index of the
/// closing parenthesis.
pub fn read_identifier_list(tokens: &[Token<'_>], open: usize) -> Option<(Vec<String>, usize)> {
    if !tokens.get(open)?.is_punct('(') {
        return None;
    }
    let close = find_matching_paren(tokens, open)?;
    let names = split_top_level(&tokens[open + 1..close], ',')
        .into_iter()
        .filter_map(|group| group.first().filter(|t| t.is_identifier()).map(|t| t.identifier()))
        .collect::<Vec<_>>();
    Some((names, close))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_classes() {
        let tokens = tokenize(r#"CREATE TABLE "My Tab" (A VARCHAR(10) DEFAULT 'x, y')"#, &DB2);
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds[0], TokenKind::Word);
        assert_eq!(kinds[2], TokenKind::QuotedIdent);
        assert_eq!(tokens[2].identifier(), "My Tab");
        assert_eq!(tokens[7].number(), Some(10));
        assert_eq!(tokens[10].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[10].text, "'x, y'");
    }

    #[test]
    fn test_tokenize_skips_comments() {
        let tokens = tokenize("A -- comment ; here\n/* block ; */ B", &DB2);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["A", "B"]);
    }

    #[test]
    fn test_escaped_quotes() {
        let tokens = tokenize("'it''s' 'a\\'b' X", &SNOWFLAKE);
        assert_eq!(tokens.len(), 3);
        assert_eq!(unquote(tokens[0].text), "it's");
        assert_eq!(tokens[2].text, "X");
    }

    #[test]
    fn test_db2_backslash_is_literal() {
        let tokens = tokenize("'C:\\' X 'it''s'", &DB2);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["'C:\\'", "X", "'it''s'"]);

        let script = "CREATE TABLE A (P VARCHAR(10) DEFAULT 'C:\\'); CREATE TABLE B (X INT);";
        assert_eq!(split_statements(script, &DB2).len(), 2);
    }

    #[test]
    fn test_split_statements_dual_terminators() {
        let script = "CREATE TABLE A (X INT);\nCREATE TABLE B (Y INT)@\nCREATE TABLE C (Z INT)";
        let stmts = split_statements(script, &DB2);
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[1], "CREATE TABLE B (Y INT)");
        assert_eq!(stmts[2], "CREATE TABLE C (Z INT)");
    }

    #[test]
    fn test_split_statements_ignores_terminators_in_literals_and_parens() {
        let script = "CREATE TABLE A (X CHAR(1) DEFAULT ';', Y INT CHECK (Y > 0; 1));";
        let stmts = split_statements(script, &DB2);
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn test_split_statements_snowflake_keeps_at_sign() {
        let script = "CREATE EXTERNAL TABLE E (A INT) LOCATION = @stage/path;";
        let stmts = split_statements(script, &SNOWFLAKE);
        assert_eq!(stmts.len(), 1);
        assert!(stmts[0].ends_with("@stage/path"));
    }

    #[test]
    fn test_strip_leading_comments() {
        let stmt = "-- header\n\n-- more\nCREATE TABLE T (A INT)\n-- trailing";
        assert_eq!(
            strip_leading_comments(stmt),
            "CREATE TABLE T (A INT)\n-- trailing"
        );
        assert_eq!(strip_leading_comments("-- only a comment"), "");
    }

    #[test]
    fn test_find_matching_paren_nested() {
        let tokens = tokenize("(A DECIMAL(5,2), B INT) X", &DB2);
        assert_eq!(find_matching_paren(&tokens, 0), Some(11));
        let unbalanced = tokenize("(A DECIMAL(5,2)", &DB2);
        assert_eq!(find_matching_paren(&unbalanced, 0), None);
    }

    #[test]
    fn test_split_top_level() {
        let tokens = tokenize("A DECIMAL(5,2), B CHAR(1) DEFAULT ',', , C INT", &DB2);
        let groups = split_top_level(&tokens, ',');
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[2][0].text, "C");
    }

    #[test]
    fn test_find_words_top_level_only() {
        let tokens = tokenize("CHECK (A IS NOT NULL) NOT NULL", &DB2);
        assert_eq!(find_words(&tokens, &["NOT", "NULL"]), Some(7));
        let inner = tokenize("CHECK (A IS NOT NULL)", &DB2);
        assert_eq!(find_words(&inner, &["NOT", "NULL"]), None);
    }

    #[test]
    fn test_read_qualified_name() {
        let tokens = tokenize(r#"DB."Sch".T ("#, &DB2);
        let (parts, next) = read_qualified_name(&tokens, 0).unwrap();
        assert_eq!(parts, vec!["DB", "Sch", "T"]);
        assert!(tokens[next].is_punct('('));
    }

    #[test]
    fn test_read_identifier_list() {
        let tokens = tokenize(r#"("A", b , C)"#, &DB2);
        let (names, close) = read_identifier_list(&tokens, 0).unwrap();
        assert_eq!(names, vec!["A", "b", "C"]);
        assert_eq!(close, tokens.len() - 1);
    }
}
