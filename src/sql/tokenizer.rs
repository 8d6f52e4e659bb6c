use crate::errors;
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashSet;

lazy_static! {
    static ref KEYWORDS: HashSet<&'static str> = [
        "SELECT", "FROM", "WHERE", "AND", "OR", "NOT", "INSERT", "INTO", "VALUES", "UPDATE",
        "SET", "DELETE", "JOIN", "INNER", "LEFT", "RIGHT", "FULL", "OUTER", "ON", "GROUP", "BY",
        "HAVING", "ORDER", "ASC", "DESC", "LIMIT", "OFFSET", "DISTINCT", "AS", "IN", "LIKE",
        "BETWEEN", "IS", "NULL", "EXISTS", "CASE", "WHEN", "THEN", "ELSE", "END", "UNION", "ALL",
        "CREATE", "TABLE", "DROP",
    ]
    .into_iter()
    .collect();
    static ref FUNCTIONS: HashSet<&'static str> = [
        "COUNT", "SUM", "AVG", "MIN", "MAX", "UPPER", "LOWER", "LENGTH", "SUBSTRING", "DATE",
        "NOW", "YEAR", "MONTH", "DAY", "CONCAT", "COALESCE", "CAST", "ROUND",
    ]
    .into_iter()
    .collect();
}

/// Operators in match priority: two-character forms first.
const OPERATORS: [&str; 11] = ["!=", "<>", ">=", "<=", "=", ">", "<", "+", "-", "*", "/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Keyword,
    Function,
    String,
    Number,
    Operator,
    Identifier,
    Comment,
    Default,
}

/// A classified slice of SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightedToken {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

impl HighlightedToken {
    fn new(text: &str, kind: TokenKind) -> Self {
        Self {
            text: text.to_string(),
            kind,
        }
    }
}

/// Splits SQL text into classified tokens in a single left-to-right pass.
///
/// Every character of the input lands in exactly one token, so joining the
/// token texts gives back the input unchanged. Unterminated strings run to
/// the end of the input instead of failing.
///
/// # Arguments
/// * `sql` - The raw SQL text.
///
/// # Returns
/// The tokens, or an `errors::Error` if a scan step stalls or splits a
/// character.
pub fn tokenize_sql(sql: &str) -> Result<Vec<HighlightedToken>, errors::Error> {
    tokenize_with(sql, next_token)
}

/// Drives `step` across `sql`; `step` returns the end offset and kind of
/// the token starting at the given offset.
fn tokenize_with(
    sql: &str,
    step: impl Fn(&str, usize) -> (usize, TokenKind),
) -> Result<Vec<HighlightedToken>, errors::Error> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < sql.len() {
        let (end, kind) = step(sql, pos);
        if end <= pos || end > sql.len() || !sql.is_char_boundary(end) {
            return Err(errors::Error::Syntax(format!(
                "Tokenizer stalled at byte {}.",
                pos
            )));
        }
        tokens.push(HighlightedToken::new(&sql[pos..end], kind));
        pos = end;
    }

    Ok(tokens)
}

fn next_token(sql: &str, pos: usize) -> (usize, TokenKind) {
    let bytes = sql.as_bytes();
    if sql[pos..].starts_with("--") {
        (scan_comment(sql, pos), TokenKind::Comment)
    } else if bytes[pos] == b'\'' || bytes[pos] == b'"' {
        (scan_string(bytes, pos), TokenKind::String)
    } else if bytes[pos].is_ascii_digit() {
        (scan_while(bytes, pos, |b| b.is_ascii_digit() || b == b'.'), TokenKind::Number)
    } else if let Some(op) = OPERATORS.iter().find(|op| sql[pos..].starts_with(*op)) {
        (pos + op.len(), TokenKind::Operator)
    } else if bytes[pos].is_ascii_alphabetic() || bytes[pos] == b'_' {
        let end = scan_while(bytes, pos, |b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.');
        (end, classify_word(&sql[pos..end]))
    } else {
        let width = sql[pos..].chars().next().map_or(1, char::len_utf8);
        (pos + width, TokenKind::Default)
    }
}

fn scan_comment(sql: &str, start: usize) -> usize {
    sql[start..].find('\n').map_or(sql.len(), |i| start + i)
}

/// Consumes a quoted string, honouring backslash escapes. Returns the end
/// offset just past the closing quote, or the input length if unterminated.
fn scan_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut end = start + 1;
    while end < bytes.len() && bytes[end] != quote {
        if bytes[end] == b'\\' && end + 1 < bytes.len() {
            end += 1;
        }
        end += 1;
    }
    (end + 1).min(bytes.len())
}

fn scan_while(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut end = start;
    while end < bytes.len() && pred(bytes[end]) {
        end += 1;
    }
    end
}

fn classify_word(word: &str) -> TokenKind {
    let upper = word.to_ascii_uppercase();
    if KEYWORDS.contains(upper.as_str()) {
        TokenKind::Keyword
    } else if FUNCTIONS.contains(upper.as_str()) {
        TokenKind::Function
    } else {
        TokenKind::Identifier
    }
}
