use super::tokenizer::{tokenize_sql, HighlightedToken, TokenKind};
use crate::errors;
use tracing::warn;

impl TokenKind {
    /// Utility classes the web front end styles each token kind with.
    pub fn css_class(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "text-blue-600 dark:text-blue-400 font-semibold",
            TokenKind::Function => "text-purple-600 dark:text-purple-400 font-semibold",
            TokenKind::String => "text-green-600 dark:text-green-400",
            TokenKind::Number => "text-orange-600 dark:text-orange-400",
            TokenKind::Operator => "text-pink-600 dark:text-pink-400",
            TokenKind::Identifier => "text-foreground/80",
            TokenKind::Comment => "text-foreground/40 italic",
            TokenKind::Default => "text-foreground",
        }
    }
}

/// Escapes the five HTML-special characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps every token in a classed `<span>`.
pub fn tokens_to_html(tokens: &[HighlightedToken]) -> String {
    tokens
        .iter()
        .map(|t| {
            format!(
                r#"<span class="{}">{}</span>"#,
                t.kind.css_class(),
                escape_html(&t.text)
            )
        })
        .collect()
}

/// Highlights SQL as HTML markup.
///
/// Blank input renders as an empty string. If tokenizing fails the escaped
/// raw text is returned instead, so callers always get displayable markup.
pub fn highlight_sql(sql: &str) -> String {
    if sql.trim().is_empty() {
        return String::new();
    }
    render_or_escape(sql, tokenize_sql(sql))
}

fn render_or_escape(sql: &str, tokens: Result<Vec<HighlightedToken>, errors::Error>) -> String {
    match tokens {
        Ok(tokens) => tokens_to_html(&tokens),
        Err(e) => {
            warn!(error = %e, "SQL highlighting failed, falling back to plain text.");
            escape_html(sql)
        }
    }
}
