/// Query model, SQL rendering and SQL text tooling.
pub mod explain;
pub mod generator;
pub mod highlight;
pub mod statement;
pub mod tokenizer;
pub mod validator;

pub use explain::explain_query;
pub use generator::generate_sql;
pub use highlight::{escape_html, highlight_sql, tokens_to_html};
pub use statement::*;
pub use tokenizer::{tokenize_sql, HighlightedToken, TokenKind};
pub use validator::validate_state;
