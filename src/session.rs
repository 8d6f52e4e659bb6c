use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{codec, errors, sql::QueryState, templates};

/// Where the working query comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// A JSON file holding a full `QueryState`.
    File(PathBuf),
    /// A share token, or a share link carrying one.
    Token(String),
    /// A built-in template, by name.
    Template(String),
    /// Nothing: an empty query.
    Empty,
}

pub struct Session {
    pub id: Uuid,
    pub state: QueryState,
}

impl Session {
    pub fn open(source: &Source) -> Result<Self, errors::Error> {
        let state = match source {
            Source::File(path) => load_state(path)?,
            Source::Token(token) => read_token(token).unwrap_or_else(|| {
                warn!("Share token could not be read, starting from an empty query.");
                QueryState::default()
            }),
            Source::Template(name) => templates::find(name)
                .map(|t| t.state.clone())
                .ok_or_else(|| crate::err!(Other, "Unknown template '{}'.", name))?,
            Source::Empty => QueryState::default(),
        };
        Ok(Session::with_state(state))
    }

    /// Like opening a [`Source::Token`], but a token that cannot be read is
    /// an error instead of an empty query.
    pub fn open_token_strict(token: &str) -> Result<Self, errors::Error> {
        let state = read_token(token).ok_or_else(|| crate::err!(Codec, "Invalid share token."))?;
        Ok(Session::with_state(state))
    }

    fn with_state(state: QueryState) -> Self {
        let session = Session {
            id: Uuid::new_v4(),
            state,
        };
        info!(session = %session.id, table = %session.state.table, "Session opened.");
        session
    }

    pub fn set_state(&mut self, state: QueryState) {
        self.state = state;
    }

    /// Writes the working query as pretty JSON, loadable with [`Source::File`].
    pub fn save(&self, path: &Path) -> Result<(), errors::Error> {
        let json = serde_json::to_string_pretty(&self.state)?;
        fs::write(path, json)?;
        info!(session = %self.id, path = %path.display(), "Session saved.");
        Ok(())
    }
}

/// Accepts a bare token or a link carrying one in `?q=`.
fn read_token(token: &str) -> Option<QueryState> {
    let token = codec::token_from_url(token).unwrap_or_else(|| token.trim().to_string());
    codec::decode(&token)
}

fn load_state(path: &Path) -> Result<QueryState, errors::Error> {
    let text = fs::read_to_string(path)?;
    let state = serde_json::from_str(&text)?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_open_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "queryType": "SELECT",
                "table": "users",
                "columns": ["name"],
                "whereConditions": [{{"column": "age", "operator": ">=", "value": "30"}}],
                "limit": 3
            }}"#
        )
        .unwrap();

        let session = Session::open(&Source::File(file.path().to_path_buf())).unwrap();
        assert_eq!(session.state.table, "users");
        assert_eq!(session.state.where_conditions[0].operator, Operator::GtEq);
        assert_eq!(session.state.limit, Some(3));
        assert!(session.state.joins.is_empty());
    }

    #[test]
    fn test_bad_file() {
        let err = Session::open(&Source::File("/definitely/not/here.json".into()))
            .err()
            .unwrap();
        assert_eq!(err.code(), 1000);

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = Session::open(&Source::File(file.path().to_path_buf()))
            .err()
            .unwrap();
        assert_eq!(err.code(), 6000);
    }

    #[test]
    fn test_save_then_open() {
        let mut session = Session::open(&Source::Template("Count by Status".into())).unwrap();
        let mut state = session.state.clone();
        state.limit = Some(7);
        session.set_state(state);

        let file = NamedTempFile::new().unwrap();
        session.save(file.path()).unwrap();
        let reopened = Session::open(&Source::File(file.path().to_path_buf())).unwrap();
        assert_eq!(reopened.state, session.state);
        assert_ne!(reopened.id, session.id);
    }

    #[test]
    fn test_open_from_token_or_link() {
        let state = QueryState::select("posts");
        let token = codec::encode(&state).unwrap();
        let link = codec::shareable_url("https://querycraft.dev/builder", &state);

        assert_eq!(Session::open(&Source::Token(token)).unwrap().state, state);
        assert_eq!(Session::open(&Source::Token(link.clone())).unwrap().state, state);

        assert_eq!(Session::open_token_strict(&link).unwrap().state, state);
    }

    #[test]
    fn test_unreadable_token_opens_empty_query() {
        for token in ["%%%", "https://querycraft.dev/builder?q=%%%garbage", ""] {
            let session = Session::open(&Source::Token(token.into())).unwrap();
            assert_eq!(session.state, QueryState::default(), "{}", token);
        }

        let err = Session::open_token_strict("https://querycraft.dev/builder?q=%%%garbage")
            .err()
            .unwrap();
        assert_eq!(err.code(), 2000);
    }

    #[test]
    fn test_open_template_and_empty() {
        let session = Session::open(&Source::Template("pagination example".into())).unwrap();
        assert_eq!(session.state.table, "posts");
        assert!(Session::open(&Source::Template("nope".into())).is_err());
        assert_eq!(Session::open(&Source::Empty).unwrap().state, QueryState::default());
    }
}
