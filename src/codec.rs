/// Share-link codec: `QueryState` <-> compact URL token.
use crate::errors;
use crate::sql::{
    Aggregate, HavingCondition, InsertValues, JoinClause, OrderSpec, QueryState, QueryType,
    WhereCondition,
};
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::io::Write;
use tracing::{debug, error, warn};

/// Query parameter carrying the token in a share link.
pub const QUERY_PARAM: &str = "q";

/// Wire shape of a shared query. Only `t` and `tb` are always present.
#[derive(Serialize)]
struct MinimalState<'a> {
    t: QueryType,
    tb: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    c: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    j: &'a [JoinClause],
    #[serde(skip_serializing_if = "is_empty")]
    a: &'a [Aggregate],
    #[serde(skip_serializing_if = "is_false")]
    d: bool,
    #[serde(skip_serializing_if = "is_empty")]
    w: &'a [WhereCondition],
    #[serde(skip_serializing_if = "is_empty")]
    g: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    h: &'a [HavingCondition],
    #[serde(skip_serializing_if = "is_empty")]
    o: &'a [OrderSpec],
    #[serde(skip_serializing_if = "Option::is_none")]
    l: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    of: Option<u64>,
    #[serde(skip_serializing_if = "no_values")]
    iv: &'a InsertValues,
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

fn no_values(values: &&InsertValues) -> bool {
    values.is_empty()
}

impl<'a> From<&'a QueryState> for MinimalState<'a> {
    fn from(state: &'a QueryState) -> Self {
        MinimalState {
            t: state.query_type,
            tb: &state.table,
            c: &state.columns,
            j: &state.joins,
            a: &state.aggregates,
            d: state.distinct,
            w: &state.where_conditions,
            g: &state.group_by,
            h: &state.having,
            o: &state.order_by,
            l: state.limit,
            of: state.offset,
            iv: &state.insert_values,
        }
    }
}

/// Encodes the non-default parts of `state` as a URL-safe token
/// (JSON, then unpadded URL-safe base64).
pub fn encode(state: &QueryState) -> Result<String, errors::Error> {
    let json = serde_json::to_vec(&MinimalState::from(state))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decodes a share token back into a full `QueryState`.
///
/// Returns `None` only when the envelope is unusable (empty, not base64,
/// not UTF-8, not a JSON object). Inside a valid envelope each field falls
/// back to its default on its own, and list elements that do not parse are
/// dropped one by one.
pub fn decode(token: &str) -> Option<QueryState> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    match decode_envelope(token) {
        Ok(fields) => Some(rebuild(&fields)),
        Err(e) => {
            warn!(error = %e, "Failed to decode query token.");
            None
        }
    }
}

/// Accepts URL-safe and standard alphabets, padded or not.
fn decode_base64(token: &str) -> Result<Vec<u8>, errors::Error> {
    let unpadded = token.trim_end_matches('=');
    let bytes = if unpadded.contains(['+', '/']) {
        STANDARD_NO_PAD.decode(unpadded)?
    } else {
        URL_SAFE_NO_PAD.decode(unpadded)?
    };
    Ok(bytes)
}

fn decode_envelope(token: &str) -> Result<Map<String, JsonValue>, errors::Error> {
    let json = String::from_utf8(decode_base64(token)?)?;
    match serde_json::from_str::<JsonValue>(&json)? {
        JsonValue::Object(fields) => Ok(fields),
        other => Err(crate::err!(
            Codec,
            "Expected a JSON object, found {}",
            json_kind(&other)
        )),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

fn list<T: DeserializeOwned>(fields: &Map<String, JsonValue>, key: &str) -> Vec<T> {
    match fields.get(key) {
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter_map(|item| match T::deserialize(item) {
                Ok(v) => Some(v),
                Err(e) => {
                    debug!(field = key, error = %e, "Dropping malformed element.");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn insert_values(fields: &Map<String, JsonValue>) -> InsertValues {
    let mut values = InsertValues::new();
    if let Some(JsonValue::Object(map)) = fields.get("iv") {
        for (column, value) in map {
            match value {
                JsonValue::String(s) => values.set(column, s),
                JsonValue::Number(n) => values.set(column, &n.to_string()),
                JsonValue::Bool(b) => values.set(column, &b.to_string()),
                _ => {}
            }
        }
    }
    values
}

fn rebuild(fields: &Map<String, JsonValue>) -> QueryState {
    QueryState {
        query_type: fields
            .get("t")
            .and_then(|t| QueryType::deserialize(t).ok())
            .unwrap_or_default(),
        table: fields
            .get("tb")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string(),
        columns: list(fields, "c"),
        joins: list(fields, "j"),
        aggregates: list(fields, "a"),
        distinct: fields.get("d") == Some(&JsonValue::Bool(true)),
        where_conditions: list(fields, "w"),
        group_by: list(fields, "g"),
        having: list(fields, "h"),
        order_by: list(fields, "o"),
        limit: fields.get("l").and_then(JsonValue::as_u64),
        offset: fields.get("of").and_then(JsonValue::as_u64),
        insert_values: insert_values(fields),
    }
}

/// `{base}?q={token}`, or an empty string if the state cannot be encoded.
pub fn shareable_url(base: &str, state: &QueryState) -> String {
    match encode(state) {
        Ok(token) => format!("{}?{}={}", base, QUERY_PARAM, token),
        Err(e) => {
            error!(error = %e, "Failed to encode query.");
            String::new()
        }
    }
}

/// Writes the share link to `sink` (the clipboard stand-in).
///
/// Never fails past this call: problems are logged and reported as `false`.
pub fn copy_shareable_url<W: Write>(sink: &mut W, base: &str, state: &QueryState) -> bool {
    let url = shareable_url(base, state);
    if url.is_empty() {
        return false;
    }
    match writeln!(sink, "{}", url).and_then(|_| sink.flush()) {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "Failed to copy URL.");
            false
        }
    }
}

/// Pulls the token out of a pasted share link.
///
/// Anything before `?` is ignored, so full URLs and bare `?q=...` query
/// strings both work. Form decoding turns `+` into a space; base64 never
/// contains spaces, so they are mapped back.
pub fn token_from_url(link: &str) -> Option<String> {
    let (_, query) = link.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == QUERY_PARAM)
        .map(|(_, value)| value.replace(' ', "+"))
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::*;
    use base64::engine::general_purpose::STANDARD;

    fn token_for(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json)
    }

    fn payload(token: &str) -> String {
        String::from_utf8(URL_SAFE_NO_PAD.decode(token).unwrap()).unwrap()
    }

    fn full_state() -> QueryState {
        let mut state = QueryState::select("users");
        state.columns = vec!["users.name".into(), "orders.total".into()];
        state.joins = vec![JoinClause::new(
            JoinType::Full,
            "orders",
            "users.id",
            "orders.user_id",
        )];
        state.aggregates = vec![Aggregate::new(AggregateFunction::Sum, "total").with_alias("spent")];
        state.distinct = true;
        state.where_conditions = vec![
            WhereCondition::new("name", Operator::Like, "Ann%"),
            WhereCondition::new("city", Operator::IsNotNull, "").with_conjunction(Conjunction::Or),
        ];
        state.group_by = vec!["users.name".into()];
        state.having = vec![HavingCondition::new(
            AggregateFunction::Sum,
            "total",
            Operator::Gt,
            "100",
        )];
        state.order_by = vec![OrderSpec::new("spent", SortDirection::Desc)];
        state.limit = Some(10);
        state.offset = Some(0);
        state
    }

    #[test]
    fn test_round_trip() {
        let state = full_state();
        let token = encode(&state).unwrap();
        assert!(!token.contains(['+', '/', '=']));
        assert_eq!(decode(&token), Some(state));
    }

    #[test]
    fn test_insert_round_trip_keeps_column_order() {
        let mut state = QueryState::insert("products");
        state.insert_values = [("name", "Lamp"), ("price", "19.99"), ("brand", "NULL")]
            .into_iter()
            .collect();
        let decoded = decode(&encode(&state).unwrap()).unwrap();
        let columns: Vec<&str> = decoded.insert_values.iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["name", "price", "brand"]);
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_minimal_payload() {
        let token = encode(&QueryState::select("products")).unwrap();
        assert_eq!(payload(&token), r#"{"t":"SELECT","tb":"products"}"#);

        let decoded = decode(&token).unwrap();
        assert_eq!(decoded.table, "products");
        assert_eq!(decoded.query_type, QueryType::Select);
        assert!(decoded.columns.is_empty());
        assert!(decoded.joins.is_empty());
        assert!(decoded.aggregates.is_empty());
        assert!(decoded.where_conditions.is_empty());
        assert!(decoded.group_by.is_empty());
        assert!(decoded.having.is_empty());
        assert!(decoded.order_by.is_empty());
        assert!(decoded.insert_values.is_empty());
        assert_eq!(decoded.limit, None);
        assert!(!decoded.distinct);
    }

    #[test]
    fn test_zero_limit_is_kept() {
        let mut state = QueryState::select("posts");
        state.limit = Some(0);
        let token = encode(&state).unwrap();
        assert_eq!(payload(&token), r#"{"t":"SELECT","tb":"posts","l":0}"#);
        assert_eq!(decode(&token).unwrap().limit, Some(0));
    }

    #[test]
    fn test_legacy_padded_standard_token() {
        let json = r#"{"t":"INSERT","tb":"users","iv":{"name":"Ann?>","age":30,"vip":true,"x":null},"d":11}"#;
        let token = STANDARD.encode(json);
        assert!(token.ends_with('='));
        let state = decode(&token).unwrap();
        assert_eq!(state.query_type, QueryType::Insert);
        assert_eq!(state.insert_values.get("name"), Some("Ann?>"));
        assert_eq!(state.insert_values.get("age"), Some("30"));
        assert_eq!(state.insert_values.get("vip"), Some("true"));
        assert_eq!(state.insert_values.get("x"), None);
        assert!(!state.distinct);
    }

    #[test]
    fn test_malformed_envelopes() {
        let wrong_shape = [token_for("not json"), token_for("[1,2]"), token_for("null")];
        let tokens = ["", "   ", "!!!", "a"]
            .into_iter()
            .chain(wrong_shape.iter().map(String::as_str));
        for token in tokens {
            assert_eq!(decode(token), None, "{token:?}");
        }
        let token = encode(&full_state()).unwrap();
        assert_eq!(decode(&token[..20]), None);
    }

    #[test]
    fn test_field_by_field_fallbacks() {
        let json = r#"{
            "t": "MERGE",
            "tb": 5,
            "c": ["a", 3, "b"],
            "j": "oops",
            "d": "yes",
            "w": [
                {"column": "x", "operator": "=", "value": "1"},
                {"column": "y", "operator": "~~"}
            ],
            "o": [{"column": "x"}],
            "l": -1,
            "of": 2,
            "iv": [1, 2]
        }"#;
        let state = decode(&token_for(json)).unwrap();
        assert_eq!(state.query_type, QueryType::Select);
        assert_eq!(state.table, "");
        assert_eq!(state.columns, vec!["a", "b"]);
        assert!(state.joins.is_empty());
        assert!(!state.distinct);
        assert_eq!(state.where_conditions.len(), 1);
        assert_eq!(state.where_conditions[0].conjunction, Conjunction::And);
        assert!(!state.where_conditions[0].id.is_empty());
        assert_eq!(state.order_by, vec![OrderSpec::new("x", SortDirection::Asc)]);
        assert_eq!(state.limit, None);
        assert_eq!(state.offset, Some(2));
        assert!(state.insert_values.is_empty());
    }

    #[test]
    fn test_shareable_url() {
        let state = QueryState::select("orders");
        let url = shareable_url("https://querycraft.dev/builder", &state);
        let token = token_from_url(&url).unwrap();
        assert_eq!(url, format!("https://querycraft.dev/builder?q={}", token));
        assert_eq!(decode(&token), Some(state));
    }

    #[test]
    fn test_token_from_url() {
        assert_eq!(
            token_from_url("https://x.dev/b?foo=1&q=abc#top"),
            Some("abc".to_string())
        );
        assert_eq!(token_from_url("?q=ab+c%2F="), Some("ab+c/=".to_string()));
        assert_eq!(token_from_url("https://x.dev/b?foo=1"), None);
        assert_eq!(token_from_url("https://x.dev/b?q="), None);
        assert_eq!(token_from_url("abc"), None);
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "clipboard unavailable"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_copy_shareable_url() {
        let state = QueryState::select("users");
        let mut sink = Vec::new();
        assert!(copy_shareable_url(&mut sink, "http://localhost", &state));
        let written = String::from_utf8(sink).unwrap();
        assert!(written.starts_with("http://localhost?q="));
        assert!(written.ends_with('\n'));

        assert!(!copy_shareable_url(&mut BrokenSink, "http://localhost", &state));
    }
}
