use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use uuid::Uuid;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Kind of statement being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryType {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Comparison operator of a WHERE or HAVING condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN")]
    NotIn,
    #[serde(rename = "IS NULL")]
    IsNull,
    #[serde(rename = "IS NOT NULL")]
    IsNotNull,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::GtEq => ">=",
            Operator::LtEq => "<=",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    /// `IS NULL` / `IS NOT NULL`: no right-hand value.
    pub fn is_null_check(&self) -> bool {
        self.as_str().contains("NULL")
    }

    /// `IN` / `NOT IN`: right-hand value is a parenthesised list.
    pub fn takes_list(&self) -> bool {
        self.as_str().contains("IN")
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueryType::Select => "SELECT",
            QueryType::Insert => "INSERT",
            QueryType::Update => "UPDATE",
            QueryType::Delete => "DELETE",
        })
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
        })
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        })
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        })
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        })
    }
}

/// One `<TYPE> JOIN table ON left = right` clause.
///
/// A clause with an empty `table`, `on_left` or `on_right` is inert: it is
/// skipped by both SQL generation and execution.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinClause {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub join_type: JoinType,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub on_left: String,
    #[serde(default)]
    pub on_right: String,
}

impl JoinClause {
    pub fn new(join_type: JoinType, table: &str, on_left: &str, on_right: &str) -> Self {
        Self {
            id: new_id(),
            join_type,
            table: table.to_string(),
            on_left: on_left.to_string(),
            on_right: on_right.to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.table.is_empty() && !self.on_left.is_empty() && !self.on_right.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhereCondition {
    #[serde(default = "new_id")]
    pub id: String,
    pub column: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub conjunction: Conjunction,
}

impl WhereCondition {
    pub fn new(column: &str, operator: Operator, value: &str) -> Self {
        Self {
            id: new_id(),
            column: column.to_string(),
            operator,
            value: value.to_string(),
            conjunction: Conjunction::And,
        }
    }

    pub fn with_conjunction(mut self, conjunction: Conjunction) -> Self {
        self.conjunction = conjunction;
        self
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HavingCondition {
    #[serde(default = "new_id")]
    pub id: String,
    pub function: AggregateFunction,
    pub column: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub conjunction: Conjunction,
}

impl HavingCondition {
    pub fn new(function: AggregateFunction, column: &str, operator: Operator, value: &str) -> Self {
        Self {
            id: new_id(),
            function,
            column: column.to_string(),
            operator,
            value: value.to_string(),
            conjunction: Conjunction::And,
        }
    }

    pub fn with_conjunction(mut self, conjunction: Conjunction) -> Self {
        self.conjunction = conjunction;
        self
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    #[serde(default = "new_id")]
    pub id: String,
    pub function: AggregateFunction,
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Aggregate {
    pub fn new(function: AggregateFunction, column: &str) -> Self {
        Self {
            id: new_id(),
            function,
            column: column.to_string(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// The alias, unless it is missing or blank.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref().filter(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrderSpec {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl OrderSpec {
    pub fn new(column: &str, direction: SortDirection) -> Self {
        Self {
            column: column.to_string(),
            direction,
        }
    }
}

/// Column → raw value pairs of an INSERT, kept in the order they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertValues {
    entries: Vec<(String, String)>,
}

impl InsertValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &str, value: &str) {
        match self.entries.iter_mut().find(|(c, _)| c == column) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((column.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    /// Pairs whose value is not blank: the ones that make it into SQL.
    pub fn filled(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(_, v)| !v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for InsertValues {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut values = InsertValues::new();
        for (c, v) in iter {
            values.set(c, v);
        }
        values
    }
}

impl Serialize for InsertValues {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (c, v) in &self.entries {
            map.serialize_entry(c, v)?;
        }
        map.end()
    }
}

struct InsertValuesVisitor;

impl<'de> Visitor<'de> for InsertValuesVisitor {
    type Value = InsertValues;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of column names to string values")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut values = InsertValues::new();
        while let Some((column, value)) = access.next_entry::<String, String>()? {
            values.set(&column, &value);
        }
        Ok(values)
    }
}

impl<'de> Deserialize<'de> for InsertValues {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(InsertValuesVisitor)
    }
}

/// Everything the builder knows about the query being composed.
///
/// Plain data: produced by the UI (or the CLI), passed by reference into
/// the generator, explainer, executor and codec. `limit`/`offset` of `None`
/// mean "unspecified", not zero.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryState {
    pub query_type: QueryType,
    pub table: String,
    pub columns: Vec<String>,
    pub joins: Vec<JoinClause>,
    pub aggregates: Vec<Aggregate>,
    pub distinct: bool,
    pub where_conditions: Vec<WhereCondition>,
    pub group_by: Vec<String>,
    pub having: Vec<HavingCondition>,
    pub order_by: Vec<OrderSpec>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub insert_values: InsertValues,
}

impl QueryState {
    /// A SELECT on `table` with everything else at its default.
    pub fn select(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    /// An INSERT into `table` with no values yet.
    pub fn insert(table: &str) -> Self {
        Self {
            query_type: QueryType::Insert,
            table: table.to_string(),
            ..Self::default()
        }
    }

    /// Joins that actually take part in generation and execution.
    pub fn complete_joins(&self) -> impl Iterator<Item = &JoinClause> {
        self.joins.iter().filter(|j| j.is_complete())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_families() {
        assert!(Operator::IsNull.is_null_check());
        assert!(Operator::IsNotNull.is_null_check());
        assert!(!Operator::Eq.is_null_check());
        assert!(Operator::In.takes_list());
        assert!(Operator::NotIn.takes_list());
        assert!(!Operator::Like.takes_list());
    }

    #[test]
    fn test_incomplete_join() {
        let mut join = JoinClause::new(JoinType::Left, "orders", "users.id", "orders.user_id");
        assert!(join.is_complete());
        join.on_right.clear();
        assert!(!join.is_complete());
    }

    #[test]
    fn test_deserialize_partial_state() {
        let state: QueryState = serde_json::from_str(
            r#"{
                "table": "users",
                "columns": ["name"],
                "whereConditions": [{"column": "age", "operator": ">=", "value": "21"}],
                "joins": [{"type": "LEFT", "table": "orders", "onLeft": "users.id", "onRight": "orders.user_id"}],
                "insertValues": {"zeta": "1", "alpha": "2"},
                "limit": 5
            }"#,
        )
        .unwrap();
        assert_eq!(state.query_type, QueryType::Select);
        assert_eq!(state.where_conditions[0].operator, Operator::GtEq);
        assert_eq!(state.where_conditions[0].conjunction, Conjunction::And);
        assert!(!state.where_conditions[0].id.is_empty());
        assert_eq!(state.joins[0].join_type, JoinType::Left);
        assert_eq!(state.limit, Some(5));
        assert_eq!(state.offset, None);
        let keys: Vec<&str> = state.insert_values.iter().map(|(c, _)| c).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_serialize_uses_ui_field_names() {
        let mut state = QueryState::select("users");
        state
            .joins
            .push(JoinClause::new(JoinType::Full, "orders", "users.id", "orders.user_id"));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["queryType"], "SELECT");
        assert_eq!(json["joins"][0]["type"], "FULL");
        assert_eq!(json["joins"][0]["onLeft"], "users.id");
        assert!(json["limit"].is_null());
    }

    #[test]
    fn test_filled_insert_values_skip_blanks() {
        let values: InsertValues = [("id", "1"), ("name", "  "), ("email", "a@b.c")]
            .into_iter()
            .collect();
        let filled: Vec<&str> = values.filled().map(|(c, _)| c).collect();
        assert_eq!(filled, vec!["id", "email"]);
    }
}
