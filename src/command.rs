use crate::errors;
use crate::sql::{JoinClause, JoinType, QueryState, QueryType};
use crate::storage::{Dataset, Row, Value, MOCK_DATASET};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Rows shown by a preview when the query sets no LIMIT.
pub const DEFAULT_PREVIEW_LIMIT: u64 = 20;

/// Projected preview output.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Resolves a column reference against a row.
///
/// Qualified names (`orders.total`) are looked up as-is. A bare name takes
/// the first key ending in `.name`, then falls back to an exact key, so it
/// works on both prefixed (joined) and plain rows.
pub fn get_column_value<'a>(row: &'a Row, column: &str) -> Option<&'a Value> {
    if column.contains('.') {
        return row.get(column);
    }
    let suffix = format!(".{}", column);
    row.iter()
        .find(|(key, _)| key.ends_with(&suffix))
        .map(|(_, value)| value)
        .or_else(|| row.get(column))
}

/// Both sides present, not null, and equal as case-insensitive strings.
/// `1` and `"1"` therefore match.
fn matches_join_condition(left: &Row, right: &Row, on_left: &str, on_right: &str) -> bool {
    match (get_column_value(left, on_left), get_column_value(right, on_right)) {
        (Some(l), Some(r)) if !l.is_null() && !r.is_null() => {
            l.to_string().to_lowercase() == r.to_string().to_lowercase()
        }
        _ => false,
    }
}

fn null_row(template: Option<&Row>) -> Row {
    template.map(Row::null_template).unwrap_or_default()
}

/// Runs the joins of a query against the built-in mock dataset.
pub fn execute_joins(base_table: &str, joins: &[JoinClause]) -> Vec<Row> {
    execute_joins_in(&MOCK_DATASET, base_table, joins)
}

/// Runs `joins` over `base_table` in `dataset`.
///
/// Without joins the base rows come back untouched. Otherwise every key is
/// rewritten as `table.column` and the joins are folded left to right;
/// incomplete joins are skipped.
pub fn execute_joins_in(dataset: &Dataset, base_table: &str, joins: &[JoinClause]) -> Vec<Row> {
    let base = dataset.rows(base_table);
    if joins.is_empty() {
        return base.to_vec();
    }

    let mut result: Vec<Row> = base.iter().map(|r| r.prefixed(base_table)).collect();
    for join in joins {
        if !join.is_complete() {
            trace!(table = %join.table, "Skipping incomplete join.");
            continue;
        }
        let right: Vec<Row> = dataset
            .rows(&join.table)
            .iter()
            .map(|r| r.prefixed(&join.table))
            .collect();
        result = perform_join(result, right, join);
        debug!(
            join_type = %join.join_type,
            table = %join.table,
            rows = result.len(),
            "Applied join."
        );
    }
    result
}

fn perform_join(left: Vec<Row>, right: Vec<Row>, join: &JoinClause) -> Vec<Row> {
    if left.is_empty() && right.is_empty() {
        return Vec::new();
    }

    let on = |l: &Row, r: &Row| matches_join_condition(l, r, &join.on_left, &join.on_right);
    let mut result = Vec::new();

    match join.join_type {
        JoinType::Inner => {
            for l in &left {
                for r in &right {
                    if on(l, r) {
                        result.push(l.merged(r));
                    }
                }
            }
        }
        JoinType::Left => {
            if right.is_empty() {
                return left;
            }
            let padding = null_row(right.first());
            for l in &left {
                let before = result.len();
                for r in &right {
                    if on(l, r) {
                        result.push(l.merged(r));
                    }
                }
                if result.len() == before {
                    result.push(l.merged(&padding));
                }
            }
        }
        JoinType::Right => {
            if left.is_empty() {
                return right;
            }
            let padding = null_row(left.first());
            for r in &right {
                let before = result.len();
                for l in &left {
                    if on(l, r) {
                        result.push(l.merged(r));
                    }
                }
                if result.len() == before {
                    result.push(padding.merged(r));
                }
            }
        }
        JoinType::Full => {
            if left.is_empty() {
                return right;
            }
            if right.is_empty() {
                return left;
            }
            let mut matched_left = HashSet::new();
            let mut matched_right = HashSet::new();
            for (li, l) in left.iter().enumerate() {
                for (ri, r) in right.iter().enumerate() {
                    if on(l, r) {
                        result.push(l.merged(r));
                        matched_left.insert(li);
                        matched_right.insert(ri);
                    }
                }
            }
            let right_padding = null_row(right.first());
            for (li, l) in left.iter().enumerate() {
                if !matched_left.contains(&li) {
                    result.push(l.merged(&right_padding));
                }
            }
            let left_padding = null_row(left.first());
            for (ri, r) in right.iter().enumerate() {
                if !matched_right.contains(&ri) {
                    result.push(left_padding.merged(r));
                }
            }
        }
    }

    result
}

/// Rows a live preview shows for `state`: the joined rows with OFFSET
/// skipped and then LIMIT (or [`DEFAULT_PREVIEW_LIMIT`]) applied.
///
/// Filters, grouping and sorting are not evaluated; the preview only
/// reflects the FROM/JOIN shape of the query.
pub fn preview_rows(state: &QueryState, dataset: &Dataset) -> Vec<Row> {
    let joins: Vec<JoinClause> = state.complete_joins().cloned().collect();
    let rows = execute_joins_in(dataset, &state.table, &joins);
    let offset = state.offset.unwrap_or(0) as usize;
    let limit = state
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_PREVIEW_LIMIT) as usize;
    debug!(total = rows.len(), offset, limit, "Preview window.");
    rows.into_iter().skip(offset).take(limit).collect()
}

/// Projects rows onto `columns`, resolving each with [`get_column_value`].
///
/// An empty column list (or a lone `*`) projects every key of the first
/// row. Values a row cannot resolve come out as null.
pub fn project(rows: &[Row], columns: &[String]) -> ResultSet {
    let columns: Vec<String> = if columns.is_empty() || columns.iter().all(|c| c == "*") {
        rows.first()
            .map(|r| r.keys().map(str::to_string).collect())
            .unwrap_or_default()
    } else {
        columns.to_vec()
    };

    let rows = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| get_column_value(row, c).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    ResultSet { columns, rows }
}

/// Preview of a SELECT query as a result set: [`preview_rows`] projected
/// onto the query's columns.
///
/// Only SELECT queries can be previewed; INSERT, UPDATE and DELETE have no
/// rows to show against the sample data.
pub fn preview_query(state: &QueryState, dataset: &Dataset) -> Result<ResultSet, errors::Error> {
    if state.query_type != QueryType::Select {
        return Err(crate::err!(
            Unsupported,
            "Cannot preview {} queries, only SELECT.",
            state.query_type
        ));
    }
    let rows = preview_rows(state, dataset);
    Ok(project(&rows, &state.columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    fn users(ids: &[i64]) -> Vec<Row> {
        ids.iter()
            .map(|id| row! { "id" => *id, "name" => format!("user{}", id) })
            .collect()
    }

    fn orders(user_ids: &[i64]) -> Vec<Row> {
        user_ids
            .iter()
            .enumerate()
            .map(|(i, uid)| row! { "id" => (i as i64) + 100, "user_id" => *uid, "total" => 9.5 })
            .collect()
    }

    fn dataset(user_ids: &[i64], order_user_ids: &[i64]) -> Dataset {
        Dataset::new()
            .with_table("users", users(user_ids))
            .with_table("orders", orders(order_user_ids))
    }

    fn join(join_type: JoinType) -> JoinClause {
        JoinClause::new(join_type, "orders", "users.id", "orders.user_id")
    }

    #[test]
    fn test_get_column_value() {
        let r = row! { "users.id" => 1, "orders.id" => 7, "plain" => "x" };
        assert_eq!(get_column_value(&r, "orders.id"), Some(&Value::from(7)));
        assert_eq!(get_column_value(&r, "id"), Some(&Value::from(1)));
        assert_eq!(get_column_value(&r, "plain"), Some(&Value::from("x")));
        assert_eq!(get_column_value(&r, "posts.id"), None);
        assert_eq!(get_column_value(&r, "missing"), None);
    }

    #[test]
    fn test_match_is_loose_and_case_insensitive() {
        let l = row! { "a.k" => 1 };
        let r = row! { "b.k" => "1" };
        assert!(matches_join_condition(&l, &r, "a.k", "b.k"));

        let l = row! { "a.k" => "Active" };
        let r = row! { "b.k" => "ACTIVE" };
        assert!(matches_join_condition(&l, &r, "a.k", "b.k"));

        let l = row! { "a.k" => Value::Null };
        let r = row! { "b.k" => Value::Null };
        assert!(!matches_join_condition(&l, &r, "a.k", "b.k"));
        assert!(!matches_join_condition(&l, &r, "a.missing", "b.k"));
    }

    #[test]
    fn test_no_joins_returns_unprefixed_rows() {
        let ds = dataset(&[1, 2], &[1]);
        let rows = execute_joins_in(&ds, "users", &[]);
        assert_eq!(rows, users(&[1, 2]));
    }

    #[test]
    fn test_incomplete_join_only_prefixes() {
        let ds = dataset(&[1], &[1]);
        let incomplete = JoinClause::new(JoinType::Inner, "orders", "users.id", "");
        let rows = execute_joins_in(&ds, "users", &[incomplete]);
        assert_eq!(rows, vec![row! { "users.id" => 1, "users.name" => "user1" }]);
    }

    #[test]
    fn test_join_edge_cases() {
        // (type, users, orders' user_ids, expected row count)
        let cases: [(JoinType, &[i64], &[i64], usize); 17] = [
            (JoinType::Inner, &[], &[], 0),
            (JoinType::Inner, &[], &[1, 2, 3], 0),
            (JoinType::Inner, &[1, 2], &[], 0),
            (JoinType::Inner, &[1, 2], &[2, 2, 3], 2),
            (JoinType::Left, &[], &[], 0),
            (JoinType::Left, &[1, 2], &[], 2),
            (JoinType::Left, &[], &[1], 0),
            (JoinType::Left, &[1, 2], &[1], 2),
            (JoinType::Left, &[1, 2], &[1, 1], 3),
            (JoinType::Right, &[], &[], 0),
            (JoinType::Right, &[], &[1, 2], 2),
            (JoinType::Right, &[1], &[], 0),
            (JoinType::Right, &[1], &[1, 5], 2),
            (JoinType::Full, &[], &[], 0),
            (JoinType::Full, &[], &[1, 2], 2),
            (JoinType::Full, &[1, 2], &[], 2),
            (JoinType::Full, &[1, 2], &[2, 9], 3),
        ];
        for (join_type, u, o, expected) in cases {
            let rows = execute_joins_in(&dataset(u, o), "users", &[join(join_type)]);
            assert_eq!(
                rows.len(),
                expected,
                "{} JOIN users={:?} orders={:?}",
                join_type,
                u,
                o
            );
        }
    }

    #[test]
    fn test_inner_cardinality() {
        let ds = Dataset::new()
            .with_table("a", vec![row! { "k" => 1 }; 3])
            .with_table("b", vec![row! { "k" => "1" }; 4]);
        let all = JoinClause::new(JoinType::Inner, "b", "a.k", "b.k");
        assert_eq!(execute_joins_in(&ds, "a", &[all]).len(), 12);

        let none = JoinClause::new(JoinType::Inner, "b", "a.k", "b.missing");
        assert!(execute_joins_in(&ds, "a", &[none]).is_empty());
    }

    #[test]
    fn test_left_join_keeps_every_left_row() {
        let cases: [(&[i64], &[i64]); 3] = [(&[1, 2, 3], &[9]), (&[1, 1], &[1, 1]), (&[4], &[])];
        for (u, o) in cases {
            let rows = execute_joins_in(&dataset(u, o), "users", &[join(JoinType::Left)]);
            assert!(rows.len() >= u.len());
        }
    }

    #[test]
    fn test_left_join_pads_unmatched_with_nulls() {
        let rows = execute_joins_in(&dataset(&[1, 2], &[1]), "users", &[join(JoinType::Left)]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("orders.user_id"), Some(&Value::from(1)));

        let unmatched = &rows[1];
        assert_eq!(unmatched.get("users.id"), Some(&Value::from(2)));
        let order_keys: Vec<&str> = unmatched
            .keys()
            .filter(|k| k.starts_with("orders."))
            .collect();
        assert_eq!(order_keys, vec!["orders.id", "orders.user_id", "orders.total"]);
        for key in order_keys {
            assert_eq!(unmatched.get(key), Some(&Value::Null));
        }
    }

    #[test]
    fn test_right_join_keeps_left_columns_first() {
        let rows = execute_joins_in(&dataset(&[1], &[1, 5]), "users", &[join(JoinType::Right)]);
        let keys: Vec<&str> = rows[1].keys().collect();
        assert_eq!(
            keys,
            vec!["users.id", "users.name", "orders.id", "orders.user_id", "orders.total"]
        );
        assert_eq!(rows[1].get("users.id"), Some(&Value::Null));
        assert_eq!(rows[1].get("orders.user_id"), Some(&Value::from(5)));
    }

    #[test]
    fn test_full_join_order() {
        let rows = execute_joins_in(&dataset(&[1, 2], &[2, 9]), "users", &[join(JoinType::Full)]);
        let ids: Vec<(String, String)> = rows
            .iter()
            .map(|r| {
                (
                    r.get("users.id").map(Value::to_string).unwrap_or_default(),
                    r.get("orders.user_id").map(Value::to_string).unwrap_or_default(),
                )
            })
            .collect();
        assert_eq!(
            ids,
            vec![
                ("2".to_string(), "2".to_string()),
                ("1".to_string(), "null".to_string()),
                ("null".to_string(), "9".to_string()),
            ]
        );
    }

    #[test]
    fn test_mock_dataset_joins() {
        let inner = execute_joins("users", &[join(JoinType::Inner)]);
        assert!(inner.iter().all(|r| r.get("users.id") == r.get("orders.user_id")));

        let left = execute_joins("users", &[join(JoinType::Left)]);
        assert!(left.len() >= get_rows("users"));
        let right = execute_joins("users", &[join(JoinType::Right)]);
        assert!(right.len() >= get_rows("orders"));
    }

    fn get_rows(table: &str) -> usize {
        crate::storage::get_mock_data(table).len()
    }

    #[test]
    fn test_preview_window() {
        let ds = dataset(&(1..=30).collect::<Vec<_>>(), &[]);
        let mut state = QueryState::select("users");
        assert_eq!(preview_rows(&state, &ds).len(), DEFAULT_PREVIEW_LIMIT as usize);

        state.limit = Some(5);
        state.offset = Some(27);
        let rows = preview_rows(&state, &ds);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("id"), Some(&Value::from(28)));
    }

    #[test]
    fn test_project() {
        let rows = execute_joins_in(&dataset(&[1, 2], &[1]), "users", &[join(JoinType::Left)]);
        let set = project(&rows, &["name".to_string(), "orders.total".to_string(), "nope".to_string()]);
        assert_eq!(set.columns, vec!["name", "orders.total", "nope"]);
        assert_eq!(
            set.rows,
            vec![
                vec![Value::from("user1"), Value::from(9.5), Value::Null],
                vec![Value::from("user2"), Value::Null, Value::Null],
            ]
        );

        let all = project(&rows, &[]);
        assert_eq!(all.columns.len(), 5);
        assert!(project(&[], &[]).columns.is_empty());
    }

    #[test]
    fn test_preview_query() {
        let ds = dataset(&[1, 2, 3], &[1]);
        let mut state = QueryState::select("users");
        state.columns = vec!["name".to_string()];
        let set = preview_query(&state, &ds).unwrap();
        assert_eq!(set.columns, vec!["name"]);
        assert_eq!(set.rows.len(), 3);

        for query_type in [QueryType::Insert, QueryType::Update, QueryType::Delete] {
            state.query_type = query_type;
            let err = preview_query(&state, &ds).unwrap_err();
            assert_eq!(err.code(), 7000);
            assert!(err.to_string().contains(&query_type.to_string()));
        }
    }
}
