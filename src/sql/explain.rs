use super::statement::{JoinType, Operator, QueryState, QueryType, SortDirection};
use crate::command::DEFAULT_PREVIEW_LIMIT;

pub const NOTHING_TO_EXPLAIN: &str = "No query to explain yet. Start by selecting a table.";

/// Longest INSERT value shown verbatim before it is cut with `...`.
const MAX_VALUE_PREVIEW: usize = 50;

/// Plain-English reading of a WHERE operator.
pub fn operator_to_english(operator: Operator) -> &'static str {
    match operator {
        Operator::Eq => "equals",
        Operator::NotEq => "does not equal",
        Operator::Gt => "is greater than",
        Operator::Lt => "is less than",
        Operator::GtEq => "is greater than or equal to",
        Operator::LtEq => "is less than or equal to",
        Operator::Like => "matches pattern",
        Operator::In => "is in",
        Operator::NotIn => "is not in",
        Operator::IsNull => "is null",
        Operator::IsNotNull => "is not null",
    }
}

fn join_phrase(join_type: JoinType) -> &'static str {
    match join_type {
        JoinType::Inner => "matching rows from",
        JoinType::Left => "all rows from base table and matching rows from",
        JoinType::Right => "all rows from joined table and matching rows from",
        JoinType::Full => "all rows from both",
    }
}

fn truncate(value: &str) -> String {
    if value.chars().count() > MAX_VALUE_PREVIEW {
        let head: String = value.chars().take(MAX_VALUE_PREVIEW).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

fn pagination_note(offset: Option<u64>) -> Option<String> {
    offset.filter(|o| *o > 0).map(|o| {
        format!(
            " Starting from record #{} (skipping first {}).",
            o + 1,
            o
        )
    })
}

/// Describes the query in plain English.
///
/// Mirrors [`generate_sql`](super::generator::generate_sql): the same
/// clauses in the same order, aggregates read as "counts all rows" or
/// "avgs the age column", one line per WHERE/HAVING condition.
pub fn explain_query(state: &QueryState) -> String {
    if state.table.is_empty() {
        return NOTHING_TO_EXPLAIN.to_string();
    }

    let mut parts: Vec<String> = Vec::new();

    match state.query_type {
        QueryType::Select => {
            if state.aggregates.is_empty() {
                let columns = if state.columns.is_empty() {
                    "all columns".to_string()
                } else {
                    state.columns.join(", ")
                };
                let distinct = if state.distinct { "unique " } else { "" };
                parts.push(format!(
                    "This query retrieves {}{} from the \"{}\" table.",
                    distinct, columns, state.table
                ));
            } else {
                let aggregates = state
                    .aggregates
                    .iter()
                    .map(|agg| {
                        let target = if agg.column == "*" {
                            "all rows".to_string()
                        } else {
                            format!("the {} column", agg.column)
                        };
                        format!(
                            "{}s {}",
                            agg.function.to_string().to_lowercase(),
                            target
                        )
                    })
                    .collect::<Vec<_>>();
                parts.push(format!("This query calculates: {}.", aggregates.join(", ")));
                if !state.columns.is_empty() {
                    parts.push(format!("It also selects: {}.", state.columns.join(", ")));
                }
            }

            if !state.joins.is_empty() {
                let joins = state
                    .joins
                    .iter()
                    .map(|j| {
                        format!(
                            "{} JOIN with \"{}\" ({})",
                            j.join_type,
                            j.table,
                            join_phrase(j.join_type)
                        )
                    })
                    .collect::<Vec<_>>();
                parts.push(format!("\nJoins: {}.", joins.join(", ")));
            }
        }
        QueryType::Insert => {
            let filled: Vec<(&str, &str)> = state.insert_values.filled().collect();
            if filled.is_empty() {
                parts.push(format!(
                    "This query will insert a new row into the \"{}\" table.",
                    state.table
                ));
                parts.push(
                    "\nFill in the column values to complete the INSERT statement.".to_string(),
                );
            } else {
                parts.push(format!(
                    "This query inserts a new row into the \"{}\" table.",
                    state.table
                ));
                parts.push(format!(
                    "\nIt sets {} column{}:",
                    filled.len(),
                    if filled.len() > 1 { "s" } else { "" }
                ));
                for (column, value) in filled {
                    parts.push(format!("  • {} = {}", column, truncate(value)));
                }
            }
        }
        QueryType::Update | QueryType::Delete => {}
    }

    if !state.where_conditions.is_empty() {
        parts.push("\nIt filters rows where:".to_string());
        for (i, c) in state.where_conditions.iter().enumerate() {
            let conjunction = if i > 0 {
                c.conjunction.to_string().to_lowercase()
            } else {
                String::new()
            };
            let value = if c.value.is_empty() { "(null)" } else { c.value.as_str() };
            let line = format!(
                "  {} {} {} {}",
                conjunction,
                c.column,
                operator_to_english(c.operator),
                value
            );
            parts.push(line.trim().to_string());
        }
    }

    if !state.group_by.is_empty() {
        parts.push(format!(
            "\nResults are grouped by: {}.",
            state.group_by.join(", ")
        ));
    }

    if !state.having.is_empty() {
        parts.push("\nGroups are filtered where:".to_string());
        for (i, c) in state.having.iter().enumerate() {
            let conjunction = if i > 0 {
                c.conjunction.to_string().to_lowercase()
            } else {
                String::new()
            };
            let line = format!(
                "  {} {}({}) {} {}",
                conjunction, c.function, c.column, c.operator, c.value
            );
            parts.push(line.trim().to_string());
        }
    }

    if !state.order_by.is_empty() {
        let order = state
            .order_by
            .iter()
            .enumerate()
            .map(|(i, o)| {
                let direction = match o.direction {
                    SortDirection::Asc => "ascending",
                    SortDirection::Desc => "descending",
                };
                if i == 0 {
                    format!("{} ({})", o.column, direction)
                } else {
                    format!("then by {} ({})", o.column, direction)
                }
            })
            .collect::<Vec<_>>();
        parts.push(format!("\nResults are sorted by {}.", order.join(", ")));
    }

    if state.query_type == QueryType::Select {
        match state.limit.filter(|l| *l > 0) {
            Some(limit) => parts.push(format!("\nIt returns up to {} results.", limit)),
            None => parts.push(format!(
                "\nNote: Preview shows first {} rows by default. Add LIMIT to control this.",
                DEFAULT_PREVIEW_LIMIT
            )),
        }
        parts.extend(pagination_note(state.offset));
    }

    parts.join("\n")
}
