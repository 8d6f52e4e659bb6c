use super::statement::{Conjunction, Operator, QueryState, QueryType};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DECIMAL_REGEX: Regex =
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap();
    static ref RADIX_REGEX: Regex =
        Regex::new(r"^0([xX][0-9a-fA-F]+|[bB][01]+|[oO][0-7]+)$").unwrap();
}

pub const NO_TABLE_PLACEHOLDER: &str = "-- Select a table to start building your query";

/// Whether a raw value reads as a number and can be emitted unquoted.
///
/// Accepts what a browser's `Number()` accepts for non-blank input:
/// decimals with optional sign and exponent, `0x`/`0b`/`0o` literals and
/// `Infinity`. Surrounding whitespace is ignored.
pub fn is_numeric_literal(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    DECIMAL_REGEX.is_match(trimmed)
        || RADIX_REGEX.is_match(trimmed)
        || matches!(trimmed, "Infinity" | "+Infinity" | "-Infinity")
}

/// Formats the right-hand side of a WHERE/HAVING condition.
///
/// Known limitation: quoted values are emitted verbatim, so an embedded `'`
/// is not escaped here. INSERT values are escaped (see [`format_insert_value`]).
pub fn format_condition_value(operator: Operator, value: &str) -> String {
    if operator.is_null_check() {
        String::new()
    } else if operator.takes_list() {
        format!("({})", value)
    } else if operator == Operator::Like {
        format!("'{}'", value)
    } else if is_numeric_literal(value) {
        value.to_string()
    } else {
        format!("'{}'", value)
    }
}

/// Formats one INSERT value: NULL, numbers and booleans go in bare, anything
/// else is single-quoted with embedded quotes doubled.
pub fn format_insert_value(value: &str) -> String {
    if value == "NULL" || value == "null" {
        "NULL".to_string()
    } else if is_numeric_literal(value) {
        value.to_string()
    } else if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
        value.to_uppercase()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}

/// Renders the query as SQL text.
///
/// Never fails: a missing table yields a comment placeholder, and UPDATE and
/// DELETE, which the builder does not support yet, yield a fixed notice.
pub fn generate_sql(state: &QueryState) -> String {
    if state.table.is_empty() {
        return NO_TABLE_PLACEHOLDER.to_string();
    }

    match state.query_type {
        QueryType::Select => generate_select(state),
        QueryType::Insert => generate_insert(state),
        QueryType::Update => "-- UPDATE query builder coming soon!".to_string(),
        QueryType::Delete => "-- DELETE query builder coming soon!".to_string(),
    }
}

/// First clause bare, the rest on their own indented lines with their
/// conjunction in front.
fn join_conditions(clauses: impl Iterator<Item = (Conjunction, String)>) -> String {
    clauses
        .enumerate()
        .map(|(i, (conjunction, clause))| {
            if i == 0 {
                clause
            } else {
                format!("  {} {}", conjunction, clause)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn generate_select(state: &QueryState) -> String {
    let mut parts: Vec<String> = Vec::new();

    let mut items: Vec<String> = state
        .aggregates
        .iter()
        .map(|agg| match agg.alias() {
            Some(alias) => format!("{}({}) AS {}", agg.function, agg.column, alias),
            None => format!("{}({})", agg.function, agg.column),
        })
        .collect();
    items.extend(state.columns.iter().cloned());
    let items = if items.is_empty() {
        "*".to_string()
    } else {
        items.join(", ")
    };
    let distinct = if state.distinct { " DISTINCT" } else { "" };
    parts.push(format!("SELECT{} {}", distinct, items));

    parts.push(format!("FROM {}", state.table));

    for join in state.complete_joins() {
        parts.push(format!(
            "{} JOIN {} ON {} = {}",
            join.join_type, join.table, join.on_left, join.on_right
        ));
    }

    if !state.where_conditions.is_empty() {
        let clauses = state.where_conditions.iter().map(|c| {
            let value = format_condition_value(c.operator, &c.value);
            (c.conjunction, format!("{} {} {}", c.column, c.operator, value))
        });
        parts.push(format!("WHERE {}", join_conditions(clauses)));
    }

    if !state.group_by.is_empty() {
        parts.push(format!("GROUP BY {}", state.group_by.join(", ")));
    }

    // HAVING values are formatted exactly like WHERE values, so text is quoted.
    if !state.having.is_empty() {
        let clauses = state.having.iter().map(|c| {
            let value = format_condition_value(c.operator, &c.value);
            (
                c.conjunction,
                format!("{}({}) {} {}", c.function, c.column, c.operator, value),
            )
        });
        parts.push(format!("HAVING {}", join_conditions(clauses)));
    }

    if !state.order_by.is_empty() {
        let order = state
            .order_by
            .iter()
            .map(|o| format!("{} {}", o.column, o.direction))
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("ORDER BY {}", order));
    }

    if let Some(limit) = state.limit.filter(|l| *l > 0) {
        parts.push(format!("LIMIT {}", limit));
    }
    if let Some(offset) = state.offset.filter(|o| *o > 0) {
        parts.push(format!("OFFSET {}", offset));
    }

    parts.join("\n") + ";"
}

fn generate_insert(state: &QueryState) -> String {
    let (columns, values): (Vec<&str>, Vec<String>) = state
        .insert_values
        .filled()
        .map(|(column, value)| (column, format_insert_value(value)))
        .unzip();

    if columns.is_empty() {
        return format!(
            "-- INSERT INTO {}\n-- Add values to insert a new row",
            state.table
        );
    }

    format!(
        "INSERT INTO {} ({})\nVALUES ({});",
        state.table,
        columns.join(", "),
        values.join(", ")
    )
}
