use super::statement::{QueryState, QueryType};
use crate::errors;
use crate::schema::Catalog;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER_REGEX: Regex = Regex::new(r#"^[A-Za-z_][A-Za-z0-9_.]*$"#).unwrap();
}

/// Validates an identifier (table, column or alias) against the regex.
///
/// # Arguments
/// * `name` - The identifier to validate.
///
/// # Returns
/// An `errors::Error` if the identifier is empty or malformed.
pub fn validate_identifier(name: &str) -> Result<(), errors::Error> {
    if name.is_empty() {
        return Err(errors::Error::Syntax("Identifier cannot be empty.".to_owned()));
    }
    if IDENTIFIER_REGEX.is_match(name) {
        Ok(())
    } else {
        Err(errors::Error::Syntax(format!(
            "Identifier ({}) must match regex {}.",
            name,
            IDENTIFIER_REGEX.as_str()
        )))
    }
}

/// Checks a column reference against the columns visible to the query.
///
/// Bare names resolve against any visible table, so `total` is accepted
/// when `orders.total` is joined in. `*` is always accepted.
fn validate_column(name: &str, visible: &[String], clause: &str) -> Result<(), errors::Error> {
    if name == "*" {
        return Ok(());
    }
    validate_identifier(name)?;
    let suffix = format!(".{}", name);
    let known = visible
        .iter()
        .any(|c| c == name || c.ends_with(&suffix));
    if known {
        Ok(())
    } else {
        Err(errors::Error::Schema(format!(
            "Unknown column '{}' in {}.",
            name, clause
        )))
    }
}

/// Validates a query against the catalog.
///
/// Purely advisory: SQL generation and execution never depend on it, they
/// skip what they cannot use.
///
/// # Arguments
/// * `state` - The query to check.
/// * `catalog` - Tables and columns the query may reference.
///
/// # Returns
/// The first problem found as an `errors::Error`.
pub fn validate_state(state: &QueryState, catalog: &Catalog) -> Result<(), errors::Error> {
    validate_identifier(&state.table)?;
    if catalog.table(&state.table).is_none() {
        return Err(errors::Error::Schema(format!(
            "Unknown table '{}'.",
            state.table
        )));
    }

    for join in state.complete_joins() {
        validate_identifier(&join.table)?;
        if catalog.table(&join.table).is_none() {
            return Err(errors::Error::Schema(format!(
                "Unknown table '{}' in JOIN.",
                join.table
            )));
        }
    }

    let joins: Vec<_> = state.complete_joins().cloned().collect();
    let mut visible = catalog.available_columns(&state.table, &joins);
    // Base columns are also addressable as `table.column`.
    if let Some(base) = catalog.table(&state.table) {
        visible.extend(
            base.columns
                .iter()
                .map(|c| format!("{}.{}", base.name, c.name)),
        );
    }

    for join in state.complete_joins() {
        validate_column(&join.on_left, &visible, "JOIN")?;
        validate_column(&join.on_right, &visible, "JOIN")?;
    }

    match state.query_type {
        QueryType::Insert => {
            for (column, _) in state.insert_values.iter() {
                validate_column(column, &visible, "INSERT")?;
            }
        }
        _ => {
            for column in &state.columns {
                validate_column(column, &visible, "SELECT")?;
            }
            for agg in &state.aggregates {
                validate_column(&agg.column, &visible, "SELECT")?;
                if let Some(alias) = agg.alias() {
                    validate_identifier(alias)?;
                }
            }
            for c in &state.where_conditions {
                validate_column(&c.column, &visible, "WHERE")?;
            }
            for column in &state.group_by {
                validate_column(column, &visible, "GROUP BY")?;
            }
            for c in &state.having {
                validate_column(&c.column, &visible, "HAVING")?;
            }
            // ORDER BY may also name an aggregate alias.
            let aliases: Vec<String> = state
                .aggregates
                .iter()
                .filter_map(|a| a.alias().map(str::to_string))
                .collect();
            for o in &state.order_by {
                if aliases.contains(&o.column) {
                    continue;
                }
                validate_column(&o.column, &visible, "ORDER BY")?;
            }
        }
    }

    Ok(())
}
