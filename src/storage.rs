/// In-memory tables backing the query preview.
mod mock;
pub mod row;
pub mod value;

pub use row::Row;
pub use value::Value;

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The process-wide sample dataset. Built on first use, never mutated.
pub static MOCK_DATASET: Lazy<Dataset> = Lazy::new(mock::build);

/// A set of named tables, each a list of rows.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    tables: HashMap<String, Vec<Row>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a table and returns the dataset, for chained setup.
    pub fn with_table(mut self, name: &str, rows: Vec<Row>) -> Self {
        self.tables.insert(name.to_string(), rows);
        self
    }

    /// Rows of `table`; an unknown table is simply empty.
    pub fn rows(&self, table: &str) -> &[Row] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Rows of a table from the sample dataset.
pub fn get_mock_data(table: &str) -> &'static [Row] {
    MOCK_DATASET.rows(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CATALOG;

    #[test]
    fn test_unknown_table_is_empty() {
        assert!(get_mock_data("nope").is_empty());
    }

    #[test]
    fn test_mock_rows_follow_catalog_columns() {
        for table in CATALOG.tables() {
            let rows = get_mock_data(&table.name);
            assert!(!rows.is_empty(), "{} has no sample rows", table.name);
            let expected: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
            for row in rows {
                assert_eq!(row.keys().collect::<Vec<_>>(), expected, "{}", table.name);
                for column in &table.columns {
                    if !column.nullable {
                        assert!(
                            !row.get(&column.name).unwrap().is_null(),
                            "{}.{} must not be null",
                            table.name,
                            column.name
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_table_names_sorted() {
        assert_eq!(
            MOCK_DATASET.table_names(),
            vec!["orders", "posts", "products", "users"]
        );
    }
}
