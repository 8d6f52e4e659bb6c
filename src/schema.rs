use crate::sql::statement::JoinClause;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;

/// The fixed catalog of sample tables the builder knows about.
pub static CATALOG: Lazy<Catalog> = Lazy::new(Catalog::sample);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlType {
    Integer,
    Decimal,
    Varchar,
    Text,
    Boolean,
    Date,
    Timestamp,
    Json,
}

/// Broad family a column type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Numeric,
    String,
    DateTime,
    Boolean,
    Json,
}

impl SqlType {
    pub fn category(&self) -> TypeCategory {
        match self {
            SqlType::Integer | SqlType::Decimal => TypeCategory::Numeric,
            SqlType::Varchar | SqlType::Text => TypeCategory::String,
            SqlType::Date | SqlType::Timestamp => TypeCategory::DateTime,
            SqlType::Boolean => TypeCategory::Boolean,
            SqlType::Json => TypeCategory::Json,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Integer => write!(f, "INTEGER"),
            SqlType::Decimal => write!(f, "DECIMAL"),
            SqlType::Varchar => write!(f, "VARCHAR"),
            SqlType::Text => write!(f, "TEXT"),
            SqlType::Boolean => write!(f, "BOOLEAN"),
            SqlType::Date => write!(f, "DATE"),
            SqlType::Timestamp => write!(f, "TIMESTAMP"),
            SqlType::Json => write!(f, "JSON"),
        }
    }
}

impl TypeCategory {
    pub fn description(&self) -> &'static str {
        match self {
            TypeCategory::Numeric => "Stores numbers (integers or decimals)",
            TypeCategory::String => "Stores text/characters",
            TypeCategory::DateTime => "Stores dates and/or times",
            TypeCategory::Boolean => "Stores true/false values",
            TypeCategory::Json => "Stores JSON structured data",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: SqlType,
    pub nullable: bool,
}

impl ColumnDefinition {
    fn new(name: &str, type_: SqlType, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            type_,
            nullable,
        }
    }

    /// One-line description, e.g. `INTEGER - Stores numbers (integers or decimals) (Required)`.
    pub fn describe(&self) -> String {
        format!(
            "{} - {} ({})",
            self.type_,
            self.type_.category().description(),
            if self.nullable { "Optional" } else { "Required" }
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    tables: Vec<TableSchema>,
}

impl Catalog {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Column names selectable for `table` given its joins.
    ///
    /// Base-table columns are bare. Once any join is present, the joined
    /// tables contribute `table.column` names; joins naming an unknown table
    /// contribute nothing.
    pub fn available_columns(&self, table: &str, joins: &[JoinClause]) -> Vec<String> {
        let Some(base) = self.table(table) else {
            return Vec::new();
        };
        let mut columns: Vec<String> = base.columns.iter().map(|c| c.name.clone()).collect();
        for join in joins {
            if let Some(joined) = self.table(&join.table) {
                if joined.name == base.name {
                    continue;
                }
                columns.extend(
                    joined
                        .columns
                        .iter()
                        .map(|c| format!("{}.{}", joined.name, c.name)),
                );
            }
        }
        columns
    }

    fn sample() -> Self {
        use SqlType::*;
        let table = |name: &str, columns: &[(&str, SqlType, bool)]| TableSchema {
            name: name.to_string(),
            columns: columns
                .iter()
                .map(|(n, t, nullable)| ColumnDefinition::new(n, *t, *nullable))
                .collect(),
        };

        Catalog::new(vec![
            table(
                "users",
                &[
                    ("id", Integer, false),
                    ("name", Varchar, false),
                    ("email", Varchar, false),
                    ("age", Integer, true),
                    ("status", Varchar, false),
                    ("role", Varchar, false),
                    ("city", Varchar, true),
                    ("created_at", Timestamp, false),
                    ("updated_at", Timestamp, true),
                ],
            ),
            table(
                "products",
                &[
                    ("id", Integer, false),
                    ("name", Varchar, false),
                    ("description", Text, true),
                    ("price", Decimal, false),
                    ("stock", Integer, false),
                    ("category", Varchar, false),
                    ("brand", Varchar, true),
                    ("is_active", Boolean, false),
                    ("created_at", Timestamp, false),
                ],
            ),
            table(
                "orders",
                &[
                    ("id", Integer, false),
                    ("user_id", Integer, false),
                    ("product_id", Integer, false),
                    ("quantity", Integer, false),
                    ("total", Decimal, false),
                    ("status", Varchar, false),
                    ("payment_method", Varchar, true),
                    ("created_at", Timestamp, false),
                ],
            ),
            table(
                "posts",
                &[
                    ("id", Integer, false),
                    ("user_id", Integer, false),
                    ("title", Varchar, false),
                    ("content", Text, true),
                    ("views", Integer, false),
                    ("published", Boolean, false),
                    ("created_at", Timestamp, false),
                ],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::statement::JoinType;

    fn join(table: &str) -> JoinClause {
        JoinClause::new(JoinType::Inner, table, "users.id", &format!("{}.user_id", table))
    }

    #[test]
    fn test_lookup_and_declaration_order() {
        let users = CATALOG.table("users").unwrap();
        assert_eq!(users.columns[0].name, "id");
        assert_eq!(users.columns.last().unwrap().name, "updated_at");
        assert!(CATALOG.table("missing").is_none());
    }

    #[test]
    fn test_describe_column() {
        let age = CATALOG.table("users").unwrap().column("age").unwrap();
        assert_eq!(
            age.describe(),
            "INTEGER - Stores numbers (integers or decimals) (Optional)"
        );
        let active = CATALOG.table("products").unwrap().column("is_active").unwrap();
        assert_eq!(active.describe(), "BOOLEAN - Stores true/false values (Required)");
    }

    #[test]
    fn test_available_columns_prefix_joined_tables() {
        let plain = CATALOG.available_columns("users", &[]);
        assert!(plain.contains(&"email".to_string()));
        assert!(!plain.iter().any(|c| c.contains('.')));

        let joined = CATALOG.available_columns("users", &[join("orders"), join("ghosts")]);
        assert!(joined.contains(&"email".to_string()));
        assert!(joined.contains(&"orders.total".to_string()));
        assert_eq!(joined.len(), plain.len() + 8);
    }

    #[test]
    fn test_available_columns_unknown_base() {
        assert!(CATALOG.available_columns("ghosts", &[join("orders")]).is_empty());
    }
}
