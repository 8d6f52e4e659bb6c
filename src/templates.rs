/// Built-in starter queries.
use crate::sql::{
    Aggregate, AggregateFunction as F, HavingCondition, InsertValues, JoinClause, JoinType,
    Operator, OrderSpec, QueryState, SortDirection, WhereCondition,
};
use once_cell::sync::Lazy;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
        })
    }
}

#[derive(Debug, Clone)]
pub struct QueryTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub state: QueryState,
}

pub static TEMPLATES: Lazy<Vec<QueryTemplate>> = Lazy::new(build);

/// Looks a template up by name, ignoring case.
pub fn find(name: &str) -> Option<&'static QueryTemplate> {
    let name = name.trim();
    TEMPLATES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}

fn template(
    name: &'static str,
    description: &'static str,
    difficulty: Difficulty,
    state: QueryState,
) -> QueryTemplate {
    QueryTemplate {
        name,
        description,
        difficulty,
        state,
    }
}

fn select(table: &str, columns: &[&str]) -> QueryState {
    let mut state = QueryState::select(table);
    state.columns = columns.iter().map(|c| c.to_string()).collect();
    state
}

fn insert(table: &str, values: &[(&str, &str)]) -> QueryState {
    let mut state = QueryState::insert(table);
    state.insert_values = values.iter().copied().collect::<InsertValues>();
    state
}

fn count_star(alias: &str) -> Aggregate {
    Aggregate::new(F::Count, "*").with_alias(alias)
}

fn desc(column: &str) -> Vec<OrderSpec> {
    vec![OrderSpec::new(column, SortDirection::Desc)]
}

fn build() -> Vec<QueryTemplate> {
    use Difficulty::*;

    let mut templates = Vec::new();

    templates.push(template(
        "Get All Users",
        "Learn: Basic SELECT statement",
        Beginner,
        select("users", &["id", "name", "email", "age", "status"]),
    ));

    templates.push(template(
        "Select Specific Columns",
        "Learn: Choose only the data you need",
        Beginner,
        select("products", &["name", "price", "category"]),
    ));

    let mut state = select("users", &["name", "email", "status"]);
    state.where_conditions = vec![WhereCondition::new("status", Operator::Eq, "active")];
    templates.push(template(
        "Filter by Status",
        "Learn: WHERE with exact match (=)",
        Beginner,
        state,
    ));

    let mut state = select("users", &["name", "age", "email"]);
    state.where_conditions = vec![WhereCondition::new("age", Operator::Gt, "25")];
    templates.push(template(
        "Find by Age Range",
        "Learn: Numeric comparison with >",
        Intermediate,
        state,
    ));

    let mut state = select("users", &["name", "email"]);
    state.where_conditions = vec![WhereCondition::new("email", Operator::Like, "%@gmail.com")];
    templates.push(template(
        "Email Pattern Search",
        "Learn: LIKE with % wildcard",
        Intermediate,
        state,
    ));

    let mut state = select("posts", &["title", "user_id", "created_at"]);
    state.order_by = desc("created_at");
    state.limit = Some(5);
    templates.push(template(
        "Sort & Limit Results",
        "Learn: ORDER BY + LIMIT for top results",
        Intermediate,
        state,
    ));

    let mut state = select("users", &["name", "age", "status"]);
    state.where_conditions = vec![
        WhereCondition::new("status", Operator::Eq, "active"),
        WhereCondition::new("age", Operator::Gt, "18"),
    ];
    templates.push(template(
        "Multiple Conditions",
        "Learn: Combine filters with AND",
        Advanced,
        state,
    ));

    let mut state = select("posts", &["title", "user_id", "views", "created_at"]);
    state.order_by = desc("created_at");
    state.limit = Some(10);
    state.offset = Some(0);
    templates.push(template(
        "Pagination Example",
        "Learn: LIMIT + OFFSET for pages",
        Advanced,
        state,
    ));

    let mut state = select("users", &[]);
    state.aggregates = vec![count_star("total_users")];
    templates.push(template(
        "Count Total Rows",
        "Learn: COUNT(*) aggregate function",
        Advanced,
        state,
    ));

    let mut state = select("users", &["status"]);
    state.aggregates = vec![count_star("user_count")];
    state.group_by = vec!["status".into()];
    state.order_by = desc("user_count");
    templates.push(template(
        "Count by Status",
        "Learn: GROUP BY with COUNT",
        Advanced,
        state,
    ));

    let mut state = select("users", &["city"]);
    state.aggregates = vec![
        Aggregate::new(F::Avg, "age").with_alias("avg_age"),
        count_star("total"),
    ];
    state.group_by = vec!["city".into()];
    state.order_by = desc("avg_age");
    templates.push(template(
        "Average Age by City",
        "Learn: AVG with GROUP BY",
        Advanced,
        state,
    ));

    let mut state = select("orders", &["product_id"]);
    state.aggregates = vec![
        Aggregate::new(F::Sum, "total").with_alias("revenue"),
        count_star("order_count"),
    ];
    state.where_conditions = vec![WhereCondition::new("status", Operator::Eq, "delivered")];
    state.group_by = vec!["product_id".into()];
    state.order_by = desc("revenue");
    state.limit = Some(10);
    templates.push(template(
        "Total Sales by Product",
        "Learn: SUM with WHERE & GROUP BY",
        Advanced,
        state,
    ));

    let mut state = select("users", &["status"]);
    state.aggregates = vec![count_star("count")];
    state.group_by = vec!["status".into()];
    state.having = vec![HavingCondition::new(F::Count, "*", Operator::Gt, "10")];
    state.order_by = desc("count");
    templates.push(template(
        "Filter Groups (HAVING)",
        "Learn: HAVING clause for groups",
        Advanced,
        state,
    ));

    let mut state = select("products", &["category"]);
    state.aggregates = vec![
        count_star("total_products"),
        Aggregate::new(F::Avg, "price").with_alias("avg_price"),
        Aggregate::new(F::Min, "price").with_alias("min_price"),
        Aggregate::new(F::Max, "price").with_alias("max_price"),
    ];
    state.where_conditions = vec![WhereCondition::new("is_active", Operator::Eq, "true")];
    state.group_by = vec!["category".into()];
    state.having = vec![HavingCondition::new(F::Count, "*", Operator::GtEq, "5")];
    state.order_by = desc("avg_price");
    templates.push(template(
        "Product Analytics",
        "Learn: Multiple aggregates & HAVING",
        Advanced,
        state,
    ));

    templates.push(template(
        "Add New User",
        "Learn: INSERT with required fields",
        Beginner,
        insert(
            "users",
            &[
                ("id", "1"),
                ("name", "John Doe"),
                ("email", "john.doe@example.com"),
                ("age", "28"),
                ("status", "active"),
                ("role", "user"),
                ("city", "New York"),
                ("created_at", "2024-01-15 10:30:00"),
                ("updated_at", "2024-01-15 10:30:00"),
            ],
        ),
    ));

    templates.push(template(
        "Add Product",
        "Learn: INSERT with all field types",
        Intermediate,
        insert(
            "products",
            &[
                ("id", "1"),
                ("name", "Wireless Mouse"),
                ("description", "Ergonomic wireless mouse with USB receiver"),
                ("price", "29"),
                ("stock", "150"),
                ("category", "Electronics"),
                ("brand", "TechBrand"),
                ("is_active", "true"),
                ("created_at", "2024-01-15 10:30:00"),
            ],
        ),
    ));

    templates.push(template(
        "Create Order",
        "Learn: INSERT with foreign keys",
        Intermediate,
        insert(
            "orders",
            &[
                ("id", "1"),
                ("user_id", "1"),
                ("product_id", "15"),
                ("quantity", "2"),
                ("total", "60"),
                ("status", "pending"),
                ("payment_method", "credit_card"),
                ("created_at", "2024-01-15 10:30:00"),
            ],
        ),
    ));

    let mut state = select("users", &["users.name", "users.email", "orders.total"]);
    state.joins = vec![JoinClause::new(
        JoinType::Inner,
        "orders",
        "users.id",
        "orders.user_id",
    )];
    state.limit = Some(20);
    state.offset = Some(0);
    templates.push(template(
        "Users with Orders",
        "Learn: INNER JOIN for matching rows",
        Expert,
        state,
    ));

    let mut state = select("users", &["users.name", "users.email"]);
    state.joins = vec![JoinClause::new(
        JoinType::Left,
        "orders",
        "users.id",
        "orders.user_id",
    )];
    state.aggregates = vec![Aggregate::new(F::Count, "orders.id").with_alias("order_count")];
    state.group_by = vec!["users.name".into(), "users.email".into()];
    state.order_by = desc("order_count");
    state.limit = Some(20);
    state.offset = Some(0);
    templates.push(template(
        "All Users + Order Count",
        "Learn: LEFT JOIN with GROUP BY",
        Expert,
        state,
    ));

    let mut state = select(
        "orders",
        &[
            "orders.id",
            "users.name",
            "products.name",
            "orders.quantity",
            "orders.total",
        ],
    );
    state.joins = vec![
        JoinClause::new(JoinType::Inner, "users", "orders.user_id", "users.id"),
        JoinClause::new(JoinType::Inner, "products", "orders.product_id", "products.id"),
    ];
    state.order_by = desc("orders.total");
    state.limit = Some(20);
    state.offset = Some(0);
    templates.push(template(
        "Orders with Product Details",
        "Learn: INNER JOIN with multiple tables",
        Expert,
        state,
    ));

    templates
}
