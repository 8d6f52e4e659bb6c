/// Fixed sample rows backing the live preview.
///
/// The data is deliberately uneven: Frank has no orders, order 10 belongs to
/// a user that does not exist and a few nullable columns are null, so every
/// join type produces visibly different output.
use super::{Dataset, Row, Value};
use crate::row;

pub(super) fn build() -> Dataset {
    Dataset::new()
        .with_table("users", users())
        .with_table("products", products())
        .with_table("orders", orders())
        .with_table("posts", posts())
}

fn users() -> Vec<Row> {
    vec![
        row! {
            "id" => 1, "name" => "Alice Johnson", "email" => "alice@gmail.com", "age" => 28,
            "status" => "active", "role" => "admin", "city" => "New York",
            "created_at" => "2024-01-15 10:30:00", "updated_at" => "2024-03-01 09:00:00",
        },
        row! {
            "id" => 2, "name" => "Bob Smith", "email" => "bob@example.com", "age" => 35,
            "status" => "active", "role" => "user", "city" => "London",
            "created_at" => "2024-01-20 14:05:00", "updated_at" => Value::Null,
        },
        row! {
            "id" => 3, "name" => "Carol White", "email" => "carol@gmail.com", "age" => 22,
            "status" => "inactive", "role" => "user", "city" => "Paris",
            "created_at" => "2024-02-02 08:15:00", "updated_at" => "2024-02-10 12:00:00",
        },
        row! {
            "id" => 4, "name" => "David Brown", "email" => "david@example.com", "age" => 41,
            "status" => "active", "role" => "moderator", "city" => "New York",
            "created_at" => "2024-02-11 17:45:00", "updated_at" => Value::Null,
        },
        row! {
            "id" => 5, "name" => "Eva Green", "email" => "eva@outlook.com", "age" => Value::Null,
            "status" => "pending", "role" => "user", "city" => Value::Null,
            "created_at" => "2024-02-28 11:20:00", "updated_at" => Value::Null,
        },
        row! {
            "id" => 6, "name" => "Frank Miller", "email" => "frank@gmail.com", "age" => 19,
            "status" => "active", "role" => "user", "city" => "Berlin",
            "created_at" => "2024-03-05 16:00:00", "updated_at" => "2024-03-06 10:10:00",
        },
        row! {
            "id" => 7, "name" => "Grace Lee", "email" => "grace@example.com", "age" => 30,
            "status" => "banned", "role" => "user", "city" => "London",
            "created_at" => "2024-03-12 07:30:00", "updated_at" => Value::Null,
        },
    ]
}

fn products() -> Vec<Row> {
    vec![
        row! {
            "id" => 1, "name" => "Wireless Mouse", "description" => "Ergonomic wireless mouse",
            "price" => 29.99, "stock" => 150, "category" => "Electronics", "brand" => "TechBrand",
            "is_active" => true, "created_at" => "2024-01-02 09:00:00",
        },
        row! {
            "id" => 2, "name" => "Mechanical Keyboard", "description" => "RGB backlit, blue switches",
            "price" => 89.5, "stock" => 40, "category" => "Electronics", "brand" => "KeyWorks",
            "is_active" => true, "created_at" => "2024-01-03 09:00:00",
        },
        row! {
            "id" => 3, "name" => "Desk Lamp", "description" => Value::Null,
            "price" => 24, "stock" => 0, "category" => "Home", "brand" => Value::Null,
            "is_active" => false, "created_at" => "2024-01-05 13:30:00",
        },
        row! {
            "id" => 4, "name" => "Coffee Mug", "description" => "Ceramic, 350ml",
            "price" => 9.99, "stock" => 320, "category" => "Kitchen", "brand" => "HomeGoods",
            "is_active" => true, "created_at" => "2024-01-08 10:00:00",
        },
        row! {
            "id" => 5, "name" => "Notebook", "description" => "A5 dotted, 120 pages",
            "price" => 4.5, "stock" => 500, "category" => "Stationery", "brand" => "PaperCo",
            "is_active" => true, "created_at" => "2024-01-10 15:45:00",
        },
        row! {
            "id" => 6, "name" => "USB-C Hub", "description" => "7-in-1 adapter",
            "price" => 45, "stock" => 75, "category" => "Electronics", "brand" => "TechBrand",
            "is_active" => true, "created_at" => "2024-02-01 08:00:00",
        },
    ]
}

fn orders() -> Vec<Row> {
    vec![
        row! {
            "id" => 1, "user_id" => 1, "product_id" => 1, "quantity" => 2, "total" => 59.98,
            "status" => "delivered", "payment_method" => "credit_card",
            "created_at" => "2024-02-01 10:00:00",
        },
        row! {
            "id" => 2, "user_id" => 1, "product_id" => 4, "quantity" => 1, "total" => 9.99,
            "status" => "delivered", "payment_method" => "paypal",
            "created_at" => "2024-02-03 12:30:00",
        },
        row! {
            "id" => 3, "user_id" => 2, "product_id" => 2, "quantity" => 1, "total" => 89.5,
            "status" => "shipped", "payment_method" => "credit_card",
            "created_at" => "2024-02-07 09:15:00",
        },
        row! {
            "id" => 4, "user_id" => 3, "product_id" => 5, "quantity" => 4, "total" => 18,
            "status" => "pending", "payment_method" => Value::Null,
            "created_at" => "2024-02-12 18:40:00",
        },
        row! {
            "id" => 5, "user_id" => 4, "product_id" => 6, "quantity" => 1, "total" => 45,
            "status" => "delivered", "payment_method" => "debit_card",
            "created_at" => "2024-02-20 14:00:00",
        },
        row! {
            "id" => 6, "user_id" => 2, "product_id" => 1, "quantity" => 1, "total" => 29.99,
            "status" => "cancelled", "payment_method" => "paypal",
            "created_at" => "2024-02-25 11:11:00",
        },
        row! {
            "id" => 7, "user_id" => 5, "product_id" => 3, "quantity" => 2, "total" => 48,
            "status" => "delivered", "payment_method" => "credit_card",
            "created_at" => "2024-03-02 16:20:00",
        },
        row! {
            "id" => 8, "user_id" => 7, "product_id" => 2, "quantity" => 1, "total" => 89.5,
            "status" => "shipped", "payment_method" => "credit_card",
            "created_at" => "2024-03-08 10:05:00",
        },
        row! {
            "id" => 9, "user_id" => 4, "product_id" => 4, "quantity" => 6, "total" => 59.94,
            "status" => "delivered", "payment_method" => "debit_card",
            "created_at" => "2024-03-10 09:50:00",
        },
        row! {
            "id" => 10, "user_id" => 99, "product_id" => 5, "quantity" => 3, "total" => 13.5,
            "status" => "pending", "payment_method" => Value::Null,
            "created_at" => "2024-03-14 13:00:00",
        },
    ]
}

fn posts() -> Vec<Row> {
    vec![
        row! {
            "id" => 1, "user_id" => 1, "title" => "Getting started with SQL",
            "content" => "SELECT is where it all begins.", "views" => 1250, "published" => true,
            "created_at" => "2024-01-18 09:00:00",
        },
        row! {
            "id" => 2, "user_id" => 4, "title" => "Understanding JOINs",
            "content" => "INNER, LEFT, RIGHT and FULL explained.", "views" => 980, "published" => true,
            "created_at" => "2024-02-05 10:30:00",
        },
        row! {
            "id" => 3, "user_id" => 1, "title" => "GROUP BY in practice",
            "content" => Value::Null, "views" => 430, "published" => false,
            "created_at" => "2024-02-19 15:00:00",
        },
        row! {
            "id" => 4, "user_id" => 2, "title" => "Indexes 101",
            "content" => "Why your query is slow.", "views" => 2210, "published" => true,
            "created_at" => "2024-03-01 08:45:00",
        },
        row! {
            "id" => 5, "user_id" => 6, "title" => "My first query",
            "content" => "It worked!", "views" => 75, "published" => true,
            "created_at" => "2024-03-07 19:20:00",
        },
        row! {
            "id" => 6, "user_id" => 3, "title" => "Draft: window functions",
            "content" => Value::Null, "views" => 0, "published" => false,
            "created_at" => "2024-03-13 11:00:00",
        },
    ]
}
