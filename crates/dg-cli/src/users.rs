//! Sample user table

use dg_queries::{Column, ColumnSet};

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub name: String,
    pub email: String,
    pub role: String,
    pub age: u32,
    pub join_date: String,
}

impl User {
    fn new(name: &str, email: &str, role: &str, age: u32, join_date: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            age,
            join_date: join_date.to_string(),
        }
    }
}

pub fn columns() -> ColumnSet<User> {
    ColumnSet::new()
        .with(Column::string("name", "Name", |u: &User| u.name.clone()))
        .with(Column::string("email", "Email", |u: &User| u.email.clone()).with_width(200))
        .with(Column::string("role", "Role", |u: &User| u.role.clone()).with_width(120))
        .with(Column::number("age", "Age", |u: &User| u.age.to_string()).with_width(100))
        .with(Column::date("joinDate", "Join Date", |u: &User| u.join_date.clone()))
}

pub fn sample_users() -> Vec<User> {
    vec![
        User::new("John Doe", "john@example.com", "Admin", 30, "2023-01-15"),
        User::new("Jane Smith", "jane@example.com", "User", 28, "2023-02-20"),
        User::new("Bob Johnson", "bob@example.com", "User", 35, "2023-03-10"),
        User::new("Alice Brown", "alice@example.com", "Admin", 32, "2023-04-05"),
        User::new("Charlie Wilson", "charlie@example.com", "User", 27, "2023-05-12"),
    ]
}
