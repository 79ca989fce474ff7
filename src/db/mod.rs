// Re-export the Database struct and other public items
pub mod core;
pub mod person;
mod schema;
mod terms;

// Re-export Database and the row types callers work with
pub use self::core::Database;
pub use self::person::PersonRow;
pub use sqlx::Row;
