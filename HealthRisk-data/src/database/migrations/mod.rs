// Database migrations module
// Only SQLite is supported; the schema is created on every start-up.

mod sqlite;
pub use sqlite::run_migrations as run_sqlite_migrations;
