// Database modules
pub mod connection;
pub mod migrations;

// Re-export database connection types
pub use connection::{
    DatabaseConfig, DatabaseError, DatabasePool, DatabaseType, DEFAULT_SQLITE_PATH, IN_MEMORY_PATH,
};
