//! Database connection module for HealthRisk
//!
//! Connections are pooled with r2d2 on top of SQLite. A file database is used
//! when its parent directory can be created; otherwise the pool falls back to
//! an in-memory database so a session can still run.

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;
use tracing::{error, info, warn};

use super::migrations::run_sqlite_migrations;

/// Default location of the SQLite database file
pub const DEFAULT_SQLITE_PATH: &str = "data/health_risk.db";

/// Path value that selects an in-memory SQLite database
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// SQLite database (file-based or in-memory)
    Sqlite,
}

impl FromStr for DatabaseType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(DatabaseType::Sqlite),
            _ => Err(DatabaseError::UnsupportedDatabaseType(s.to_string())),
        }
    }
}

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Environment variable present but unusable
    #[error("Invalid value for environment variable {name}: {value}")]
    InvalidEnvVar { name: String, value: String },

    /// SQLite error
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// SQLite connection pool error
    #[error("SQLite connection pool error: {0}")]
    SqlitePoolError(#[from] r2d2::Error),

    /// Unsupported database type
    #[error("Unsupported database type: {0}")]
    UnsupportedDatabaseType(String),

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Database type
    pub db_type: DatabaseType,
    /// Path to the SQLite database file, or `:memory:`
    pub sqlite_path: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            sqlite_path: DEFAULT_SQLITE_PATH.to_string(),
            max_connections: 4,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    ///
    /// Recognised variables: `DB_TYPE`, `DB_SQLITE_PATH`, `DB_MAX_CONNECTIONS`
    /// and `DB_TIMEOUT_SECONDS`. Missing variables keep their defaults.
    pub fn from_env() -> Result<Self, DatabaseError> {
        let defaults = Self::default();

        let db_type = match env::var("DB_TYPE") {
            Ok(value) => value.parse::<DatabaseType>()?,
            Err(_) => defaults.db_type,
        };

        let sqlite_path = env::var("DB_SQLITE_PATH").unwrap_or(defaults.sqlite_path);
        let max_connections = parse_env_var("DB_MAX_CONNECTIONS", defaults.max_connections)?;
        let timeout_seconds = parse_env_var("DB_TIMEOUT_SECONDS", defaults.timeout_seconds)?;

        info!(
            "Database configuration: path={}, max_connections={}, timeout={}s",
            sqlite_path, max_connections, timeout_seconds
        );

        Ok(DatabaseConfig {
            db_type,
            sqlite_path,
            max_connections,
            timeout_seconds,
        })
    }

    /// Override the SQLite path
    pub fn with_sqlite_path(mut self, path: impl Into<String>) -> Self {
        self.sqlite_path = path.into();
        self
    }

    /// Configuration for a private in-memory database
    pub fn in_memory() -> Self {
        Self::default().with_sqlite_path(IN_MEMORY_PATH)
    }

    /// Whether this configuration selects an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.sqlite_path == IN_MEMORY_PATH
    }
}

fn parse_env_var<T: FromStr>(name: &str, default: T) -> Result<T, DatabaseError> {
    match env::var(name) {
        Ok(value) => value.parse::<T>().map_err(|_| DatabaseError::InvalidEnvVar {
            name: name.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

/// Database connection pool
#[derive(Clone)]
pub enum DatabasePool {
    /// SQLite connection pool
    SQLite(Arc<r2d2::Pool<SqliteConnectionManager>>),
}

impl fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabasePool::SQLite(pool) => f
                .debug_struct("DatabasePool::SQLite")
                .field("connections", &pool.state().connections)
                .finish(),
        }
    }
}

impl DatabasePool {
    /// Open the configured database and run migrations
    pub fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        info!("Initializing database pool with type: {:?}", config.db_type);

        let pool = match config.db_type {
            DatabaseType::Sqlite if config.is_in_memory() => initialize_in_memory_sqlite_pool(config)?,
            DatabaseType::Sqlite => initialize_sqlite_pool(config)?,
        };

        pool.run_migrations()?;
        Ok(pool)
    }

    /// Check out a SQLite connection
    pub fn sqlite_connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, DatabaseError> {
        match self {
            DatabasePool::SQLite(pool) => Ok(pool.get()?),
        }
    }

    fn run_migrations(&self) -> Result<(), DatabaseError> {
        info!("Running database migrations");

        let conn = self.sqlite_connection()?;
        run_sqlite_migrations(&conn)?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Describe the current database connection.
    ///
    /// Checks out a connection from the pool. The in-memory pool holds a
    /// single connection, so callers must release theirs first or this
    /// waits for the pool timeout.
    pub fn connection_info(&self) -> String {
        match self {
            DatabasePool::SQLite(pool) => {
                let conn = match pool.get() {
                    Ok(conn) => conn,
                    Err(e) => {
                        error!("Failed to get SQLite connection: {}", e);
                        return format!("SQLite connection error: {}", e);
                    }
                };

                let location = match conn.query_row("PRAGMA database_list", [], |row| row.get::<_, String>(2)) {
                    Ok(path) if path.is_empty() || path == IN_MEMORY_PATH => "SQLite in-memory database".to_string(),
                    Ok(path) => format!("SQLite database at {}", path),
                    Err(_) => "SQLite database (path unknown)".to_string(),
                };

                let state = pool.state();
                format!(
                    "{} (connections: active={}, idle={})",
                    location, state.connections, state.idle_connections
                )
            }
        }
    }
}

/// Initialize SQLite connection pool
fn initialize_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    let sqlite_path = &config.sqlite_path;
    info!("Initializing SQLite database at: {}", sqlite_path);

    if let Some(parent) = Path::new(sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating parent directory: {:?}", parent);
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create directory: {}, falling back to in-memory database", e);
                return initialize_in_memory_sqlite_pool(config);
            }
        }
    }

    let manager = SqliteConnectionManager::file(sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    let pool = match r2d2::Pool::builder()
        .max_size(config.max_connections.max(1))
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)
    {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to create SQLite connection pool: {}", e);
            warn!("Falling back to in-memory SQLite database");
            return initialize_in_memory_sqlite_pool(config);
        }
    };

    if let Err(e) = pool.get() {
        error!("Failed to connect to SQLite database: {}", e);
        warn!("Falling back to in-memory SQLite database");
        return initialize_in_memory_sqlite_pool(config);
    }

    info!("SQLite connection pool created successfully");
    Ok(DatabasePool::SQLite(Arc::new(pool)))
}

/// Initialize an in-memory SQLite database
///
/// Every in-memory connection is a separate database, so the pool holds
/// exactly one connection and never recycles it.
fn initialize_in_memory_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    let pool = r2d2::Pool::builder()
        .max_size(1)
        .min_idle(Some(1))
        .idle_timeout(None)
        .max_lifetime(None)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    info!("In-memory SQLite database initialized successfully");
    Ok(DatabasePool::SQLite(Arc::new(pool)))
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.db_type, DatabaseType::Sqlite);
        assert_eq!(config.sqlite_path, DEFAULT_SQLITE_PATH);
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.timeout_seconds, 30);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_database_type_from_str() {
        assert_eq!("sqlite".parse::<DatabaseType>().unwrap(), DatabaseType::Sqlite);
        assert_eq!("SQLite".parse::<DatabaseType>().unwrap(), DatabaseType::Sqlite);
        assert!("mysql".parse::<DatabaseType>().is_err());
        assert!("unknown".parse::<DatabaseType>().is_err());
    }

    #[test]
    fn test_in_memory_pool_runs_migrations() {
        let pool = DatabasePool::connect(&DatabaseConfig::in_memory()).unwrap();

        {
            let conn = pool.sqlite_connection().unwrap();
            let tables: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('individuals', 'health_assessments')",
                    [],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(tables, 2);
        }

        assert!(pool.connection_info().contains("in-memory"));
    }

    #[test]
    fn test_connection_info_reuses_single_in_memory_connection() {
        let pool = DatabasePool::connect(&DatabaseConfig::in_memory()).unwrap();

        let first = pool.connection_info();
        let second = pool.connection_info();
        assert_eq!(first, second);
        assert!(second.contains("in-memory"));

        // The released connection is still the migrated database.
        let conn = pool.sqlite_connection().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM individuals", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
