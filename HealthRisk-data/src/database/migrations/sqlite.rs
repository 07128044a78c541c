use rusqlite::Connection;
use tracing::info;

use crate::database::DatabaseError;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Running SQLite migrations");

    create_individuals_table(conn)?;
    create_assessments_table(conn)?;
    create_assessment_date_index(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the individuals table
fn create_individuals_table(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Creating individuals table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS individuals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            age INTEGER,
            created_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| DatabaseError::MigrationError(format!("Failed to create individuals table: {}", e)))?;

    Ok(())
}

/// Create the health assessments table
fn create_assessments_table(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Creating health_assessments table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS health_assessments (
            id TEXT PRIMARY KEY,
            person_id INTEGER NOT NULL REFERENCES individuals (id),
            assessment_date TEXT NOT NULL,
            recorded_at TEXT NOT NULL,
            weight_kg REAL NOT NULL,
            height_m REAL NOT NULL,
            systolic_bp INTEGER NOT NULL,
            diastolic_bp INTEGER NOT NULL,
            heart_rate_bpm INTEGER NOT NULL,
            bmi REAL NOT NULL,
            bmi_category TEXT NOT NULL,
            bp_category TEXT NOT NULL,
            hr_category TEXT NOT NULL,
            bmi_risk TEXT NOT NULL,
            bp_risk TEXT NOT NULL,
            hr_risk TEXT NOT NULL,
            overall_risk TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| DatabaseError::MigrationError(format!("Failed to create health_assessments table: {}", e)))?;

    Ok(())
}

/// Create index on assessment date for the daily summary
fn create_assessment_date_index(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Creating index on assessment_date");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_health_assessments_date
        ON health_assessments (assessment_date)",
        [],
    )
    .map_err(|e| DatabaseError::MigrationError(format!("Failed to create index: {}", e)))?;

    Ok(())
}
