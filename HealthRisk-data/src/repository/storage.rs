use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::errors::RepositoryError;
use crate::database::DatabasePool;
use crate::models::assessment::{AssessmentRecord, CreateAssessmentRequest, RiskCounts};

const SELECT_ASSESSMENTS: &str = "SELECT a.id, a.person_id, i.name, i.age, a.assessment_date, a.recorded_at,
            a.weight_kg, a.height_m, a.systolic_bp, a.diastolic_bp, a.heart_rate_bpm, a.bmi,
            a.bmi_category, a.bp_category, a.hr_category, a.bmi_risk, a.bp_risk, a.hr_risk, a.overall_risk
     FROM health_assessments a
     JOIN individuals i ON i.id = a.person_id";

/// Database storage operations for assessments
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Store an assessment in the database.
    ///
    /// The individual row and the assessment row are written in one
    /// transaction; either both are committed or neither is.
    pub async fn store_assessment(
        pool: &DatabasePool,
        id: String,
        request: CreateAssessmentRequest,
    ) -> Result<AssessmentRecord, RepositoryError> {
        debug!("Storing assessment in database: id={}", id);

        let mut conn = pool.sqlite_connection()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO individuals (name, age, created_at) VALUES (?1, ?2, ?3)",
            params![&request.name, request.age, &request.recorded_at],
        )?;
        let person_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO health_assessments (
                id, person_id, assessment_date, recorded_at, weight_kg, height_m,
                systolic_bp, diastolic_bp, heart_rate_bpm, bmi,
                bmi_category, bp_category, hr_category, bmi_risk, bp_risk, hr_risk, overall_risk
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                &id,
                person_id,
                &request.assessment_date,
                &request.recorded_at,
                request.weight_kg,
                request.height_m,
                request.systolic_bp,
                request.diastolic_bp,
                request.heart_rate_bpm,
                request.bmi,
                &request.bmi_category,
                &request.bp_category,
                &request.hr_category,
                &request.bmi_risk,
                &request.bp_risk,
                &request.hr_risk,
                &request.overall_risk,
            ],
        )?;

        tx.commit()?;

        Ok(request.into_record(id, person_id))
    }

    /// Get all assessments from the database, most recent first
    pub async fn get_all(pool: &DatabasePool) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        debug!("Getting all assessments from database");

        let conn = pool.sqlite_connection()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY a.recorded_at DESC", SELECT_ASSESSMENTS))?;

        let records = stmt.query_map([], map_row)?;

        let mut result = Vec::new();
        for record in records {
            result.push(record?);
        }

        Ok(result)
    }

    /// Get an assessment by id from the database
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> Result<Option<AssessmentRecord>, RepositoryError> {
        debug!("Getting assessment by ID from database: id={}", id);

        let conn = pool.sqlite_connection()?;
        let mut stmt = conn.prepare(&format!("{} WHERE a.id = ?1", SELECT_ASSESSMENTS))?;

        let record = stmt.query_row([id], map_row).optional()?;
        Ok(record)
    }

    /// Count assessments per overall risk, optionally restricted to one date
    pub async fn count_by_overall_risk(
        pool: &DatabasePool,
        on_date: Option<NaiveDate>,
    ) -> Result<RiskCounts, RepositoryError> {
        debug!("Counting assessments by overall risk: date={:?}", on_date);

        let conn = pool.sqlite_connection()?;
        let date = on_date.map(|d| d.to_string());

        let mut stmt = conn.prepare(
            "SELECT overall_risk, COUNT(*)
             FROM health_assessments
             WHERE ?1 IS NULL OR assessment_date = ?1
             GROUP BY overall_risk",
        )?;

        let rows = stmt.query_map([&date], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;

        let mut counts = RiskCounts::default();
        for row in rows {
            let (risk, count) = row?;
            counts
                .add(&risk, count.max(0) as u64)
                .map_err(RepositoryError::CorruptRecord)?;
        }

        Ok(counts)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<AssessmentRecord> {
    Ok(AssessmentRecord {
        id: row.get(0)?,
        person_id: row.get(1)?,
        name: row.get(2)?,
        age: row.get(3)?,
        assessment_date: row.get(4)?,
        recorded_at: row.get(5)?,
        weight_kg: row.get(6)?,
        height_m: row.get(7)?,
        systolic_bp: row.get(8)?,
        diastolic_bp: row.get(9)?,
        heart_rate_bpm: row.get(10)?,
        bmi: row.get(11)?,
        bmi_category: row.get(12)?,
        bp_category: row.get(13)?,
        hr_category: row.get(14)?,
        bmi_risk: row.get(15)?,
        bp_risk: row.get(16)?,
        hr_risk: row.get(17)?,
        overall_risk: row.get(18)?,
    })
}
