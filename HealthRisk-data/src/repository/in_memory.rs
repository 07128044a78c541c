use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use super::errors::RepositoryError;
use crate::models::assessment::{AssessmentRecord, CreateAssessmentRequest, RiskCounts};

#[derive(Debug, Default)]
struct Store {
    records: Vec<AssessmentRecord>,
    last_person_id: i64,
}

/// In-memory storage implementation for assessments
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    store: Arc<Mutex<Store>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an assessment in memory, assigning the next person id
    pub async fn store_assessment(
        &self,
        id: String,
        request: CreateAssessmentRequest,
    ) -> Result<AssessmentRecord, RepositoryError> {
        let mut store = self.store.lock()?;
        store.last_person_id += 1;
        let record = request.into_record(id, store.last_person_id);
        store.records.push(record.clone());
        Ok(record)
    }

    /// Get all assessments, most recent first
    pub async fn get_all(&self) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let store = self.store.lock()?;
        let mut records = store.records.clone();
        records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(records)
    }

    /// Get an assessment by id
    pub async fn get_by_id(&self, id: &str) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let store = self.store.lock()?;
        Ok(store.records.iter().find(|r| r.id == id).cloned())
    }

    /// Count assessments per overall risk, optionally for a single date
    pub async fn count_by_overall_risk(&self, on_date: Option<NaiveDate>) -> Result<RiskCounts, RepositoryError> {
        let store = self.store.lock()?;
        let date = on_date.map(|d| d.to_string());

        let mut counts = RiskCounts::default();
        for record in store
            .records
            .iter()
            .filter(|r| date.as_deref().map_or(true, |d| r.assessment_date == d))
        {
            counts.add(&record.overall_risk, 1).map_err(RepositoryError::CorruptRecord)?;
        }

        Ok(counts)
    }
}
