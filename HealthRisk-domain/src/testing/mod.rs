// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use health_risk_data::repository::tests::{sample_request, MockAssessmentRepository};

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{Local, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::entities::assessment::{AssessmentRecord, OverallAssessment, SessionSummary, SummaryScope};
use crate::entities::vitals::{describe_validation_errors, PersonDetails, VitalReading};
use crate::services::aggregator;
use crate::services::assessment::{AssessmentServiceError, AssessmentServiceTrait};

/// Reading from the low-risk reference scenario (70 kg, 1.75 m, 120/80, 75 bpm)
pub fn low_risk_reading() -> VitalReading {
    VitalReading::new(70.0, 1.75, 120, 80, 75)
}

/// Reading from the high-risk reference scenario (90 kg, 1.60 m, 150/95, 110 bpm)
pub fn high_risk_reading() -> VitalReading {
    VitalReading::new(90.0, 1.60, 150, 95, 110)
}

/// Mock implementation of the AssessmentServiceTrait for testing
///
/// Validation and classification are real; persistence lives in a vector and each operation
/// can be configured to fail.
#[derive(Default)]
pub struct MockAssessmentService {
    records: RwLock<Vec<AssessmentRecord>>,
    should_fail_validation: bool,
    should_fail_recording: bool,
    should_fail_summary: bool,
}

impl MockAssessmentService {
    /// Create a new mock assessment service
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail validation
    pub fn with_validation_failure(mut self) -> Self {
        self.should_fail_validation = true;
        self
    }

    /// Configure the mock to fail persistence
    pub fn with_recording_failure(mut self) -> Self {
        self.should_fail_recording = true;
        self
    }

    /// Configure the mock to fail persisted summaries
    pub fn with_summary_failure(mut self) -> Self {
        self.should_fail_summary = true;
        self
    }

    /// Number of records persisted so far
    pub fn recorded_count(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    fn lock_error<T>(_: T) -> AssessmentServiceError {
        AssessmentServiceError::RepositoryError("mock record store lock poisoned".to_string())
    }
}

#[async_trait]
impl AssessmentServiceTrait for MockAssessmentService {
    fn validate_input(&self, person: &PersonDetails, reading: &VitalReading) -> Result<(), AssessmentServiceError> {
        if self.should_fail_validation {
            return Err(AssessmentServiceError::ValidationError(
                "Validation failed - mock is configured to fail validation".to_string(),
            ));
        }

        person
            .validate()
            .and_then(|_| reading.validate())
            .map_err(|e| AssessmentServiceError::ValidationError(describe_validation_errors(&e)))
    }

    fn assess(&self, person: &PersonDetails, reading: &VitalReading) -> Result<OverallAssessment, AssessmentServiceError> {
        self.validate_input(person, reading)?;
        Ok(aggregator::assess(reading))
    }

    async fn record_assessment(
        &self,
        person: &PersonDetails,
        reading: &VitalReading,
        assessment: &OverallAssessment,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        if self.should_fail_recording {
            return Err(AssessmentServiceError::RepositoryError(
                "Repository error - mock is configured to fail recording".to_string(),
            ));
        }

        let mut records = self.records.write().map_err(Self::lock_error)?;
        let now = Local::now();
        let record = AssessmentRecord {
            id: Uuid::new_v4(),
            person_id: records.len() as i64 + 1,
            person: person.clone(),
            reading: *reading,
            assessment: *assessment,
            recorded_at: now.with_timezone(&Utc),
            assessment_date: now.date_naive(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn get_all_records(&self) -> Result<Vec<AssessmentRecord>, AssessmentServiceError> {
        Ok(self.records.read().map_err(Self::lock_error)?.clone())
    }

    async fn get_record_by_id(&self, id: &str) -> Result<AssessmentRecord, AssessmentServiceError> {
        self.records
            .read()
            .map_err(Self::lock_error)?
            .iter()
            .find(|r| r.id.to_string() == id)
            .cloned()
            .ok_or_else(|| AssessmentServiceError::NotFound(format!("Assessment with ID {} not found", id)))
    }

    async fn summarize(
        &self,
        scope: SummaryScope,
        session: &SessionSummary,
    ) -> Result<SessionSummary, AssessmentServiceError> {
        if scope == SummaryScope::Session {
            return Ok(*session);
        }
        if self.should_fail_summary {
            return Err(AssessmentServiceError::RepositoryError(
                "Repository error - mock is configured to fail summaries".to_string(),
            ));
        }

        let records = self.records.read().map_err(Self::lock_error)?;
        let today = Local::now().date_naive();
        Ok(records
            .iter()
            .filter(|r| scope == SummaryScope::AllTime || r.assessment_date == today)
            .map(|r| r.assessment.overall())
            .collect())
    }
}

/// Factory function to create a mock assessment service
pub fn create_mock_service() -> MockAssessmentService {
    MockAssessmentService::new()
}
