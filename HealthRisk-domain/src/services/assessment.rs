use async_trait::async_trait;
use chrono::Local;
use thiserror::Error;
use tracing::{debug, warn};
use validator::Validate;

use crate::entities::assessment::{AssessmentRecord, OverallAssessment, SessionSummary, SummaryScope};
use crate::entities::conversions;
use crate::entities::vitals::{describe_validation_errors, PersonDetails, VitalReading};
use crate::services::aggregator;
use health_risk_data::repository::{AssessmentRepository, AssessmentRepositoryTrait, RepositoryError};

/// Assessment service errors
#[derive(Debug, Error)]
pub enum AssessmentServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Not found error
    #[error("Assessment not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// Stored record could not be mapped back to domain types
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

/// Trait for assessment service operations
#[async_trait]
pub trait AssessmentServiceTrait {
    /// Validate a person's details and vital signs
    fn validate_input(&self, person: &PersonDetails, reading: &VitalReading) -> Result<(), AssessmentServiceError>;

    /// Validate, then classify and aggregate one person's vital signs.
    /// Nothing is classified when validation fails.
    fn assess(&self, person: &PersonDetails, reading: &VitalReading) -> Result<OverallAssessment, AssessmentServiceError>;

    /// Persist an assessment
    async fn record_assessment(
        &self,
        person: &PersonDetails,
        reading: &VitalReading,
        assessment: &OverallAssessment,
    ) -> Result<AssessmentRecord, AssessmentServiceError>;

    /// Get all persisted assessments
    async fn get_all_records(&self) -> Result<Vec<AssessmentRecord>, AssessmentServiceError>;

    /// Get a persisted assessment by ID
    async fn get_record_by_id(&self, id: &str) -> Result<AssessmentRecord, AssessmentServiceError>;

    /// Produce the summary for the requested scope.
    /// `session` is returned unchanged for [`SummaryScope::Session`].
    async fn summarize(
        &self,
        scope: SummaryScope,
        session: &SessionSummary,
    ) -> Result<SessionSummary, AssessmentServiceError>;
}

/// Assessment service for domain logic
pub struct AssessmentService<R: AssessmentRepositoryTrait> {
    repository: R,
}

impl<R: AssessmentRepositoryTrait> AssessmentService<R> {
    /// Create a new assessment service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Access the underlying repository
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> AssessmentServiceError {
        match err {
            RepositoryError::NotFound(msg) => AssessmentServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => AssessmentServiceError::ValidationError(msg),
            RepositoryError::CorruptRecord(msg) => AssessmentServiceError::CorruptRecord(msg),
            _ => AssessmentServiceError::RepositoryError(err.to_string()),
        }
    }
}

#[async_trait]
impl<R: AssessmentRepositoryTrait + Send + Sync> AssessmentServiceTrait for AssessmentService<R> {
    fn validate_input(&self, person: &PersonDetails, reading: &VitalReading) -> Result<(), AssessmentServiceError> {
        person
            .validate()
            .map_err(|e| AssessmentServiceError::ValidationError(describe_validation_errors(&e)))?;

        reading
            .validate()
            .map_err(|e| AssessmentServiceError::ValidationError(describe_validation_errors(&e)))?;

        Ok(())
    }

    fn assess(&self, person: &PersonDetails, reading: &VitalReading) -> Result<OverallAssessment, AssessmentServiceError> {
        self.validate_input(person, reading)?;

        let assessment = aggregator::assess(reading);
        debug!(
            "Assessed {}: bmi={:.2}, overall={}",
            person.name,
            assessment.bmi(),
            assessment.overall()
        );

        Ok(assessment)
    }

    async fn record_assessment(
        &self,
        person: &PersonDetails,
        reading: &VitalReading,
        assessment: &OverallAssessment,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let data_request = conversions::convert_to_data_create_request(person, reading, assessment, Local::now());

        let data_record = self
            .repository
            .create(data_request)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        conversions::convert_to_domain_record(data_record).map_err(AssessmentServiceError::CorruptRecord)
    }

    async fn get_all_records(&self) -> Result<Vec<AssessmentRecord>, AssessmentServiceError> {
        let data_records = self.repository.get_all().await.map_err(|e| self.map_repo_error(e))?;

        data_records
            .into_iter()
            .map(|r| conversions::convert_to_domain_record(r).map_err(AssessmentServiceError::CorruptRecord))
            .collect()
    }

    async fn get_record_by_id(&self, id: &str) -> Result<AssessmentRecord, AssessmentServiceError> {
        let id_uuid = conversions::parse_string_to_uuid(id).map_err(AssessmentServiceError::ValidationError)?;

        let data_record = self
            .repository
            .get_by_id(id_uuid)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| AssessmentServiceError::NotFound(format!("Assessment with ID {} not found", id)))?;

        conversions::convert_to_domain_record(data_record).map_err(AssessmentServiceError::CorruptRecord)
    }

    async fn summarize(
        &self,
        scope: SummaryScope,
        session: &SessionSummary,
    ) -> Result<SessionSummary, AssessmentServiceError> {
        let on_date = match scope {
            SummaryScope::Session => return Ok(*session),
            SummaryScope::Today => Some(Local::now().date_naive()),
            SummaryScope::AllTime => None,
        };

        let counts = self
            .repository
            .count_by_overall_risk(on_date)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        let summary = SessionSummary::from(counts);
        if summary.total() < session.total() {
            warn!(
                "Persisted {} summary has {} records but this session processed {}",
                scope,
                summary.total(),
                session.total()
            );
        }

        Ok(summary)
    }
}

/// Create an assessment service backed by the given repository
pub fn create_assessment_service(repository: AssessmentRepository) -> impl AssessmentServiceTrait + Send + Sync {
    AssessmentService::new(repository)
}

/// Create an assessment service backed by the mock repository
#[cfg(feature = "mock")]
pub fn create_mock_assessment_service(
    repository: health_risk_data::repository::tests::MockAssessmentRepository,
) -> AssessmentService<health_risk_data::repository::tests::MockAssessmentRepository> {
    AssessmentService::new(repository)
}
