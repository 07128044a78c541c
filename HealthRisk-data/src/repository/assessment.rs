use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, error};
use uuid::Uuid;

use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;
use crate::database::DatabasePool;
use crate::models::assessment::{AssessmentRecord, CreateAssessmentRequest, RiskCounts};

/// Repository trait for health assessments
#[async_trait]
pub trait AssessmentRepositoryTrait {
    /// Persist a new assessment together with its individual
    async fn create(&self, request: CreateAssessmentRequest) -> Result<AssessmentRecord, RepositoryError>;

    /// Get all assessments, most recent first
    async fn get_all(&self) -> Result<Vec<AssessmentRecord>, RepositoryError>;

    /// Get an assessment by ID
    async fn get_by_id(&self, id: Uuid) -> Result<Option<AssessmentRecord>, RepositoryError>;

    /// Count assessments per overall risk level.
    /// `on_date` restricts the count to one assessment date.
    async fn count_by_overall_risk(&self, on_date: Option<NaiveDate>) -> Result<RiskCounts, RepositoryError>;
}

#[derive(Debug, Clone)]
enum Backend {
    Database(DatabasePool),
    Memory(InMemoryStorage),
}

/// Repository for health assessments backed by SQLite or process memory
#[derive(Debug, Clone)]
pub struct AssessmentRepository {
    backend: Backend,
}

impl AssessmentRepository {
    /// Create a repository that writes to the given database
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            backend: Backend::Database(pool),
        }
    }

    /// Create a repository that keeps records for the life of the process only
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(InMemoryStorage::new()),
        }
    }
}

impl Default for AssessmentRepository {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[async_trait]
impl AssessmentRepositoryTrait for AssessmentRepository {
    async fn create(&self, request: CreateAssessmentRequest) -> Result<AssessmentRecord, RepositoryError> {
        let id = Uuid::new_v4().to_string();

        match &self.backend {
            Backend::Database(pool) => {
                debug!("Storing assessment in database: {}", id);
                DatabaseStorage::store_assessment(pool, id, request)
                    .await
                    .map_err(|e| {
                        error!("Failed to store assessment in database: {}", e);
                        e
                    })
            }
            Backend::Memory(storage) => {
                debug!("Storing assessment in memory: {}", id);
                storage.store_assessment(id, request).await
            }
        }
    }

    async fn get_all(&self) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        match &self.backend {
            Backend::Database(pool) => DatabaseStorage::get_all(pool).await,
            Backend::Memory(storage) => storage.get_all().await,
        }
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let id = id.to_string();
        match &self.backend {
            Backend::Database(pool) => DatabaseStorage::get_by_id(pool, &id).await,
            Backend::Memory(storage) => storage.get_by_id(&id).await,
        }
    }

    async fn count_by_overall_risk(&self, on_date: Option<NaiveDate>) -> Result<RiskCounts, RepositoryError> {
        match &self.backend {
            Backend::Database(pool) => DatabaseStorage::count_by_overall_risk(pool, on_date).await,
            Backend::Memory(storage) => storage.count_by_overall_risk(on_date).await,
        }
    }
}

/// Mock assessment repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock implementation of AssessmentRepositoryTrait for testing
    #[derive(Default)]
    pub struct MockAssessmentRepository {
        records: Mutex<Vec<AssessmentRecord>>,
        fail_writes: bool,
        fail_reads: bool,
    }

    impl MockAssessmentRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository with predefined records
        pub fn with_records(records: Vec<AssessmentRecord>) -> Self {
            Self {
                records: Mutex::new(records),
                ..Self::default()
            }
        }

        /// Configure the mock to reject every write
        pub fn with_write_failure(mut self) -> Self {
            self.fail_writes = true;
            self
        }

        /// Configure the mock to reject every read
        pub fn with_read_failure(mut self) -> Self {
            self.fail_reads = true;
            self
        }

        /// Number of records accepted so far
        pub fn stored_count(&self) -> usize {
            self.records.lock().map(|r| r.len()).unwrap_or(0)
        }
    }

    #[async_trait]
    impl AssessmentRepositoryTrait for MockAssessmentRepository {
        async fn create(&self, request: CreateAssessmentRequest) -> Result<AssessmentRecord, RepositoryError> {
            if self.fail_writes {
                return Err(RepositoryError::Unavailable("mock is configured to fail writes".to_string()));
            }

            let mut records = self.records.lock()?;
            let person_id = records.len() as i64 + 1;
            let record = request.into_record(Uuid::new_v4().to_string(), person_id);
            records.push(record.clone());
            Ok(record)
        }

        async fn get_all(&self) -> Result<Vec<AssessmentRecord>, RepositoryError> {
            if self.fail_reads {
                return Err(RepositoryError::Unavailable("mock is configured to fail reads".to_string()));
            }
            Ok(self.records.lock()?.clone())
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Option<AssessmentRecord>, RepositoryError> {
            if self.fail_reads {
                return Err(RepositoryError::Unavailable("mock is configured to fail reads".to_string()));
            }
            let id = id.to_string();
            Ok(self.records.lock()?.iter().find(|r| r.id == id).cloned())
        }

        async fn count_by_overall_risk(&self, on_date: Option<NaiveDate>) -> Result<RiskCounts, RepositoryError> {
            if self.fail_reads {
                return Err(RepositoryError::Unavailable("mock is configured to fail reads".to_string()));
            }

            let date = on_date.map(|d| d.to_string());
            let mut counts = RiskCounts::default();
            for record in self.records.lock()?.iter() {
                if date.as_deref().map_or(true, |d| record.assessment_date == d) {
                    counts.add(&record.overall_risk, 1).map_err(RepositoryError::CorruptRecord)?;
                }
            }
            Ok(counts)
        }
    }

    pub fn sample_request(name: &str, date: &str, overall_risk: &str) -> CreateAssessmentRequest {
        CreateAssessmentRequest {
            name: name.to_string(),
            age: Some(42),
            assessment_date: date.to_string(),
            recorded_at: format!("{}T09:30:00+00:00", date),
            weight_kg: 70.0,
            height_m: 1.75,
            systolic_bp: 120,
            diastolic_bp: 80,
            heart_rate_bpm: 75,
            bmi: 22.857,
            bmi_category: "Normal weight".to_string(),
            bp_category: "Normal".to_string(),
            hr_category: "Normal".to_string(),
            bmi_risk: "Low".to_string(),
            bp_risk: "Low".to_string(),
            hr_risk: "Low".to_string(),
            overall_risk: overall_risk.to_string(),
        }
    }

    #[cfg(test)]
    mod repository_tests {
        use super::*;
        use crate::database::{DatabaseConfig, DatabasePool};

        fn sqlite_repository() -> AssessmentRepository {
            let pool = DatabasePool::connect(&DatabaseConfig::in_memory()).unwrap();
            AssessmentRepository::new(pool)
        }

        fn date(s: &str) -> NaiveDate {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
        }

        #[tokio::test]
        async fn test_sqlite_create_and_get_by_id() {
            let repo = sqlite_repository();

            let first = repo.create(sample_request("Ada", "2026-10-16", "Low")).await.unwrap();
            let second = repo.create(sample_request("Grace", "2026-10-16", "High")).await.unwrap();
            assert_eq!(first.person_id, 1);
            assert_eq!(second.person_id, 2);

            let id = Uuid::parse_str(&second.id).unwrap();
            let fetched = repo.get_by_id(id).await.unwrap().unwrap();
            assert_eq!(fetched, second);

            assert!(repo.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
            assert_eq!(repo.get_all().await.unwrap().len(), 2);
        }

        #[tokio::test]
        async fn test_sqlite_count_by_overall_risk() {
            let repo = sqlite_repository();
            repo.create(sample_request("A", "2026-10-15", "High")).await.unwrap();
            repo.create(sample_request("B", "2026-10-16", "High")).await.unwrap();
            repo.create(sample_request("C", "2026-10-16", "Medium")).await.unwrap();
            repo.create(sample_request("D", "2026-10-16", "Low")).await.unwrap();

            let all = repo.count_by_overall_risk(None).await.unwrap();
            assert_eq!(all, RiskCounts { high: 2, medium: 1, low: 1 });

            let today = repo.count_by_overall_risk(Some(date("2026-10-16"))).await.unwrap();
            assert_eq!(today, RiskCounts { high: 1, medium: 1, low: 1 });

            let empty = repo.count_by_overall_risk(Some(date("2020-01-01"))).await.unwrap();
            assert_eq!(empty, RiskCounts::default());
        }

        #[tokio::test]
        async fn test_in_memory_repository_matches_sqlite_semantics() {
            let repo = AssessmentRepository::in_memory();
            repo.create(sample_request("A", "2026-10-15", "Medium")).await.unwrap();
            let latest = repo.create(sample_request("B", "2026-10-16", "Low")).await.unwrap();

            let all = repo.get_all().await.unwrap();
            assert_eq!(all.first().map(|r| r.id.clone()), Some(latest.id));

            let today = repo.count_by_overall_risk(Some(date("2026-10-16"))).await.unwrap();
            assert_eq!(today, RiskCounts { high: 0, medium: 0, low: 1 });
        }

        #[tokio::test]
        async fn test_mock_write_failure() {
            let repo = MockAssessmentRepository::new().with_write_failure();
            let result = repo.create(sample_request("A", "2026-10-16", "Low")).await;
            assert!(matches!(result, Err(RepositoryError::Unavailable(_))));
            assert_eq!(repo.stored_count(), 0);
        }
    }
}
