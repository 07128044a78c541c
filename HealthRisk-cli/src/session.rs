//! Session orchestration: read, classify, persist, report, tally.

use std::io::{self, BufRead, Write};

use health_risk_domain::entities::{SessionSummary, SummaryScope};
use health_risk_domain::services::AssessmentServiceTrait;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::input::{InputError, PromptReader};
use crate::report::{PersonReport, ReportSink, StorageOutcome};

/// Settings for one interactive run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Person count given up front; prompted for when `None`
    pub people: Option<u32>,
    /// Whether assessments are handed to storage
    pub persist: bool,
    pub summary_scope: SummaryScope,
}

/// Errors that end a session without a summary
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Failed to write report: {0}")]
    Report(#[from] io::Error),
}

/// Result of a completed session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Tally of the people assessed in this run
    pub session: SessionSummary,
    /// Summary that was rendered, which may cover stored records
    pub reported: SessionSummary,
    /// Scope the rendered summary actually covers
    pub scope: SummaryScope,
    pub skipped: u32,
    pub saved: u32,
    /// Whether input ended before every person was entered
    pub truncated: bool,
}

/// Drives one interactive run against an assessment service
pub struct Session<'a, S> {
    service: &'a S,
    config: SessionConfig,
}

impl<'a, S> Session<'a, S>
where
    S: AssessmentServiceTrait + Send + Sync,
{
    pub fn new(service: &'a S, config: SessionConfig) -> Self {
        Self { service, config }
    }

    /// Run the session to completion.
    ///
    /// Problems with a single person skip that person. An invalid person
    /// count or a failing output stream ends the run with an error and no
    /// summary. Input that ends early stops the loop but still renders the
    /// summary.
    pub async fn run<R, W, K>(
        &self,
        input: &mut PromptReader<R, W>,
        report: &mut K,
    ) -> Result<SessionOutcome, SessionError>
    where
        R: BufRead,
        W: Write,
        K: ReportSink + ?Sized,
    {
        let count = match self.config.people {
            Some(0) => return Err(InputError::InvalidPersonCount("0".to_string()).into()),
            Some(count) => count,
            None => input.read_person_count()?,
        };
        info!("Starting session for {} people", count);

        let mut session = SessionSummary::new();
        let mut skipped = 0;
        let mut saved = 0;
        let mut truncated = false;

        for index in 1..=count {
            let entry = match input.read_person(index) {
                Ok(entry) => entry,
                Err(InputError::EndOfInput) => {
                    warn!("Input ended after {} of {} people", index - 1, count);
                    truncated = true;
                    break;
                }
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    warn!("Skipping person {}: {}", index, e);
                    report.skipped(index, &e.to_string())?;
                    skipped += 1;
                    continue;
                }
            };

            let assessment = match self.service.assess(&entry.person, &entry.reading) {
                Ok(assessment) => assessment,
                Err(e) => {
                    warn!("Skipping person {}: {}", index, e);
                    report.skipped(index, &e.to_string())?;
                    skipped += 1;
                    continue;
                }
            };

            let storage = if self.config.persist {
                match self
                    .service
                    .record_assessment(&entry.person, &entry.reading, &assessment)
                    .await
                {
                    Ok(record) => {
                        saved += 1;
                        StorageOutcome::Saved {
                            person_id: record.person_id,
                            record_id: record.id,
                        }
                    }
                    Err(e) => {
                        error!("Failed to save assessment for {}: {}", entry.person.name, e);
                        StorageOutcome::Failed
                    }
                }
            } else {
                StorageOutcome::Disabled
            };

            report.person_report(&PersonReport {
                index,
                person: &entry.person,
                reading: &entry.reading,
                assessment: &assessment,
                storage,
            })?;
            session.record(assessment.overall());
            debug!("Person {} assessed as {}", index, assessment.overall());
        }

        let (scope, reported) = self.summarize(&session).await;
        report.summary(scope, &reported)?;

        Ok(SessionOutcome {
            session,
            reported,
            scope,
            skipped,
            saved,
            truncated,
        })
    }

    async fn summarize(&self, session: &SessionSummary) -> (SummaryScope, SessionSummary) {
        let scope = self.config.summary_scope;
        if !scope.is_persisted() {
            return (scope, *session);
        }
        if !self.config.persist {
            warn!("Storage is disabled; summarizing the current session instead of '{}'", scope);
            return (SummaryScope::Session, *session);
        }

        match self.service.summarize(scope, session).await {
            Ok(summary) => (scope, summary),
            Err(e) => {
                warn!("Failed to load '{}' summary, using the current session: {}", scope, e);
                (SummaryScope::Session, *session)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TextReport;
    use health_risk_domain::entities::OverallRisk;
    use health_risk_domain::testing::{create_mock_service, high_risk_reading, low_risk_reading, MockAssessmentService};
    use std::io::Cursor;

    const LOW_RISK: &str = "Alice\n\n70\n1.75\n120/80\n75\n";
    const HIGH_RISK: &str = "Bob\n52\n90\n1.60\n150/95\n110\n";

    async fn run_session(
        service: &MockAssessmentService,
        config: SessionConfig,
        input: &str,
    ) -> (Result<SessionOutcome, SessionError>, String) {
        let mut reader = PromptReader::new(Cursor::new(input.as_bytes().to_vec()), io::sink());
        let mut report = TextReport::new(Vec::new());
        let outcome = Session::new(service, config).run(&mut reader, &mut report).await;
        (outcome, String::from_utf8(report.into_inner()).unwrap())
    }

    fn persisting() -> SessionConfig {
        SessionConfig {
            persist: true,
            ..SessionConfig::default()
        }
    }

    #[tokio::test]
    async fn test_session_reports_and_tallies() {
        let service = MockAssessmentService::new();
        let input = format!("2\n{}{}", LOW_RISK, HIGH_RISK);

        let (outcome, output) = run_session(&service, persisting(), &input).await;
        let outcome = outcome.unwrap();

        assert_eq!(outcome.session.low(), 1);
        assert_eq!(outcome.session.high(), 1);
        assert_eq!(outcome.saved, 2);
        assert_eq!(service.recorded_count(), 2);
        assert!(output.contains("--- Health Report for Alice (ID: 1) ---"));
        assert!(output.contains("--- Health Report for Bob (ID: 2) ---"));
        assert!(output.contains("High risk level: 1"));
        assert!(output.contains("Low risk level: 1"));
    }

    #[tokio::test]
    async fn test_recorded_readings_match_entered_values() {
        let service = create_mock_service();
        let input = format!("2\n{}{}", LOW_RISK, HIGH_RISK);

        run_session(&service, persisting(), &input).await.0.unwrap();

        let records = service.get_all_records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].reading, low_risk_reading());
        assert_eq!(records[0].assessment.overall(), OverallRisk::Low);
        assert_eq!(records[1].reading, high_risk_reading());
        assert_eq!(records[1].assessment.overall(), OverallRisk::High);
    }

    #[tokio::test]
    async fn test_rejected_input_leaves_tally_untouched() {
        let service = MockAssessmentService::new().with_validation_failure();
        let input = format!("2\n{}{}", LOW_RISK, HIGH_RISK);

        let (outcome, output) = run_session(&service, persisting(), &input).await;
        let outcome = outcome.unwrap();

        assert_eq!(outcome.skipped, 2);
        assert_eq!(outcome.session, SessionSummary::new());
        assert_eq!(service.recorded_count(), 0);
        assert!(!output.contains("Health Report for"));
        assert!(output.contains("Low risk level: 0"));
    }

    #[tokio::test]
    async fn test_invalid_person_is_skipped() {
        let service = MockAssessmentService::new();
        let input = format!("2\nZero\n\n70\n0\n120/80\n75\n{}", LOW_RISK);

        let (outcome, output) = run_session(&service, persisting(), &input).await;
        let outcome = outcome.unwrap();

        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.session.total(), 1);
        assert_eq!(service.recorded_count(), 1);
        assert!(output.contains("Invalid input for Person 1"));
    }

    #[tokio::test]
    async fn test_storage_failure_still_counts() {
        let service = MockAssessmentService::new().with_recording_failure();
        let input = format!("1\n{}", HIGH_RISK);

        let (outcome, output) = run_session(&service, persisting(), &input).await;
        let outcome = outcome.unwrap();

        assert_eq!(outcome.saved, 0);
        assert_eq!(outcome.session.count(OverallRisk::High), 1);
        assert!(output.contains("Note: this record could not be saved."));
    }

    #[tokio::test]
    async fn test_invalid_count_is_fatal() {
        let service = MockAssessmentService::new();

        let (outcome, output) = run_session(&service, persisting(), "0\n").await;
        assert!(matches!(outcome, Err(SessionError::Input(InputError::InvalidPersonCount(_)))));
        assert!(!output.contains("Summary"));

        let config = SessionConfig {
            people: Some(0),
            ..persisting()
        };
        let (outcome, _) = run_session(&service, config, "").await;
        assert!(outcome.is_err());
    }

    #[tokio::test]
    async fn test_early_end_of_input_still_summarizes() {
        let service = MockAssessmentService::new();
        let input = format!("3\n{}Carol\n", LOW_RISK);

        let (outcome, output) = run_session(&service, persisting(), &input).await;
        let outcome = outcome.unwrap();

        assert!(outcome.truncated);
        assert_eq!(outcome.session.total(), 1);
        assert!(output.contains("--- Summary Health Risk Report (Current Session) ---"));
    }

    #[tokio::test]
    async fn test_persisted_scope_falls_back_to_session() {
        let service = MockAssessmentService::new().with_summary_failure();
        let config = SessionConfig {
            summary_scope: SummaryScope::AllTime,
            ..persisting()
        };

        let (outcome, _) = run_session(&service, config, &format!("1\n{}", LOW_RISK)).await;
        let outcome = outcome.unwrap();
        assert_eq!(outcome.scope, SummaryScope::Session);
        assert_eq!(outcome.reported, outcome.session);

        let service = MockAssessmentService::new();
        let config = SessionConfig {
            summary_scope: SummaryScope::Today,
            persist: false,
            people: None,
        };
        let (outcome, _) = run_session(&service, config, &format!("1\n{}", LOW_RISK)).await;
        let outcome = outcome.unwrap();
        assert_eq!(outcome.scope, SummaryScope::Session);
        assert_eq!(service.recorded_count(), 0);
    }

    #[tokio::test]
    async fn test_persisted_scope_reads_storage() {
        let service = MockAssessmentService::new();
        let config = SessionConfig {
            summary_scope: SummaryScope::Today,
            ..persisting()
        };

        run_session(&service, config, &format!("1\n{}", HIGH_RISK))
            .await
            .0
            .unwrap();
        let (outcome, output) = run_session(&service, config, &format!("1\n{}", LOW_RISK)).await;
        let outcome = outcome.unwrap();

        assert_eq!(outcome.session.total(), 1);
        assert_eq!(outcome.reported.total(), 2);
        assert!(output.contains("--- Summary Health Risk Report (Today's Assessments) ---"));
    }
}
