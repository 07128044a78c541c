use std::io::{self, Cursor};

use health_risk_cli::{JsonReport, PromptReader, Session, SessionConfig, SessionError, SessionOutcome, TextReport};
use health_risk_data::database::{DatabaseConfig, DatabasePool};
use health_risk_data::repository::tests::MockAssessmentRepository;
use health_risk_data::repository::AssessmentRepository;
use health_risk_domain::entities::{OverallRisk, SummaryScope};
use health_risk_domain::services::{
    create_assessment_service, create_mock_assessment_service, AssessmentServiceTrait,
};

const LOW_RISK: &str = "Alice\n34\n70\n1.75\n120/80\n75\n";
const HIGH_RISK: &str = "Bob\n\n90\n1.60\n150/95\n110\n";
const ZERO_HEIGHT: &str = "Carol\n\n65\n0\n118/76\n70\n";

fn sqlite_repository() -> AssessmentRepository {
    let pool = DatabasePool::connect(&DatabaseConfig::in_memory()).expect("in-memory database");
    AssessmentRepository::new(pool)
}

fn reader(input: &str) -> PromptReader<Cursor<Vec<u8>>, io::Sink> {
    PromptReader::new(Cursor::new(input.as_bytes().to_vec()), io::sink())
}

async fn run_text<S>(
    service: &S,
    config: SessionConfig,
    input: &str,
) -> (Result<SessionOutcome, SessionError>, String)
where
    S: AssessmentServiceTrait + Send + Sync,
{
    let mut input = reader(input);
    let mut report = TextReport::new(Vec::new());
    let outcome = Session::new(service, config).run(&mut input, &mut report).await;
    (outcome, String::from_utf8(report.into_inner()).unwrap())
}

fn stored(scope: SummaryScope) -> SessionConfig {
    SessionConfig {
        people: None,
        persist: true,
        summary_scope: scope,
    }
}

#[tokio::test]
async fn test_full_session_against_sqlite() {
    let service = create_assessment_service(sqlite_repository());
    let input = format!("3\n{}{}{}", LOW_RISK, ZERO_HEIGHT, HIGH_RISK);

    let (outcome, output) = run_text(&service, stored(SummaryScope::Session), &input).await;
    let outcome = outcome.unwrap();

    assert_eq!(outcome.session.total(), 2);
    assert_eq!(outcome.session.count(OverallRisk::Low), 1);
    assert_eq!(outcome.session.count(OverallRisk::High), 1);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.saved, 2);

    assert!(output.contains("--- Health Report for Alice (ID: 1) ---"));
    assert!(output.contains("BMI: 22.86 kg/m\u{b2} (Normal weight, Low Risk)"));
    assert!(output.contains("Blood Pressure: 120/80 mm/hg (Normal, Low Risk)"));
    assert!(output.contains("--- Health Report for Bob (ID: 2) ---"));
    assert!(output.contains("BMI: 35.16 kg/m\u{b2} (Overweight, High Risk)"));
    assert!(output.contains("Heart Rate: 110 bpm (High, High Risk)"));
    assert!(output.contains("Overall Health Risk: High risk level"));
    assert!(output.contains("Invalid input for Person 2"));
    assert!(!output.contains("Health Report for Carol"));

    let records = service.get_all_records().await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.person.name != "Carol"));
}

#[tokio::test]
async fn test_stored_summary_spans_sessions() {
    let service = create_assessment_service(sqlite_repository());

    let (first, _) = run_text(&service, stored(SummaryScope::AllTime), &format!("1\n{}", HIGH_RISK)).await;
    assert_eq!(first.unwrap().reported.total(), 1);

    let (second, output) = run_text(&service, stored(SummaryScope::Today), &format!("1\n{}", LOW_RISK)).await;
    let second = second.unwrap();

    assert_eq!(second.session.total(), 1);
    assert_eq!(second.scope, SummaryScope::Today);
    assert_eq!(second.reported.high(), 1);
    assert_eq!(second.reported.low(), 1);
    assert!(output.contains("--- Summary Health Risk Report (Today's Assessments) ---"));
}

#[tokio::test]
async fn test_storage_failure_does_not_lose_assessment() {
    let service = create_mock_assessment_service(MockAssessmentRepository::new().with_write_failure());
    let input = format!("2\n{}{}", LOW_RISK, HIGH_RISK);

    let (outcome, output) = run_text(&service, stored(SummaryScope::Session), &input).await;
    let outcome = outcome.unwrap();

    assert_eq!(outcome.saved, 0);
    assert_eq!(outcome.session.total(), 2);
    assert_eq!(output.matches("Note: this record could not be saved.").count(), 2);
    assert!(output.contains("High risk level: 1"));
    assert!(output.contains("Low risk level: 1"));
}

#[tokio::test]
async fn test_unreadable_store_falls_back_to_session_summary() {
    let service = create_mock_assessment_service(MockAssessmentRepository::new().with_read_failure());

    let (outcome, output) = run_text(&service, stored(SummaryScope::AllTime), &format!("1\n{}", HIGH_RISK)).await;
    let outcome = outcome.unwrap();

    assert_eq!(outcome.scope, SummaryScope::Session);
    assert_eq!(outcome.reported, outcome.session);
    assert!(output.contains("--- Summary Health Risk Report (Current Session) ---"));
}

#[tokio::test]
async fn test_invalid_person_count_ends_without_summary() {
    let service = create_assessment_service(AssessmentRepository::in_memory());

    for count in ["0", "-1", "many"] {
        let (outcome, output) = run_text(&service, stored(SummaryScope::Session), &format!("{}\n", count)).await;
        assert!(matches!(outcome, Err(SessionError::Input(_))), "count {}", count);
        assert!(output.is_empty());
    }
}

#[tokio::test]
async fn test_json_report_stream() {
    let service = create_assessment_service(AssessmentRepository::in_memory());
    let config = SessionConfig {
        people: Some(2),
        persist: false,
        summary_scope: SummaryScope::Session,
    };

    let mut input = reader(&format!("{}{}", ZERO_HEIGHT, LOW_RISK));
    let mut report = JsonReport::new(Vec::new());
    Session::new(&service, config).run(&mut input, &mut report).await.unwrap();

    let output = String::from_utf8(report.into_inner()).unwrap();
    let events: Vec<serde_json::Value> = output.lines().map(|l| serde_json::from_str(l).unwrap()).collect();

    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["type"], "skipped");
    assert_eq!(events[1]["type"], "person");
    assert_eq!(events[1]["storage"]["status"], "disabled");
    assert_eq!(events[1]["assessment"]["overall"], "Low");
    assert_eq!(events[2]["type"], "summary");
    assert_eq!(events[2]["scope"], "session");
    assert_eq!(events[2]["low"], 1);
}
