use chrono::{DateTime, Local, NaiveDate, Utc};
use uuid::Uuid;

use crate::entities::assessment::{AssessmentRecord, OverallAssessment};
use crate::entities::risk::{
    BloodPressureCategory, BmiCategory, HeartRateCategory, MetricClassification, OverallRisk, RiskTier,
};
use crate::entities::vitals::{PersonDetails, VitalReading};
use health_risk_data::models::assessment as data;

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Helper function to safely parse a string ID to UUID
pub fn parse_string_to_uuid(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id).map_err(|_| format!("Invalid UUID format: {}", id))
}

/// Convert an assessed person into the data model for a create request
pub fn convert_to_data_create_request(
    person: &PersonDetails,
    reading: &VitalReading,
    assessment: &OverallAssessment,
    recorded_at: DateTime<Local>,
) -> data::CreateAssessmentRequest {
    let bmi = assessment.bmi_classification();
    let bp = assessment.blood_pressure();
    let hr = assessment.heart_rate();

    data::CreateAssessmentRequest {
        name: person.name.clone(),
        age: person.age,
        assessment_date: recorded_at.date_naive().to_string(),
        recorded_at: recorded_at.with_timezone(&Utc).to_rfc3339(),
        weight_kg: reading.weight_kg,
        height_m: reading.height_m,
        systolic_bp: reading.systolic,
        diastolic_bp: reading.diastolic,
        heart_rate_bpm: reading.heart_rate,
        bmi: assessment.bmi(),
        bmi_category: bmi.category.to_string(),
        bp_category: bp.category.to_string(),
        hr_category: hr.category.to_string(),
        bmi_risk: bmi.risk.to_string(),
        bp_risk: bp.risk.to_string(),
        hr_risk: hr.risk.to_string(),
        overall_risk: assessment.overall().to_string(),
    }
}

/// Convert from data model to domain entity for an assessment record.
///
/// Fails on any label or timestamp the domain does not recognise; a stored
/// record is never given a default category.
pub fn convert_to_domain_record(record: data::AssessmentRecord) -> Result<AssessmentRecord, String> {
    let id = parse_string_to_uuid(&record.id)?;

    let recorded_at = DateTime::parse_from_rfc3339(&record.recorded_at)
        .map_err(|e| format!("Invalid recorded_at '{}': {}", record.recorded_at, e))?
        .with_timezone(&Utc);

    let assessment_date = NaiveDate::parse_from_str(&record.assessment_date, "%Y-%m-%d")
        .map_err(|e| format!("Invalid assessment_date '{}': {}", record.assessment_date, e))?;

    let assessment = OverallAssessment::new(
        record.bmi,
        MetricClassification::new(
            record.bmi_category.parse::<BmiCategory>()?,
            record.bmi_risk.parse::<RiskTier>()?,
        ),
        MetricClassification::new(
            record.bp_category.parse::<BloodPressureCategory>()?,
            record.bp_risk.parse::<RiskTier>()?,
        ),
        MetricClassification::new(
            record.hr_category.parse::<HeartRateCategory>()?,
            record.hr_risk.parse::<RiskTier>()?,
        ),
        record.overall_risk.parse::<OverallRisk>()?,
    );

    Ok(AssessmentRecord {
        id,
        person_id: record.person_id,
        person: PersonDetails {
            name: record.name,
            age: record.age,
        },
        reading: VitalReading::new(
            record.weight_kg,
            record.height_m,
            record.systolic_bp,
            record.diastolic_bp,
            record.heart_rate_bpm,
        ),
        assessment,
        recorded_at,
        assessment_date,
    })
}
