use serde::{Deserialize, Serialize};

/// Storage model for one person's health assessment
///
/// Categories and risk levels are stored as their display strings; the domain
/// layer owns the mapping back to typed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    /// Unique identifier for the assessment
    pub id: String,

    /// Row id of the assessed individual
    pub person_id: i64,

    /// Name of the assessed individual
    pub name: String,

    /// Optional age in years
    pub age: Option<u8>,

    /// Local calendar date of the assessment (YYYY-MM-DD)
    pub assessment_date: String,

    /// When the assessment was recorded (RFC 3339, UTC)
    pub recorded_at: String,

    /// Body weight in kilograms
    pub weight_kg: f64,

    /// Height in meters
    pub height_m: f64,

    /// Systolic blood pressure (the higher number)
    pub systolic_bp: u16,

    /// Diastolic blood pressure (the lower number)
    pub diastolic_bp: u16,

    /// Resting heart rate in beats per minute
    pub heart_rate_bpm: u16,

    /// Body mass index derived from weight and height
    pub bmi: f64,

    pub bmi_category: String,
    pub bp_category: String,
    pub hr_category: String,
    pub bmi_risk: String,
    pub bp_risk: String,
    pub hr_risk: String,

    /// Overall risk level (Low, Medium or High)
    pub overall_risk: String,
}

/// Input data for persisting a new assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAssessmentRequest {
    pub name: String,
    pub age: Option<u8>,
    pub assessment_date: String,
    pub recorded_at: String,
    pub weight_kg: f64,
    pub height_m: f64,
    pub systolic_bp: u16,
    pub diastolic_bp: u16,
    pub heart_rate_bpm: u16,
    pub bmi: f64,
    pub bmi_category: String,
    pub bp_category: String,
    pub hr_category: String,
    pub bmi_risk: String,
    pub bp_risk: String,
    pub hr_risk: String,
    pub overall_risk: String,
}

impl CreateAssessmentRequest {
    /// Attach the identifiers assigned by storage
    pub fn into_record(self, id: String, person_id: i64) -> AssessmentRecord {
        AssessmentRecord {
            id,
            person_id,
            name: self.name,
            age: self.age,
            assessment_date: self.assessment_date,
            recorded_at: self.recorded_at,
            weight_kg: self.weight_kg,
            height_m: self.height_m,
            systolic_bp: self.systolic_bp,
            diastolic_bp: self.diastolic_bp,
            heart_rate_bpm: self.heart_rate_bpm,
            bmi: self.bmi,
            bmi_category: self.bmi_category,
            bp_category: self.bp_category,
            hr_category: self.hr_category,
            bmi_risk: self.bmi_risk,
            bp_risk: self.bp_risk,
            hr_risk: self.hr_risk,
            overall_risk: self.overall_risk,
        }
    }
}

/// Number of persisted assessments per overall risk level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCounts {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl RiskCounts {
    /// Add `count` assessments stored under the given overall risk label.
    /// Unknown labels are reported back to the caller.
    pub fn add(&mut self, overall_risk: &str, count: u64) -> Result<(), String> {
        match overall_risk {
            "High" => self.high += count,
            "Medium" => self.medium += count,
            "Low" => self.low += count,
            other => return Err(format!("invalid overall risk label: {}", other)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_counts_add() {
        let mut counts = RiskCounts::default();
        counts.add("High", 2).unwrap();
        counts.add("Low", 1).unwrap();
        counts.add("Low", 3).unwrap();

        assert_eq!(counts, RiskCounts { high: 2, medium: 0, low: 4 });
        assert!(counts.add("Severe", 1).is_err());
    }
}
