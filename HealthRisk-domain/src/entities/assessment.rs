use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::risk::{
    BloodPressureCategory, BmiCategory, HeartRateCategory, MetricClassification, OverallRisk, RiskTier,
};
use super::vitals::{PersonDetails, VitalReading};
use health_risk_data::models::RiskCounts;

/// Classification of all three vital signs plus the combined verdict
///
/// Only produced by the aggregator (or rebuilt from storage), never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallAssessment {
    bmi: f64,
    bmi_class: MetricClassification<BmiCategory>,
    blood_pressure: MetricClassification<BloodPressureCategory>,
    heart_rate: MetricClassification<HeartRateCategory>,
    overall: OverallRisk,
}

impl OverallAssessment {
    pub(crate) fn new(
        bmi: f64,
        bmi_class: MetricClassification<BmiCategory>,
        blood_pressure: MetricClassification<BloodPressureCategory>,
        heart_rate: MetricClassification<HeartRateCategory>,
        overall: OverallRisk,
    ) -> Self {
        Self {
            bmi,
            bmi_class,
            blood_pressure,
            heart_rate,
            overall,
        }
    }

    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn bmi_classification(&self) -> MetricClassification<BmiCategory> {
        self.bmi_class
    }

    pub fn blood_pressure(&self) -> MetricClassification<BloodPressureCategory> {
        self.blood_pressure
    }

    pub fn heart_rate(&self) -> MetricClassification<HeartRateCategory> {
        self.heart_rate
    }

    pub fn overall(&self) -> OverallRisk {
        self.overall
    }

    /// Per-metric risk tiers in BMI, blood pressure, heart rate order
    pub fn risk_tiers(&self) -> [RiskTier; 3] {
        [self.bmi_class.risk, self.blood_pressure.risk, self.heart_rate.risk]
    }
}

/// Running tally of overall risk levels
///
/// Counters only ever grow; each processed person increments exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    high: u64,
    medium: u64,
    low: u64,
}

impl SessionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one overall risk into the tally
    pub fn record(&mut self, risk: OverallRisk) {
        match risk {
            OverallRisk::High => self.high += 1,
            OverallRisk::Medium => self.medium += 1,
            OverallRisk::Low => self.low += 1,
        }
    }

    /// Consuming variant of [`SessionSummary::record`]
    pub fn with(mut self, risk: OverallRisk) -> Self {
        self.record(risk);
        self
    }

    pub fn high(&self) -> u64 {
        self.high
    }

    pub fn medium(&self) -> u64 {
        self.medium
    }

    pub fn low(&self) -> u64 {
        self.low
    }

    pub fn count(&self, risk: OverallRisk) -> u64 {
        match risk {
            OverallRisk::High => self.high,
            OverallRisk::Medium => self.medium,
            OverallRisk::Low => self.low,
        }
    }

    pub fn total(&self) -> u64 {
        self.high + self.medium + self.low
    }
}

impl From<RiskCounts> for SessionSummary {
    fn from(counts: RiskCounts) -> Self {
        Self {
            high: counts.high,
            medium: counts.medium,
            low: counts.low,
        }
    }
}

impl FromIterator<OverallRisk> for SessionSummary {
    fn from_iter<I: IntoIterator<Item = OverallRisk>>(iter: I) -> Self {
        iter.into_iter().fold(SessionSummary::new(), SessionSummary::with)
    }
}

/// Which records the end-of-run summary covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryScope {
    /// People processed in the current run only
    #[default]
    Session,
    /// Persisted assessments dated today
    Today,
    /// Every persisted assessment
    AllTime,
}

impl SummaryScope {
    /// Whether the summary is read back from storage
    pub fn is_persisted(self) -> bool {
        !matches!(self, SummaryScope::Session)
    }

    /// Heading suffix used by reports
    pub fn title(self) -> &'static str {
        match self {
            SummaryScope::Session => "Current Session",
            SummaryScope::Today => "Today's Assessments",
            SummaryScope::AllTime => "All Assessments",
        }
    }
}

impl fmt::Display for SummaryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SummaryScope::Session => "session",
            SummaryScope::Today => "today",
            SummaryScope::AllTime => "all",
        })
    }
}

/// A persisted assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub person_id: i64,
    pub person: PersonDetails,
    pub reading: VitalReading,
    pub assessment: OverallAssessment,
    pub recorded_at: DateTime<Utc>,
    pub assessment_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_every_record_once() {
        let risks = [
            OverallRisk::Low,
            OverallRisk::High,
            OverallRisk::Medium,
            OverallRisk::Low,
            OverallRisk::High,
            OverallRisk::Low,
        ];

        let mut summary = SessionSummary::new();
        for (k, risk) in risks.iter().enumerate() {
            summary.record(*risk);
            assert_eq!(summary.total(), k as u64 + 1);
        }

        assert_eq!(summary.low(), 3);
        assert_eq!(summary.medium(), 1);
        assert_eq!(summary.high(), 2);
        assert_eq!(summary, risks.into_iter().collect::<SessionSummary>());
    }

    #[test]
    fn test_summary_from_counts() {
        let summary = SessionSummary::from(RiskCounts { high: 4, medium: 2, low: 7 });
        assert_eq!(summary.count(OverallRisk::High), 4);
        assert_eq!(summary.count(OverallRisk::Medium), 2);
        assert_eq!(summary.count(OverallRisk::Low), 7);
        assert_eq!(summary.total(), 13);
    }

    #[test]
    fn test_summary_scope() {
        assert_eq!(SummaryScope::default(), SummaryScope::Session);
        assert_eq!(SummaryScope::AllTime.to_string(), "all");
        assert_eq!(SummaryScope::Today.title(), "Today's Assessments");
        assert!(!SummaryScope::Session.is_persisted());
        assert!(SummaryScope::Today.is_persisted());
    }
}
