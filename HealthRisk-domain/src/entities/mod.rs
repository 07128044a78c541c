// Domain entities and value objects
pub mod assessment;
pub mod conversions;
pub mod risk;
pub mod vitals;

// Re-export common types for easier imports
pub use assessment::{AssessmentRecord, OverallAssessment, SessionSummary, SummaryScope};
pub use risk::{BloodPressureCategory, BmiCategory, HeartRateCategory, MetricClassification, OverallRisk, RiskTier};
pub use vitals::{PersonDetails, VitalReading};
