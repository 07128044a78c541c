pub mod aggregator;
pub mod assessment;
pub mod classifier;

// Domain services
// Classification and aggregation are pure functions; the assessment service
// adds validation and persistence on top of them.

// Re-export service traits and factory functions
pub use aggregator::{assess, determine_overall_risk};
pub use assessment::{create_assessment_service, AssessmentService, AssessmentServiceError, AssessmentServiceTrait};
pub use classifier::{body_mass_index, classify_blood_pressure, classify_bmi, classify_heart_rate};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use assessment::create_mock_assessment_service;
