pub mod assessment;

pub use assessment::{AssessmentRecord, CreateAssessmentRequest, RiskCounts};
