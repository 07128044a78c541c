// Repository module structure
pub mod errors;
mod assessment;
mod in_memory;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use assessment::{AssessmentRepository, AssessmentRepositoryTrait};

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use assessment::tests;
