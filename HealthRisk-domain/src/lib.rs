// HealthRisk Domain
// This crate contains the classification and aggregation rules for vital signs

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Re-export the database module from the data crate for convenience
pub use health_risk_data::database;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
