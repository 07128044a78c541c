//! Threshold classification of individual vital signs.
//!
//! Each classifier evaluates its bands top to bottom and the first match
//! wins. The bands cover every finite input.

use crate::entities::risk::{
    BloodPressureCategory, BmiCategory, HeartRateCategory, MetricClassification, RiskTier,
};

/// BMI below this value is underweight
pub const BMI_UNDERWEIGHT_BELOW: f64 = 18.5;
/// Highest BMI still counted as normal weight
pub const BMI_NORMAL_MAX: f64 = 24.9;

/// Body mass index: weight in kilograms over height in meters squared.
/// `height_m` must be non-zero.
pub fn body_mass_index(weight_kg: f64, height_m: f64) -> f64 {
    weight_kg / (height_m * height_m)
}

/// Categorize a BMI value
pub fn classify_bmi(bmi: f64) -> MetricClassification<BmiCategory> {
    if bmi < BMI_UNDERWEIGHT_BELOW {
        MetricClassification::new(BmiCategory::Underweight, RiskTier::Low)
    } else if bmi <= BMI_NORMAL_MAX {
        MetricClassification::new(BmiCategory::NormalWeight, RiskTier::Low)
    } else {
        MetricClassification::new(BmiCategory::Overweight, RiskTier::High)
    }
}

/// Categorize blood pressure based on measurements
pub fn classify_blood_pressure(systolic: u16, diastolic: u16) -> MetricClassification<BloodPressureCategory> {
    if systolic < 90 || diastolic < 60 {
        MetricClassification::new(BloodPressureCategory::Low, RiskTier::Low)
    } else if (90..=120).contains(&systolic) && (60..=80).contains(&diastolic) {
        MetricClassification::new(BloodPressureCategory::Normal, RiskTier::Low)
    } else {
        MetricClassification::new(BloodPressureCategory::High, RiskTier::High)
    }
}

/// Categorize a resting heart rate
pub fn classify_heart_rate(heart_rate: u16) -> MetricClassification<HeartRateCategory> {
    if heart_rate < 60 {
        MetricClassification::new(HeartRateCategory::Low, RiskTier::Low)
    } else if heart_rate <= 100 {
        MetricClassification::new(HeartRateCategory::Normal, RiskTier::Low)
    } else {
        MetricClassification::new(HeartRateCategory::High, RiskTier::High)
    }
}
