use crate::entities::assessment::OverallAssessment;
use crate::entities::risk::{OverallRisk, RiskTier};
use crate::entities::vitals::VitalReading;
use crate::services::classifier::{classify_blood_pressure, classify_bmi, classify_heart_rate};

/// Combine the three per-metric tiers into one overall risk.
///
/// Two or more High tiers give High, exactly one gives Medium, none gives
/// Low. Which metrics are High does not matter.
pub fn determine_overall_risk(bmi_risk: RiskTier, bp_risk: RiskTier, hr_risk: RiskTier) -> OverallRisk {
    let high_risk_count = [bmi_risk, bp_risk, hr_risk]
        .iter()
        .filter(|risk| **risk == RiskTier::High)
        .count();

    match high_risk_count {
        0 => OverallRisk::Low,
        1 => OverallRisk::Medium,
        _ => OverallRisk::High,
    }
}

/// Classify every vital sign of a reading and combine the results.
///
/// The reading must already be validated; in particular `height_m` must be
/// positive.
pub fn assess(reading: &VitalReading) -> OverallAssessment {
    let bmi = reading.bmi();
    let bmi_class = classify_bmi(bmi);
    let blood_pressure = classify_blood_pressure(reading.systolic, reading.diastolic);
    let heart_rate = classify_heart_rate(reading.heart_rate);
    let overall = determine_overall_risk(bmi_class.risk, blood_pressure.risk, heart_rate.risk);

    OverallAssessment::new(bmi, bmi_class, blood_pressure, heart_rate, overall)
}
