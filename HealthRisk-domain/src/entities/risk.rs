use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Binary risk tier assigned to a single vital sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    High,
}

/// Three-level risk combining the tiers of all vital signs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverallRisk {
    Low,
    Medium,
    High,
}

/// BMI category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    /// BMI below 18.5
    Underweight,
    /// BMI from 18.5 to 24.9
    NormalWeight,
    /// BMI above 24.9
    Overweight,
}

/// Blood pressure category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodPressureCategory {
    /// Systolic below 90 or diastolic below 60
    Low,
    /// Systolic 90-120 and diastolic 60-80
    Normal,
    /// Anything else, including readings between the other two bands
    High,
}

/// Heart rate category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeartRateCategory {
    /// Below 60 bpm
    Low,
    /// 60-100 bpm
    Normal,
    /// Above 100 bpm
    High,
}

/// Category and risk tier produced for one vital sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricClassification<C> {
    pub category: C,
    pub risk: RiskTier,
}

impl<C> MetricClassification<C> {
    pub fn new(category: C, risk: RiskTier) -> Self {
        Self { category, risk }
    }
}

/// Generates `as_str`, `Display` and `FromStr` for a label enum.
macro_rules! labelled_enum {
    ($ty:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $ty {
            /// Label used in reports and storage
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($ty::$variant),)+
                    _ => Err(format!("Invalid {} label: {}", stringify!($ty), s)),
                }
            }
        }
    };
}

labelled_enum!(RiskTier { Low => "Low", High => "High" });
labelled_enum!(OverallRisk { Low => "Low", Medium => "Medium", High => "High" });
labelled_enum!(BmiCategory {
    Underweight => "Underweight",
    NormalWeight => "Normal weight",
    Overweight => "Overweight",
});
labelled_enum!(BloodPressureCategory { Low => "Low", Normal => "Normal", High => "High" });
labelled_enum!(HeartRateCategory { Low => "Low", Normal => "Normal", High => "High" });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for category in [BmiCategory::Underweight, BmiCategory::NormalWeight, BmiCategory::Overweight] {
            assert_eq!(category.as_str().parse::<BmiCategory>().unwrap(), category);
        }
        for risk in [OverallRisk::Low, OverallRisk::Medium, OverallRisk::High] {
            assert_eq!(risk.to_string().parse::<OverallRisk>().unwrap(), risk);
        }
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        assert!("Medium".parse::<RiskTier>().is_err());
        assert!("normal weight".parse::<BmiCategory>().is_err());
        assert!("".parse::<BloodPressureCategory>().is_err());
    }
}
