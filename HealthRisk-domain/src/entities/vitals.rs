use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::services::classifier::body_mass_index;

/// Raw vital signs for one person
///
/// All fields must be strictly positive (and finite) before the reading is
/// classified; `validate` enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct VitalReading {
    /// Body weight in kilograms
    #[validate(custom = "validate_positive_measure")]
    pub weight_kg: f64,

    /// Height in meters
    #[validate(custom = "validate_positive_measure")]
    pub height_m: f64,

    /// Systolic blood pressure in mmHg
    #[validate(range(min = 1, message = "Systolic pressure must be a positive number"))]
    pub systolic: u16,

    /// Diastolic blood pressure in mmHg
    #[validate(range(min = 1, message = "Diastolic pressure must be a positive number"))]
    pub diastolic: u16,

    /// Heart rate in beats per minute
    #[validate(range(min = 1, message = "Heart rate must be a positive number"))]
    pub heart_rate: u16,
}

impl VitalReading {
    pub fn new(weight_kg: f64, height_m: f64, systolic: u16, diastolic: u16, heart_rate: u16) -> Self {
        Self {
            weight_kg,
            height_m,
            systolic,
            diastolic,
            heart_rate,
        }
    }

    /// Body mass index, recomputed on every call.
    /// Only meaningful for a validated reading (height > 0).
    pub fn bmi(&self) -> f64 {
        body_mass_index(self.weight_kg, self.height_m)
    }
}

/// Identifying details of the assessed person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PersonDetails {
    /// Display name
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,

    /// Optional age in years
    #[validate(range(min = 1, max = 150, message = "Age must be between 1 and 150"))]
    pub age: Option<u8>,
}

impl PersonDetails {
    /// Build person details; the name is trimmed
    pub fn new(name: impl AsRef<str>, age: Option<u8>) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            age,
        }
    }
}

fn validate_positive_measure(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        let mut error = ValidationError::new("positive");
        error.message = Some(Cow::from("must be a positive number"));
        Err(error)
    }
}

/// Flatten validation errors into one message, one clause per field
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, messages.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_reading() {
        let reading = VitalReading::new(70.0, 1.75, 120, 80, 75);
        assert!(reading.validate().is_ok());
        assert!((reading.bmi() - 22.857).abs() < 0.001);
    }

    #[test]
    fn test_zero_height_is_rejected() {
        let reading = VitalReading::new(70.0, 0.0, 120, 80, 75);
        let errors = reading.validate().unwrap_err();
        assert!(describe_validation_errors(&errors).contains("height_m"));
    }

    #[test]
    fn test_non_positive_values_are_rejected() {
        assert!(VitalReading::new(-1.0, 1.75, 120, 80, 75).validate().is_err());
        assert!(VitalReading::new(f64::NAN, 1.75, 120, 80, 75).validate().is_err());
        assert!(VitalReading::new(70.0, f64::INFINITY, 120, 80, 75).validate().is_err());
        assert!(VitalReading::new(70.0, 1.75, 0, 80, 75).validate().is_err());
        assert!(VitalReading::new(70.0, 1.75, 120, 0, 75).validate().is_err());

        let errors = VitalReading::new(70.0, 1.75, 120, 80, 0).validate().unwrap_err();
        assert!(describe_validation_errors(&errors).contains("Heart rate must be a positive number"));
    }

    #[test]
    fn test_person_details_validation() {
        let person = PersonDetails::new("  Ada Lovelace ", Some(36));
        assert_eq!(person.name, "Ada Lovelace");
        assert!(person.validate().is_ok());

        assert!(PersonDetails::new("   ", None).validate().is_err());
        assert!(PersonDetails::new("Ada", Some(0)).validate().is_err());
        assert!(PersonDetails::new("Ada", Some(151)).validate().is_err());
        assert!(PersonDetails::new("Ada", None).validate().is_ok());
    }
}
