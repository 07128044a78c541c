//! Interactive prompting and parsing of per-person input.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use health_risk_domain::entities::{PersonDetails, VitalReading};
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading input
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Number of people must be a positive whole number, got '{0}'")]
    InvalidPersonCount(String),

    #[error("Invalid {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid blood pressure '{0}', expected systolic/diastolic such as 120/80")]
    InvalidBloodPressure(String),

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Input ended before all data was entered")]
    EndOfInput,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl InputError {
    /// Fatal errors end the session; the rest only skip the current person.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            InputError::InvalidPersonCount(_) | InputError::EndOfInput | InputError::Io(_)
        )
    }
}

/// One person's raw entry, parsed but not yet validated
#[derive(Debug, Clone, PartialEq)]
pub struct PersonEntry {
    pub person: PersonDetails,
    pub reading: VitalReading,
}

/// Reads answers from `input`, writing prompts to `prompts`
pub struct PromptReader<R, W> {
    input: R,
    prompts: W,
    line: String,
}

impl<R: BufRead, W: Write> PromptReader<R, W> {
    pub fn new(input: R, prompts: W) -> Self {
        Self {
            input,
            prompts,
            line: String::new(),
        }
    }

    /// Ask for the number of people to assess
    pub fn read_person_count(&mut self) -> Result<u32, InputError> {
        let answer = self.prompt("Enter the number of people to assess: ")?;
        parse_person_count(&answer)
    }

    /// Ask for one person's details.
    ///
    /// Reading stops at the first malformed answer; the remaining prompts for
    /// that person are not shown.
    pub fn read_person(&mut self, index: u32) -> Result<PersonEntry, InputError> {
        writeln!(self.prompts, "\n--- Entering data for Person {} ---", index)?;

        let name = self.prompt(&format!("Enter name for Person {}: ", index))?;
        if name.is_empty() {
            return Err(InputError::EmptyName);
        }
        let age = self.prompt("Enter age (optional, press Enter to skip): ")?;
        let age = if age.is_empty() {
            None
        } else {
            Some(parse_number::<u8>("age", &age)?)
        };

        let weight_kg = parse_number("weight", &self.prompt("Enter weight (kg): ")?)?;
        let height_m = parse_number("height", &self.prompt("Enter height (m): ")?)?;
        let (systolic, diastolic) =
            parse_blood_pressure(&self.prompt("Enter Blood Pressure (Systolic/Diastolic, e.g., 120/80): ")?)?;
        let heart_rate = parse_number("heart rate", &self.prompt("Enter heart rate (bpm): ")?)?;

        debug!("Read entry for person {}", index);
        Ok(PersonEntry {
            person: PersonDetails::new(name, age),
            reading: VitalReading::new(weight_kg, height_m, systolic, diastolic, heart_rate),
        })
    }

    fn prompt(&mut self, text: &str) -> Result<String, InputError> {
        write!(self.prompts, "{}", text)?;
        self.prompts.flush()?;

        self.line.clear();
        if self.input.read_line(&mut self.line)? == 0 {
            return Err(InputError::EndOfInput);
        }
        Ok(self.line.trim().to_string())
    }
}

/// Parse a person count; zero, negative and non-numeric values are rejected.
pub fn parse_person_count(value: &str) -> Result<u32, InputError> {
    match value.trim().parse::<i64>() {
        Ok(count) if count > 0 => {
            u32::try_from(count).map_err(|_| InputError::InvalidPersonCount(value.to_string()))
        }
        _ => Err(InputError::InvalidPersonCount(value.to_string())),
    }
}

/// Parse a "systolic/diastolic" pair such as `120/80`.
pub fn parse_blood_pressure(value: &str) -> Result<(u16, u16), InputError> {
    let invalid = || InputError::InvalidBloodPressure(value.to_string());

    let (systolic, diastolic) = value.split_once('/').ok_or_else(invalid)?;
    let systolic = systolic.trim().parse::<u16>().map_err(|_| invalid())?;
    let diastolic = diastolic.trim().parse::<u16>().map_err(|_| invalid())?;
    Ok((systolic, diastolic))
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, InputError> {
    value.parse::<T>().map_err(|_| InputError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
