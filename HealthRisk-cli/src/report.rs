//! Rendering of per-person reports and the end-of-session summary.

use std::io::{self, Write};

use health_risk_domain::entities::{
    OverallAssessment, PersonDetails, SessionSummary, SummaryScope, VitalReading,
};
use serde::Serialize;
use uuid::Uuid;

/// What happened to a person's record in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StorageOutcome {
    Saved { person_id: i64, record_id: Uuid },
    Failed,
    Disabled,
}

/// Everything the renderer needs to report one person
#[derive(Debug, Clone, Copy)]
pub struct PersonReport<'a> {
    pub index: u32,
    pub person: &'a PersonDetails,
    pub reading: &'a VitalReading,
    pub assessment: &'a OverallAssessment,
    pub storage: StorageOutcome,
}

/// Destination for session output
pub trait ReportSink {
    fn person_report(&mut self, report: &PersonReport<'_>) -> io::Result<()>;

    fn skipped(&mut self, index: u32, reason: &str) -> io::Result<()>;

    fn summary(&mut self, scope: SummaryScope, summary: &SessionSummary) -> io::Result<()>;
}

/// Human-readable console report
pub struct TextReport<W> {
    out: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextReport<W> {
    fn person_report(&mut self, report: &PersonReport<'_>) -> io::Result<()> {
        let assessment = report.assessment;
        let bmi = assessment.bmi_classification();
        let bp = assessment.blood_pressure();
        let hr = assessment.heart_rate();

        match report.storage {
            StorageOutcome::Saved { person_id, .. } => writeln!(
                self.out,
                "\n--- Health Report for {} (ID: {}) ---",
                report.person.name, person_id
            )?,
            _ => writeln!(self.out, "\n--- Health Report for {} ---", report.person.name)?,
        }
        if let Some(age) = report.person.age {
            writeln!(self.out, "Age: {}", age)?;
        }
        writeln!(
            self.out,
            "BMI: {:.2} kg/m\u{b2} ({}, {} Risk)",
            assessment.bmi(),
            bmi.category,
            bmi.risk
        )?;
        writeln!(
            self.out,
            "Blood Pressure: {}/{} mm/hg ({}, {} Risk)",
            report.reading.systolic, report.reading.diastolic, bp.category, bp.risk
        )?;
        writeln!(
            self.out,
            "Heart Rate: {} bpm ({}, {} Risk)",
            report.reading.heart_rate, hr.category, hr.risk
        )?;
        writeln!(self.out, "Overall Health Risk: {} risk level", assessment.overall())?;
        if report.storage == StorageOutcome::Failed {
            writeln!(self.out, "Note: this record could not be saved.")?;
        }
        self.out.flush()
    }

    fn skipped(&mut self, index: u32, reason: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "Invalid input for Person {}: {}. Skipping this person.",
            index, reason
        )?;
        self.out.flush()
    }

    fn summary(&mut self, scope: SummaryScope, summary: &SessionSummary) -> io::Result<()> {
        writeln!(self.out, "\n--- Summary Health Risk Report ({}) ---", scope.title())?;
        writeln!(self.out, "High risk level: {}", summary.high())?;
        writeln!(self.out, "Medium risk level: {}", summary.medium())?;
        writeln!(self.out, "Low risk level: {}", summary.low())?;
        self.out.flush()
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsonEvent<'a> {
    Person {
        index: u32,
        person: &'a PersonDetails,
        reading: &'a VitalReading,
        assessment: &'a OverallAssessment,
        storage: StorageOutcome,
    },
    Skipped {
        index: u32,
        reason: &'a str,
    },
    Summary {
        scope: SummaryScope,
        high: u64,
        medium: u64,
        low: u64,
    },
}

/// Newline-delimited JSON report, one object per event
pub struct JsonReport<W> {
    out: W,
}

impl<W: Write> JsonReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &JsonEvent<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> ReportSink for JsonReport<W> {
    fn person_report(&mut self, report: &PersonReport<'_>) -> io::Result<()> {
        self.emit(&JsonEvent::Person {
            index: report.index,
            person: report.person,
            reading: report.reading,
            assessment: report.assessment,
            storage: report.storage,
        })
    }

    fn skipped(&mut self, index: u32, reason: &str) -> io::Result<()> {
        self.emit(&JsonEvent::Skipped { index, reason })
    }

    fn summary(&mut self, scope: SummaryScope, summary: &SessionSummary) -> io::Result<()> {
        self.emit(&JsonEvent::Summary {
            scope,
            high: summary.high(),
            medium: summary.medium(),
            low: summary.low(),
        })
    }
}
