// HealthRisk CLI
// Interactive front end: prompts for vital signs, reports each person's risk
// and summarizes the run.

pub mod cli;
pub mod input;
pub mod report;
pub mod session;

pub use cli::{Args, OutputFormat, ScopeArg};
pub use input::{InputError, PersonEntry, PromptReader};
pub use report::{JsonReport, PersonReport, ReportSink, StorageOutcome, TextReport};
pub use session::{Session, SessionConfig, SessionError, SessionOutcome};
