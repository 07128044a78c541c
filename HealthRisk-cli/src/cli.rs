//! Command-line interface argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use health_risk_data::database::{DatabaseConfig, DatabaseError};
use health_risk_domain::entities::SummaryScope;

use crate::input::{parse_person_count, InputError};
use crate::session::SessionConfig;

/// HealthRisk - classify vital signs and report health risk levels
///
/// Prompts for each person's name, weight, height, blood pressure and heart
/// rate, prints an individual report and finishes with a summary of risk
/// levels.
///
/// Examples:
///   health-risk
///   health-risk --people 3 --summary-scope today
///   health-risk --no-store --format json
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Number of people to assess (prompted for when omitted)
    #[arg(short = 'n', long, value_name = "COUNT", allow_hyphen_values = true)]
    pub people: Option<String>,

    /// SQLite database file (":memory:" for a throwaway database)
    #[arg(long, value_name = "FILE", env = "DB_SQLITE_PATH")]
    pub db_path: Option<PathBuf>,

    /// Do not persist assessments
    #[arg(long)]
    pub no_store: bool,

    /// Records covered by the final summary
    #[arg(
        long,
        value_enum,
        default_value_t = ScopeArg::Session,
        env = "HEALTH_RISK_SUMMARY_SCOPE"
    )]
    pub summary_scope: ScopeArg,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Summary scope as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// People processed in this run
    Session,
    /// Stored assessments dated today
    Today,
    /// Every stored assessment
    All,
}

impl From<ScopeArg> for SummaryScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Session => SummaryScope::Session,
            ScopeArg::Today => SummaryScope::Today,
            ScopeArg::All => SummaryScope::AllTime,
        }
    }
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable console report
    Text,
    /// One JSON object per line
    Json,
}

impl Args {
    /// Default log filter when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    /// Database configuration from the environment, with `--db-path` applied
    pub fn database_config(&self) -> Result<DatabaseConfig, DatabaseError> {
        let config = DatabaseConfig::from_env()?;
        Ok(match &self.db_path {
            Some(path) => config.with_sqlite_path(path.to_string_lossy()),
            None => config,
        })
    }

    /// Session settings; `--people` is held to the same rules as the prompt.
    pub fn session_config(&self) -> Result<SessionConfig, InputError> {
        let people = self.people.as_deref().map(parse_person_count).transpose()?;
        Ok(SessionConfig {
            people,
            persist: !self.no_store,
            summary_scope: self.summary_scope.into(),
        })
    }
}
