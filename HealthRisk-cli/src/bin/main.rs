use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use health_risk_cli::{Args, JsonReport, OutputFormat, PromptReader, ReportSink, Session, TextReport};
use health_risk_data::database::DatabasePool;
use health_risk_data::repository::AssessmentRepository;
use health_risk_domain::services::create_assessment_service;

/// Entry point for the `health-risk` binary
///
/// Exit code 0 when the session completes, 1 when it ends on a fatal error.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let dotenv_loaded = dotenv().is_ok();
    let args = Args::parse();
    init_logging(&args);

    if !dotenv_loaded {
        info!(".env file not found, using environment variables");
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; RUST_LOG takes precedence over --verbose/--quiet.
fn init_logging(args: &Args) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(env_filter)
        .init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    info!("Starting HealthRisk v{}", env!("CARGO_PKG_VERSION"));

    let mut config = args.session_config().context("Invalid --people value")?;
    let repository = if config.persist {
        match open_database(&args) {
            Ok(pool) => {
                info!("Storing assessments in {}", pool.connection_info());
                AssessmentRepository::new(pool)
            }
            Err(e) => {
                warn!("Storage unavailable, assessments will not be saved: {:#}", e);
                config.persist = false;
                AssessmentRepository::in_memory()
            }
        }
    } else {
        info!("Storage disabled");
        AssessmentRepository::in_memory()
    };
    let service = create_assessment_service(repository);

    let stdin = io::stdin();
    // Keep stdout for the JSON stream; prompts move to stderr.
    let prompts: Box<dyn Write> = match args.format {
        OutputFormat::Text => Box::new(io::stdout()),
        OutputFormat::Json => Box::new(io::stderr()),
    };
    let mut input = PromptReader::new(stdin.lock(), prompts);
    let mut report: Box<dyn ReportSink> = match args.format {
        OutputFormat::Text => Box::new(TextReport::new(io::stdout())),
        OutputFormat::Json => Box::new(JsonReport::new(io::stdout())),
    };

    let outcome = Session::new(&service, config)
        .run(&mut input, report.as_mut())
        .await
        .context("Session aborted")?;

    info!(
        "Session finished: {} assessed, {} skipped, {} saved",
        outcome.session.total(),
        outcome.skipped,
        outcome.saved
    );
    Ok(())
}

fn open_database(args: &Args) -> anyhow::Result<DatabasePool> {
    let db_config = args.database_config().context("Invalid database configuration")?;
    DatabasePool::connect(&db_config).context("Failed to open database")
}
