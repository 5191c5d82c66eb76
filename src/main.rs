use clap::Parser;
use sheet_expenses::args::{Args, Command};
use sheet_expenses::commands::{self, Period};
use sheet_expenses::{Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // This allows for testing the program without hitting the Google APIs. When
    // EXPENSES_IN_TEST_MODE is set and non-zero in length, then the mode will be Mode::Test,
    // otherwise it will be Mode::Google.
    let mode = Mode::from_env();

    // Everything except init needs an existing config
    if let Command::Init(init_args) = args.command() {
        commands::init(
            home,
            init_args.client_secret(),
            init_args.sheet_url(),
            init_args.who().map(String::from),
        )
        .await?
        .print();
        return Ok(());
    }
    let config = Config::load(home).await?;

    let _: () = match args.command() {
        Command::Init(_) => {}
        Command::Auth => commands::auth_verify(&config, mode).await?.print(),
        Command::Add(add_args) => commands::add(&config, mode, add_args.clone())
            .await?
            .print(),
        Command::Types => commands::types(&config, mode).await?.print(),
        Command::Summary(summary_args) => {
            commands::summary(&config, mode, summary_args.month().cloned())
                .await?
                .print()
        }
        Command::Total(total_args) => {
            // clap requires exactly one of the two
            let period = match (total_args.month(), total_args.year()) {
                (Some(month), _) => Period::Month(month.clone()),
                (None, Some(year)) => Period::Year(year.to_string()),
                (None, None) => Period::Month(sheet_expenses::model::MonthYear::current()),
            };
            commands::total(&config, mode, period).await?.print()
        }
        Command::ByType(month_args) => commands::by_type(&config, mode, month_args.month().clone())
            .await?
            .print(),
        Command::ByMonth(year_args) => {
            commands::by_month(&config, mode, year_args.year().to_string())
                .await?
                .print()
        }
        Command::Years => commands::years(&config, mode).await?.print(),
        Command::MonthYears => commands::month_years(&config, mode).await?.print(),
        Command::Details(details_args) => commands::details(
            &config,
            mode,
            details_args.month().clone(),
            details_args.r#type().to_string(),
        )
        .await?
        .print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={level},{}={level}",
                env!("CARGO_CRATE_NAME"),
                env!("CARGO_PKG_NAME").replace('-', "_"),
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
