mod report;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rhi_engine::MAX_HISTORY_DAYS;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rhi-cli")]
#[command(about = "Resilience Health Index command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the latest snapshot with its top drivers as JSON
    Latest {
        /// Score as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Number of drivers to print (defaults to `RHI_DRIVER_LIMIT`)
        #[arg(long)]
        top: Option<usize>,
    },
    /// Print daily headline and component scores as JSON, oldest first
    History {
        /// Number of days to include
        #[arg(
            long,
            default_value_t = 90,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_HISTORY_DAYS))
        )]
        days: u32,
        /// Last day of the series (YYYY-MM-DD); defaults to today
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Load and validate the indicator catalog, then print a summary
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = rhi_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Latest { as_of, top } => report::run_latest(&config, as_of, top)?,
        Commands::History { days, end } => report::run_history(&config, days, end)?,
        Commands::CheckConfig => report::run_check_config(&config)?,
    }

    Ok(())
}
