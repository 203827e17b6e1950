use anyhow::{Context, Result};
use aplus_core::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_JOBS_SHEET_NAME, DEFAULT_PAGE_LIMIT, DEFAULT_SHEET_NAME,
    DEFAULT_SOURCE_TIMEOUT_SECS, env_list, env_non_empty, env_parse_with_default,
};
use aplus_service::{DirectoryCache, DirectoryQueryService, JobBoardService, RegistrationService};
use aplus_sheets::{DEFAULT_API_URL, SheetsClient, SheetsConfig};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "aplus-tutors")]
#[command(about = "Tutor directory backed by a Google Sheet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(short, long, default_value = "8080")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Fetch the sheet once and print the refresh report
    Refresh,
    /// Print verified tutors as JSON
    List {
        #[arg(short, long)]
        city: Option<String>,
        #[arg(short, long)]
        subject: Option<String>,
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long, default_value = "0")]
        offset: usize,
        #[arg(short, long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: usize,
    },
    /// Check whether an id card is already listed
    CheckId { id_card: String },
}

pub(crate) fn sheets_config() -> Result<SheetsConfig> {
    let spreadsheet_id =
        env_non_empty("APLUS_SHEET_ID").context("APLUS_SHEET_ID environment variable must be set")?;
    let token = env_non_empty("APLUS_SHEETS_TOKEN")
        .context("APLUS_SHEETS_TOKEN environment variable must be set")?;
    Ok(SheetsConfig {
        api_url: env_non_empty("APLUS_SHEETS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
        spreadsheet_id,
        sheet_name: env_non_empty("APLUS_SHEET_NAME")
            .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_owned()),
        token,
        timeout: source_timeout(),
    })
}

pub(crate) fn cache_ttl() -> Duration {
    Duration::from_secs(env_parse_with_default("APLUS_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS))
}

pub(crate) fn source_timeout() -> Duration {
    Duration::from_secs(env_parse_with_default(
        "APLUS_SOURCE_TIMEOUT_SECS",
        DEFAULT_SOURCE_TIMEOUT_SECS,
    ))
}

pub(crate) fn allowed_origins() -> Vec<String> {
    env_list("APLUS_ALLOWED_ORIGINS")
}

pub(crate) struct Services {
    pub(crate) query: Arc<DirectoryQueryService>,
    pub(crate) registration: Arc<RegistrationService>,
    pub(crate) jobs: Arc<JobBoardService>,
}

/// Wire the sheet clients into the cache and the services that share it.
pub(crate) fn build_services() -> Result<Services> {
    let config = sheets_config()?;
    tracing::debug!(?config, "sheets configuration");
    let timeout = config.timeout;
    let jobs_config = SheetsConfig {
        sheet_name: env_non_empty("APLUS_JOBS_SHEET_NAME")
            .unwrap_or_else(|| DEFAULT_JOBS_SHEET_NAME.to_owned()),
        ..config.clone()
    };
    let client = Arc::new(SheetsClient::new(config)?);
    let cache = Arc::new(DirectoryCache::new(client.clone(), timeout));
    let query = Arc::new(DirectoryQueryService::new(cache, cache_ttl()));
    let registration = Arc::new(RegistrationService::new(query.clone(), client));
    let jobs = Arc::new(JobBoardService::new(Arc::new(SheetsClient::new(jobs_config)?), timeout));
    Ok(Services { query, registration, jobs })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(port, host).await?,
        Commands::Refresh => commands::directory::run_refresh().await?,
        Commands::List { city, subject, query, offset, limit } => {
            commands::directory::run_list(city, subject, query, offset, limit).await?;
        },
        Commands::CheckId { id_card } => commands::directory::run_check_id(&id_card).await?,
    }

    Ok(())
}
