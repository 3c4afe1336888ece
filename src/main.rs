//! `gemdash` CLI - extract the Voorjaarsnota budget page and summarize it

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gemdash::Config;

use cmd::{cmd_dashboard, cmd_data, cmd_metrics, cmd_refresh};

#[derive(Parser)]
#[command(name = "gemdash")]
#[command(about = "Budget dashboard for an archived municipal budget page")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/gemdash/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Source page URL, overriding config and GEMDASH_URL
    #[arg(long, global = true)]
    url: Option<String>,

    /// Directory holding scraped-data.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard, extracting first when data is missing or stale
    Dashboard,

    /// Extract the page now and store the result
    Refresh,

    /// Print the stored record as JSON
    Data,

    /// Print the computed metrics as JSON
    Metrics,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.source_url = url;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Commands::Dashboard => cmd_dashboard(&config).await?,
        Commands::Refresh => cmd_refresh(&config).await?,
        Commands::Data => cmd_data(&config)?,
        Commands::Metrics => cmd_metrics(&config)?,
    }

    Ok(())
}

/// Logs go to stderr so JSON on stdout stays parseable.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
