use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::commands::{self, ExportArgs, ListArgs, ValuesArgs};
use crate::config::ConfigLoader;

#[derive(Parser, Debug)]
#[command(
    name = "roster",
    version,
    about = "Browse and export candidate, ranking and audit-log dumps"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file location (takes precedence over ROSTER_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print one page of the filtered and sorted records
    List(ListArgs),
    /// Write the filtered and sorted records to a CSV file
    Export(ExportArgs),
    /// Print the distinct values of a field (category filter options)
    Values(ValuesArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;

    let loader = ConfigLoader::discover(cli.config.as_deref())?;
    let config = loader.load()?;

    let output = match &cli.command {
        Commands::List(args) => commands::list(&config, args)?,
        Commands::Export(args) => {
            let path = commands::export(&config, args, Local::now().date_naive())?;
            format!("Exported to {}\n", path.display())
        }
        Commands::Values(args) => commands::values(args)?,
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("writing output")?;
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| -> Result<()> {
        let (env_filter, rejected) = match log_filter(level) {
            Ok(filter) => (filter, None),
            Err(err) => (EnvFilter::new("warn"), Some(err)),
        };
        fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .try_init()
            .map_err(|err| anyhow::anyhow!("{err}"))?;
        if let Some(err) = rejected {
            tracing::warn!(level, error = %err, "ignoring --log-level, logging at warn");
        }
        Ok(())
    })
    .map(|_| ())
}

/// A bare level (`info`, `DEBUG`, `off`) or `target=level` directives. A bare
/// word that is not a level would be read as a target name and silence
/// everything else, so it is rejected.
fn log_filter(level: &str) -> Result<EnvFilter> {
    if !level.contains('=') && level.trim().parse::<LevelFilter>().is_err() {
        bail!("unknown log level `{level}`");
    }
    EnvFilter::try_new(level.trim()).with_context(|| format!("invalid log filter `{level}`"))
}
