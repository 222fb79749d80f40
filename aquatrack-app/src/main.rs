use anyhow::{Context, Result};
use aquatrack_core::collection::ReadingList;
use aquatrack_schemas::schema::Schema;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod shell;

/// Record water-quality sensor readings and report risk statistics.
#[derive(Debug, Parser)]
#[command(name = "aquatrack", version, about)]
struct Cli {
    /// Data file to load at startup and save to (default: readings.csv)
    #[arg(short, long, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Record layout of the data file: contamination or hydrological
    #[arg(short, long)]
    schema: Option<Schema>,

    /// YAML configuration file (default: ./aquatrack.yaml if present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(level: &str, verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { level };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)
            .with_context(|| format!("Invalid log level: {}", default_level))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::AppConfig::resolve(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(cli.data_file, cli.schema);
    init_logging(&config.log_level, cli.verbose)?;
    info!(
        "Using {} schema with data file {}",
        config.schema,
        config.data_file.display()
    );

    let mut readings = ReadingList::new(config.schema);
    shell::load_on_startup(&mut readings, &config.data_file);

    let mut shell = shell::Shell::new(readings, config.data_file);
    let stdin = io::stdin();
    let stdout = io::stdout();
    shell
        .run(&mut stdin.lock(), &mut stdout.lock())
        .context("Console I/O failed")?;
    info!("Exiting with {} readings", shell.readings().len());

    Ok(())
}
