use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use logreport_cli::OutputFormat;
use logreport_cli::commands;
use logreport_cli::config::Settings;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Parser)]
#[command(name = "logreport")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Build per-URL request time reports from rotated nginx access logs",
    long_about = "logreport picks the newest access log in a directory, aggregates request \
                  times per URL and writes a static HTML report once per log date. \
                  Without a subcommand it runs `analyze`."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to a JSON configuration file
    #[arg(short, long, global = true, value_name = "FILE", env = "LOGREPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, table, pretty)
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Report on the newest log unless its report already exists
    Analyze,

    /// Print request time statistics for a single log file
    Stats {
        /// Path to the log file (plain or .gz)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only show the N slowest URLs (0 = all)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Target shell
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Analyze) {
        Commands::Analyze => {
            let settings = match Settings::load(cli.config.as_deref()) {
                Ok(settings) => settings,
                Err(e) => {
                    init_logging(cli.verbose, None)?;
                    tracing::error!("{:#}", e);
                    return Err(e);
                }
            };

            init_logging(cli.verbose, settings.log_file.as_deref())?;
            tracing::debug!("Output format: {}", cli.format.as_str());

            commands::analyze::execute(&settings, cli.format).inspect_err(|e| {
                tracing::error!("Analysis failed: {:#}", e);
            })
        }
        Commands::Stats { file, limit } => {
            init_logging(cli.verbose, None)?;
            commands::stats::execute(&file, limit, cli.format)
        }
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command())
        }
    }
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose {
        "logreport=debug,logreport_cli=debug,logreport_core=debug"
    } else {
        "logreport=info,logreport_cli=info,logreport_core=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}
