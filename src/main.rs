use clap::{Parser, Subcommand};
use cloudtrail_file::cli::run::{self, RunSettings};
use cloudtrail_file::config::resolve_config_path;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cloudtrail-file")]
#[command(about = "Read CloudTrail JSON exports as an event stream", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every event under the root directory
    Dump {
        root: Option<PathBuf>,
        /// Print "<timestamp_ns><TAB><json>" instead of a summary line
        #[arg(long)]
        json: bool,
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Print one field of every event
    Extract {
        #[arg(long)]
        field: String,
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Print the extractable field table as JSON
    Fields,
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Init {
        #[arg(long)]
        stdout: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays clean for events
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloudtrail_file=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.as_deref());
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Dump { root, json, limit } => {
            let mut settings = RunSettings::resolve(root, config_path.as_deref())?;
            if json {
                settings.output.format = cloudtrail_file::config::OutputFormat::Json;
            }
            if limit.is_some() {
                settings.output.limit = limit;
            }
            run::dump(&settings, &mut stdout)?;
        }
        Commands::Extract { field, root, limit } => {
            let mut settings = RunSettings::resolve(root, config_path.as_deref())?;
            if limit.is_some() {
                settings.output.limit = limit;
            }
            run::extract(&settings, &field, &mut stdout)?;
        }
        Commands::Fields => run::fields(&mut stdout)?,
        Commands::Config { action } => match action {
            ConfigAction::Init { stdout } => cloudtrail_file::cli::config::init(stdout)?,
        },
    }

    Ok(())
}
