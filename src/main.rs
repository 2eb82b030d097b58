use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docbatch")]
#[command(
    version,
    about = "Batch document generation client for remote template-rendering services"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use a specific config file instead of the global/project chain
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize docbatch in the current directory
    Init {
        #[arg(long, short, help = "Overwrite existing initialization")]
        force: bool,
    },

    /// Run the batch: manifest + queue + per-entry datasets
    Run {
        #[arg(long, help = "Manifest file (JSON array of template descriptors)")]
        manifest: Option<PathBuf>,
        #[arg(long, help = "Queue file (one template id per line)")]
        queue: Option<PathBuf>,
        #[arg(long, help = "Directory holding dataset JSON files")]
        data_dir: Option<PathBuf>,
        #[arg(long, short, help = "Output directory for rendered documents")]
        output: Option<PathBuf>,
        #[arg(long, help = "Rendering format tag (default: docx)")]
        format: Option<String>,
        #[arg(long, help = "Accept invalid TLS certificates")]
        insecure: bool,
    },

    /// Submit every JSON job file in a folder as-is (no manifest or queue)
    Jobs {
        #[arg(long, short, help = "Folder of complete job files")]
        input: Option<PathBuf>,
        #[arg(long, short, help = "Output directory for rendered documents")]
        output: Option<PathBuf>,
        #[arg(long, help = "Accept invalid TLS certificates")]
        insecure: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Init { force } => {
            docbatch::cli::commands::init::run(force)?;
        }
        Commands::Run {
            manifest,
            queue,
            data_dir,
            output,
            format,
            insecure,
        } => {
            let args = docbatch::cli::commands::run::RunArgs {
                manifest,
                queue,
                data_dir,
                output,
                format,
                insecure,
            };
            let rt = Runtime::new()?;
            rt.block_on(docbatch::cli::commands::run::run(cli.config.as_deref(), args))?;
        }
        Commands::Jobs {
            input,
            output,
            insecure,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(docbatch::cli::commands::jobs::run(
                cli.config.as_deref(),
                input,
                output,
                insecure,
            ))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                docbatch::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                docbatch::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                if global {
                    docbatch::cli::commands::config::init_global(force)?;
                } else {
                    docbatch::cli::commands::config::init_project()?;
                }
            }
        },
    }

    Ok(())
}
