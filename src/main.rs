use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pulumi_stack_outputs::config::Config;
use pulumi_stack_outputs::provider::{self, Provider, ProviderConfig, StackOutputsArgs, StackOutputsState};
use pulumi_stack_outputs::pulumi::http::format_api_error;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Read Pulumi stack outputs
#[derive(Parser, Debug)]
#[command(name = "pulumi-stack-outputs", version, about, long_about = None)]
struct Args {
    /// Pulumi Cloud access token
    #[arg(long, env = "PULUMI_ACCESS_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Pulumi Cloud API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read the outputs of one stack
    Read {
        /// Organization name (defaults to the config file's organization)
        #[arg(long)]
        organization: Option<String>,

        /// Project name
        #[arg(long)]
        project: String,

        /// Stack name
        #[arg(long)]
        stack: String,
    },
    /// Print the provider and data source schema
    Schema,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    // RUST_LOG wins over --log-level when set
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match level.to_tracing_level() {
            Some(level) => EnvFilter::new(format!("pulumi_stack_outputs={}", level)),
            None => return Ok(None),
        },
    };

    let (non_blocking, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("pulumi-stack-outputs started with log level: {:?}", level);

    Ok(Some(guard))
}

fn print_state(state: &StackOutputsState, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(state)?);
        }
        OutputFormat::Text => {
            println!("id={}", state.id);
            println!("version={}", state.version);
            for (key, value) in &state.stack_outputs {
                println!("{}={}", key, value);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_ref())?;

    let config = Config::load();

    match args.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&provider::schema())?);
        }
        Command::Read {
            organization,
            project,
            stack,
        } => {
            let organization = config
                .effective_organization(organization.as_deref())
                .context("No organization given. Pass --organization or set it in the config file")?;

            let provider = Provider::configure(ProviderConfig {
                token: args.token.or_else(|| config.token.clone()),
                api_url: Some(config.effective_api_url(args.api_url.as_deref())),
            })?;

            let state = provider
                .read_stack_outputs(StackOutputsArgs {
                    organization,
                    project,
                    stack,
                })
                .await
                .map_err(|e| anyhow::anyhow!(format_api_error(&e)))?;

            print_state(&state, args.output)?;
        }
    }

    Ok(())
}
