use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;

use drivebot::application::errors::{BotError, StorageError};
use drivebot::application::handlers::HandlerRegistry;
use drivebot::application::messaging::CommandDispatcher;
use drivebot::application::services::CommandLog;
use drivebot::domain::entities::LogStats;
use drivebot::domain::traits::{CommandLogStore, DriveStorage, Summarizer};
use drivebot::infrastructure::adapters::twilio::{self, AppState, TwilioMediaFetcher};
use drivebot::infrastructure::adapters::ConsoleAdapter;
use drivebot::infrastructure::config::{Config, SummarizerProvider};
use drivebot::infrastructure::database::Database;
use drivebot::infrastructure::drive::LocalDrive;
use drivebot::infrastructure::summarizer::{GroqSummarizer, RemoteSummarizer};

#[derive(Parser)]
#[command(name = "drivebot")]
#[command(about = "WhatsApp command bot for drive file operations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server
    Serve,
    /// Dispatch one command locally, e.g. `drivebot exec LIST /Documents`
    Exec {
        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,
    },
    /// Read commands from stdin
    Console,
    /// Print recent command log entries
    Logs {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Version => {
            println!("drivebot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(&cli.config),
        command => run_async(&cli.config, command),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run_async(config_path: &str, command: Commands) -> Result<(), BotError> {
    let config = load_config(config_path)?;
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async move {
        match command {
            Commands::Serve => serve(config).await,
            Commands::Exec { command } => {
                let dispatcher = build_dispatcher(&config).await?;
                let reply = ConsoleAdapter::new(dispatcher).execute(&command.join(" ")).await;
                println!("{}", reply);
                Ok(())
            }
            Commands::Console => {
                let dispatcher = build_dispatcher(&config).await?;
                ConsoleAdapter::new(dispatcher).run().await
            }
            Commands::Logs { limit } => print_logs(&config, limit).await,
            Commands::Version | Commands::InitConfig => Ok(()),
        }
    })
}

/// File config if present, otherwise defaults; environment wins either way
fn load_config(path: &str) -> Result<Config, BotError> {
    let config = if Path::new(path).exists() {
        let mut config = Config::load(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config
    } else {
        tracing::info!("No config at {}, using defaults and environment", path);
        Config::load_env()?
    };

    config.validate()?;
    Ok(config)
}

async fn build_dispatcher(config: &Config) -> Result<Arc<CommandDispatcher>, BotError> {
    let db = Database::new(&config.database.path).map_err(StorageError::from)?;
    tracing::info!("Command log database at {}", config.database.path.display());

    let drive = LocalDrive::new(config.drive.root.clone());
    drive.init().await?;
    tracing::info!("Drive root at {}", drive.root().display());
    let drive: Arc<dyn DriveStorage> = Arc::new(drive);

    let media = TwilioMediaFetcher::new(config.twilio.credentials(), config.media_timeout())?;
    if config.twilio.credentials().is_none() {
        tracing::warn!("Twilio credentials not set, media downloads are unauthenticated");
    }

    let summarizer = build_summarizer(config, drive.clone())?;
    let handlers = HandlerRegistry::with_defaults(drive, Arc::new(media), summarizer);
    tracing::info!("Registered {} command handlers", handlers.len());

    let dispatcher = CommandDispatcher::new(handlers, CommandLog::new(Arc::new(db)))
        .with_handler_timeout(config.handler_timeout());
    Ok(Arc::new(dispatcher))
}

fn build_summarizer(
    config: &Config,
    drive: Arc<dyn DriveStorage>,
) -> Result<Option<Arc<dyn Summarizer>>, BotError> {
    let settings = &config.summarizer;
    let timeout = config.summarizer_timeout();

    let summarizer: Option<Arc<dyn Summarizer>> = match settings.provider {
        SummarizerProvider::None => None,
        SummarizerProvider::Remote => {
            let endpoint = settings.endpoint.clone().unwrap_or_default();
            Some(Arc::new(RemoteSummarizer::new(endpoint, settings.api_key.clone(), timeout)?))
        }
        SummarizerProvider::Groq => {
            let api_key = settings.groq_api_key.clone().unwrap_or_default();
            Some(Arc::new(GroqSummarizer::new(
                api_key,
                settings.groq_model.as_deref(),
                drive,
                timeout,
            )?))
        }
    };

    match &summarizer {
        Some(s) => tracing::info!("Using {} for SUMMARY", s.name()),
        None => tracing::warn!("No summarizer configured, SUMMARY will reply with an error"),
    }
    Ok(summarizer)
}

async fn serve(config: Config) -> Result<(), BotError> {
    let dispatcher = build_dispatcher(&config).await?;
    let mut state = AppState::new(dispatcher);
    state.recent_limit = config.dispatch.recent_limit;

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    twilio::serve(listener, state, shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn print_logs(config: &Config, limit: usize) -> Result<(), BotError> {
    let db = Database::new(&config.database.path).map_err(StorageError::from)?;
    let entries = db.query_recent(limit).await?;

    if entries.is_empty() {
        println!("No commands logged yet.");
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{}  {:<7}  {:<6}  {}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.status.as_str(),
            entry.command,
            entry.sender,
            entry.details.replace('\n', " | "),
        );
    }

    let stats = LogStats::from_entries(&entries);
    println!(
        "\n{} shown: {} success, {} pending, {} error",
        stats.total, stats.success, stats.pending, stats.error
    );
    Ok(())
}

fn init_config(path: &str) -> Result<(), BotError> {
    if Path::new(path).exists() {
        return Err(BotError::Internal(format!("{} already exists, not overwriting", path)));
    }

    let yaml = Config::default().to_yaml()?;
    std::fs::write(path, yaml)?;
    println!("Wrote default config to {}", path);
    Ok(())
}
