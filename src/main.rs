use std::path::{Path, PathBuf};

use archivist::{
    config::{self, ArchivistConfig},
    db::DbPool,
    observability,
    retention::{PurgeEngine, StatusService},
};
use clap::Parser;

type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Config file looked up in the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "archivist.toml";

/// CLI arguments for the archive retention tool
#[derive(Parser, Debug)]
#[command(version, about = "Article archive retention and purge", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (defaults to ./archivist.toml if it exists,
    /// otherwise built-in defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Delete unprotected articles published more than N days ago
    Purge {
        /// Age threshold in days (defaults to retention.default_days)
        #[arg(short, long)]
        days: Option<u32>,
    },
    /// Delete exactly N of the oldest unprotected dated articles
    Trim {
        /// Number of articles to delete
        #[arg(short = 'n', long)]
        count: u64,
    },
    /// Show archive counts relative to an age cutoff
    Status {
        /// Age threshold in days (defaults to retention.default_days)
        #[arg(short, long)]
        days: Option<u32>,
        /// Print the report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Run database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let tracing_guard = match observability::init_tracing(&config.observability) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match run(args.command, &config).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            1
        }
    };

    // Flush file logs before exiting
    drop(tracing_guard);
    std::process::exit(code);
}

/// Load the explicit config file, else `./archivist.toml`, else defaults.
fn load_config(explicit: Option<&Path>) -> Result<ArchivistConfig, config::ConfigError> {
    if let Some(path) = explicit {
        return ArchivistConfig::from_file(path);
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        ArchivistConfig::from_file(default_path)
    } else {
        Ok(ArchivistConfig::default())
    }
}

async fn run(command: Command, config: &ArchivistConfig) -> CliResult<()> {
    if config.database.is_none() {
        return Err("Database is not configured. Add a [database] section to the config file.".into());
    }

    let db = DbPool::from_config(&config.database).await?;
    if config.database.run_migrations() || matches!(command, Command::Migrate) {
        db.run_migrations().await?;
    }

    let outcome = run_command(command, config, &db).await;
    db.close().await;
    outcome
}

async fn run_command(command: Command, config: &ArchivistConfig, db: &DbPool) -> CliResult<()> {
    let default_days = config.retention.default_days;

    match command {
        Command::Migrate => {
            tracing::info!("Database migrations complete");
        }
        Command::Purge { days } => {
            let days = days.unwrap_or(default_days);
            let engine = PurgeEngine::from_pool(db, &config.retention)?;
            let result = engine.purge_by_age(days).await?;
            tracing::info!(
                deleted = result.deleted_count,
                cutoff_date = %result.cutoff_date,
                "Deleted {} articles published before {}",
                result.deleted_count,
                result.cutoff_date
            );
            StatusService::from_pool(db)
                .archive_status(days)
                .await?
                .log();
        }
        Command::Trim { count } => {
            let engine = PurgeEngine::from_pool(db, &config.retention)?;
            let result = engine.purge_by_count(count).await?;
            if result.found_count < result.requested_count {
                tracing::warn!(
                    requested = result.requested_count,
                    found = result.found_count,
                    "Fewer eligible articles than requested"
                );
            }
            tracing::info!(
                requested = result.requested_count,
                found = result.found_count,
                deleted = result.deleted_count,
                "Trimmed {} of the oldest articles",
                result.deleted_count
            );
            StatusService::from_pool(db)
                .archive_status(default_days)
                .await?
                .log();
        }
        Command::Status { days, json } => {
            let status = StatusService::from_pool(db)
                .archive_status(days.unwrap_or(default_days))
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("Cutoff date:             {}", status.cutoff_date);
                println!("Total articles:          {}", status.total_articles);
                println!("Irrelevant articles:     {}", status.irrelevant_articles);
                println!("Approved articles:       {}", status.approved_articles);
                println!("Older than cutoff:       {}", status.old_articles);
                println!("Deletable older:         {}", status.deletable_old_articles);
            }
        }
    }

    Ok(())
}
