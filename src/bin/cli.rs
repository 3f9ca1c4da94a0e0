use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use trivia_api::config::DatabaseSettings;
use trivia_api::db::transfer::{export_data, import_data};
use trivia_api::db::{establish_connection, run_migrations};
use trivia_api::telemetry::{init_tracing, CLI_LOG_FILTER};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database url, e.g. sqlite:trivia.db
    database_url: String,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import categories.csv and questions.csv from a directory
    Import { path: PathBuf },
    /// Export categories.csv and questions.csv into a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(CLI_LOG_FILTER);
    let cli = Cli::parse();
    let settings = DatabaseSettings {
        url: SecretString::from(cli.database_url),
        max_connections: 1,
    };
    let pool = establish_connection(&settings).await?;
    run_migrations(&pool).await?;
    match cli.command {
        Commands::Export { path } => export_data(&pool, &path).await?,
        Commands::Import { path } => import_data(&pool, &path).await?,
    }
    Ok(())
}
