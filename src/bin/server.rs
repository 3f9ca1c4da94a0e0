use anyhow::Context;
use clap::Parser;
use trivia_api::config::get_configuration;
use trivia_api::db::{establish_connection, run_migrations};
use trivia_api::server::app::run_server;
use trivia_api::telemetry::{init_tracing, SERVER_LOG_FILTER};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Address to bind, overrides the configured host
    #[clap(long)]
    host: Option<String>,
    /// Port to listen on, overrides the configured port
    #[clap(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(SERVER_LOG_FILTER);
    let cli = Cli::parse();
    let mut settings = get_configuration().context("Failed to read configuration")?;
    if let Some(host) = cli.host {
        settings.application.host = host;
    }
    if let Some(port) = cli.port {
        settings.application.port = port;
    }

    let pool = establish_connection(&settings.database)
        .await
        .context("Failed to connect to the database")?;

    tracing::info!("Running db migrations...");
    run_migrations(&pool).await?;

    run_server(pool, &settings.application.address()).await
}
