use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mygram_api::config::AppConfig;
use mygram_api::database::{DatabaseManager, InMemoryStore, PgStore, Store};
use mygram_api::state::AppState;

#[derive(Parser)]
#[command(name = "mygram-api")]
#[command(about = "MyGram photo sharing API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Port to listen on, overrides PORT / MYGRAM_API_PORT
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep all data in process memory instead of PostgreSQL
        #[arg(long)]
        in_memory: bool,

        /// Do not create missing tables on startup
        #[arg(long)]
        skip_migrate: bool,
    },
    /// Create the database tables and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up PG* and JWT_SECRET
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve {
        port: None,
        in_memory: false,
        skip_migrate: false,
    });

    match command {
        Commands::Serve {
            port,
            in_memory,
            skip_migrate,
        } => serve(port, in_memory, skip_migrate).await,
        Commands::Migrate => {
            let config = AppConfig::from_env().context("invalid configuration")?;
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            tracing::info!("Database schema is up to date");
            Ok(())
        }
    }
}

async fn serve(port: Option<u16>, in_memory: bool, skip_migrate: bool) -> anyhow::Result<()> {
    let mut config = if in_memory {
        AppConfig::from_env_in_memory()
    } else {
        AppConfig::from_env()
    }
    .context("invalid configuration")?;

    if let Some(port) = port {
        config.api.port = port;
    }
    tracing::info!("Starting MyGram API in {:?} mode", config.environment);

    let store: Arc<dyn Store> = if in_memory {
        tracing::warn!("Using in-memory store, data is lost on shutdown");
        Arc::new(InMemoryStore::new())
    } else {
        let pool = DatabaseManager::connect(&config.database).await?;
        if !skip_migrate {
            DatabaseManager::migrate(&pool).await?;
        }
        Arc::new(PgStore::new(pool))
    };

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(store, config).context("failed to initialise token service")?;
    let app = mygram_api::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("MyGram API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
