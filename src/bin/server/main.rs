use anyhow::{Context, Result};
use clap::Parser;
use parcel_records::{
    adapters::inbound::http::router::{AppState, create_router},
    app::{AppBuilder, AppConfig, RepositoryBackend},
    services::{AllocatorConfig, DEFAULT_MAX_ATTEMPTS},
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "parcel-records-server")]
#[command(about = "HTTP server for recipient and package records", long_about = None)]
struct Cli {
    /// Server port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value = "3000")]
    port: u16,

    /// Server host to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Repository backend type (memory or sqlite)
    #[arg(long, env = "REPOSITORY_BACKEND", default_value = "memory")]
    repository_backend: String,

    /// Database URL for the sqlite backend
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Attempts made to allocate an identifier before reporting a conflict
    #[arg(long, env = "ALLOCATION_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    allocation_max_attempts: u32,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn to_app_config(&self) -> Result<AppConfig> {
        let repository_backend = match self.repository_backend.as_str() {
            "memory" => RepositoryBackend::InMemory,
            "sqlite" => {
                let url = self
                    .database_url
                    .clone()
                    .context("DATABASE_URL is required for sqlite backend")?;
                RepositoryBackend::Sqlite { url }
            }
            _ => anyhow::bail!("Unknown repository backend: {}", self.repository_backend),
        };

        Ok(AppConfig {
            repository_backend,
            allocator: AllocatorConfig::new(self.allocation_max_attempts),
        })
    }

    fn env_filter(&self) -> EnvFilter {
        let level = match self.log_level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "warn" => "warn",
            "error" => "error",
            _ => "info",
        };

        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("parcel_records={level},tower_http={level}"))
        })
    }

    fn init_logging(&self) -> Result<()> {
        tracing_subscriber::registry()
            .with(self.env_filter())
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .context("Failed to install tracing subscriber")?;

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    info!("Starting parcel records server");
    info!("Repository backend: {}", cli.repository_backend);

    let config = cli.to_app_config()?;
    let app_services = AppBuilder::new()
        .with_config(config)
        .build()
        .await
        .context("Failed to build application")?;

    let router = create_router(AppState::from(app_services));

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, router)
        .await
        .context("Failed to start server")?;

    Ok(())
}
