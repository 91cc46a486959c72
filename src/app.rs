use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{str::FromStr, sync::Arc, time::Duration};
use tracing::info;

use crate::{
    adapters::outbound::persistence::{
        InMemoryDocumentStore, SqlDocumentStore, StoreReferenceResolver,
    },
    domain::models::{PackageDetails, RecipientDetails},
    ports::storage::{DocumentStore, ReferenceResolver},
    services::{
        AllocatorConfig, AttachmentServiceImpl, BulkServiceImpl, DEFAULT_MAX_ATTEMPTS,
        RecordServiceImpl,
    },
};

/// How long a connection waits for another writer before failing
const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the application
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub repository_backend: RepositoryBackend,
    pub allocator: AllocatorConfig,
}

/// Repository backend configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RepositoryBackend {
    #[default]
    InMemory,
    Sqlite {
        url: String,
    },
}

/// Application dependencies container
pub struct AppDependencies {
    pub recipient_store: Arc<dyn DocumentStore<RecipientDetails>>,
    pub package_store: Arc<dyn DocumentStore<PackageDetails>>,
    pub recipient_resolver: Arc<dyn ReferenceResolver>,
}

/// Application services container
pub struct AppServices {
    pub recipient_service: RecordServiceImpl<RecipientDetails>,
    pub recipient_bulk_service: BulkServiceImpl<RecipientDetails>,
    pub recipient_attachment_service: AttachmentServiceImpl<RecipientDetails>,
    pub package_service: RecordServiceImpl<PackageDetails>,
    pub package_bulk_service: BulkServiceImpl<PackageDetails>,
    pub package_attachment_service: AttachmentServiceImpl<PackageDetails>,
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure repository backend
    pub fn with_repository_backend(mut self, backend: RepositoryBackend) -> Self {
        self.config.repository_backend = backend;
        self
    }

    /// Configure the identifier allocation retry policy
    pub fn with_allocator(mut self, allocator: AllocatorConfig) -> Self {
        self.config.allocator = allocator;
        self
    }

    /// Build the application dependencies
    pub async fn build_dependencies(self) -> Result<AppDependencies, AppError> {
        let (recipient_store, package_store) = self.create_stores().await?;
        let recipient_resolver: Arc<dyn ReferenceResolver> =
            Arc::new(StoreReferenceResolver::new(recipient_store.clone()));

        Ok(AppDependencies {
            recipient_store,
            package_store,
            recipient_resolver,
        })
    }

    /// Build the complete application with services
    pub async fn build(self) -> Result<AppServices, AppError> {
        let allocator = self.config.allocator;
        let deps = self.build_dependencies().await?;
        Ok(AppServices::from_dependencies(deps, allocator))
    }

    /// Create one store per collection based on configuration
    async fn create_stores(
        &self,
    ) -> Result<
        (
            Arc<dyn DocumentStore<RecipientDetails>>,
            Arc<dyn DocumentStore<PackageDetails>>,
        ),
        AppError,
    > {
        match &self.config.repository_backend {
            RepositoryBackend::InMemory => {
                info!("Using in-memory collections");
                Ok((
                    Arc::new(InMemoryDocumentStore::new()),
                    Arc::new(InMemoryDocumentStore::new()),
                ))
            }
            RepositoryBackend::Sqlite { url } => {
                info!(url = %url, "Connecting to SQLite");
                let mut options = SqlitePoolOptions::new();
                if url.contains(":memory:") {
                    // Every connection would otherwise open its own empty database
                    options = options.max_connections(1);
                }
                let connect_options = SqliteConnectOptions::from_str(url)
                    .map_err(|e| AppError::Configuration {
                        message: format!("Invalid DATABASE_URL {}: {}", url, e),
                    })?
                    .create_if_missing(true)
                    .busy_timeout(SQLITE_BUSY_TIMEOUT);
                let pool = options
                    .connect_with(connect_options)
                    .await
                    .map_err(|e| AppError::RepositoryInit {
                        message: format!("Failed to connect to {}: {}", url, e),
                    })?;

                let recipients = SqlDocumentStore::<RecipientDetails>::new(pool.clone());
                let packages = SqlDocumentStore::<PackageDetails>::new(pool);
                for result in [recipients.migrate().await, packages.migrate().await] {
                    result.map_err(|e| AppError::RepositoryInit {
                        message: format!("Failed to create tables: {}", e),
                    })?;
                }

                Ok((Arc::new(recipients), Arc::new(packages)))
            }
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppServices {
    /// Wire services over already-created stores
    pub fn from_dependencies(deps: AppDependencies, allocator: AllocatorConfig) -> Self {
        let recipient_service = RecordServiceImpl::new(deps.recipient_store.clone(), allocator);
        let package_service = RecordServiceImpl::new(deps.package_store.clone(), allocator)
            .with_reference_resolver(deps.recipient_resolver);

        AppServices {
            recipient_bulk_service: BulkServiceImpl::new(recipient_service.clone()),
            recipient_attachment_service: AttachmentServiceImpl::new(deps.recipient_store),
            recipient_service,
            package_bulk_service: BulkServiceImpl::new(package_service.clone()),
            package_attachment_service: AttachmentServiceImpl::new(deps.package_store),
            package_service,
        }
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Repository initialization error: {message}")]
    RepositoryInit { message: String },
}

/// Convenience functions for common configurations
///
/// Create an in-memory application for testing and development
pub async fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_repository_backend(RepositoryBackend::InMemory)
        .build()
        .await
}

/// Create a SQLite-backed application
pub async fn create_sqlite_app(url: String) -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_repository_backend(RepositoryBackend::Sqlite { url })
        .build()
        .await
}

/// Create application from environment variables
pub async fn create_app_from_env() -> Result<AppServices, AppError> {
    let repository_backend = match std::env::var("REPOSITORY_BACKEND").as_deref() {
        Ok("sqlite") => {
            let url = std::env::var("DATABASE_URL").map_err(|_| AppError::Configuration {
                message: "DATABASE_URL environment variable required".to_string(),
            })?;
            RepositoryBackend::Sqlite { url }
        }
        Ok("memory") | Err(_) => RepositoryBackend::InMemory,
        Ok(other) => {
            return Err(AppError::Configuration {
                message: format!("Unknown REPOSITORY_BACKEND '{}'", other),
            });
        }
    };

    let max_attempts = match std::env::var("ALLOCATION_MAX_ATTEMPTS") {
        Ok(value) => value.parse::<u32>().map_err(|_| AppError::Configuration {
            message: format!("ALLOCATION_MAX_ATTEMPTS must be a positive integer, got '{}'", value),
        })?,
        Err(_) => DEFAULT_MAX_ATTEMPTS,
    };

    AppBuilder::new()
        .with_repository_backend(repository_backend)
        .with_allocator(AllocatorConfig::new(max_attempts))
        .build()
        .await
}
