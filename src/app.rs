//! Service wiring from configuration.

use std::sync::Arc;

use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

use warden_auth::{CounterReporter, LoginService, RandomTokenGenerator, SessionValidator};
use warden_cache::SessionStoreManager;
use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::{AuthReporter, Clock, SessionStore, SystemClock, TokenGenerator};
use warden_database::{CredentialRepository, CredentialStore, DatabasePool, MemoryCredentialStore};

/// The services a command runs against.
pub struct App {
    pub login: LoginService,
    pub sessions: SessionValidator,
    reporter: Arc<CounterReporter>,
    pool: Option<DatabasePool>,
}

impl App {
    /// Connect the configured stores and build the services over them.
    pub async fn build(config: &AppConfig) -> AppResult<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let tokens: Arc<dyn TokenGenerator> = Arc::new(RandomTokenGenerator::new());
        let reporter = Arc::new(CounterReporter::new());
        let reporter_seam: Arc<dyn AuthReporter> = reporter.clone();

        let (credentials, pool): (Arc<dyn CredentialStore>, Option<DatabasePool>) =
            match config.database.provider.as_str() {
                "postgres" => {
                    let pool = DatabasePool::connect(&config.database).await?;
                    pool.ensure_schema().await?;
                    let repo = CredentialRepository::new(pool.pool().clone());
                    (Arc::new(repo), Some(pool))
                }
                "memory" => (Arc::new(MemoryCredentialStore::new()), None),
                other => {
                    return Err(AppError::configuration(format!(
                        "Unknown credential store provider: '{other}'. Supported: memory, postgres"
                    )));
                }
            };

        let sessions: Arc<dyn SessionStore> =
            Arc::new(SessionStoreManager::new(&config.cache, clock.clone()).await?);

        info!(
            credentials = %config.database.provider,
            sessions = sessions.backend_name(),
            "Services initialized"
        );

        Ok(Self {
            login: LoginService::new(
                credentials,
                clock.clone(),
                tokens.clone(),
                reporter_seam.clone(),
                config.auth.clone(),
            ),
            sessions: SessionValidator::new(
                sessions,
                tokens,
                clock,
                reporter_seam,
                config.session.clone(),
            ),
            reporter,
            pool,
        })
    }

    /// Release store connections.
    pub async fn shutdown(self) {
        debug!(outcomes = ?self.reporter.snapshot(), "Operation outcomes");
        if let Some(pool) = self.pool {
            pool.close().await;
        }
    }
}

/// Load configuration, mapping failures to a configuration error.
pub fn load_config(config_path: &str) -> AppResult<AppConfig> {
    AppConfig::load(config_path)
        .map_err(|e| AppError::configuration(format!("Failed to load config: {}", e.message)))
}

/// Initialize tracing/logging on stderr, leaving stdout to command output.
pub fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
