use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::auth::password::PasswordError;
use crate::config;
use crate::filter::FilterError;

/// Errors raised by the pool manager and the repositories
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("Invalid username/password")]
    InvalidCredentials,

    #[error("No data")]
    EmptyUpdate,

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Process-wide connection pool, created on first use and closed on shutdown
pub struct DatabaseManager {
    pool: RwLock<Option<PgPool>>,
}

impl DatabaseManager {
    fn instance() -> &'static DatabaseManager {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<DatabaseManager> = OnceLock::new();
        INSTANCE.get_or_init(|| DatabaseManager {
            pool: RwLock::new(None),
        })
    }

    /// Get the application pool, connecting lazily
    pub async fn pool() -> Result<PgPool, DatabaseError> {
        Self::instance().get_pool().await
    }

    async fn get_pool(&self) -> Result<PgPool, DatabaseError> {
        // Fast path: try read lock
        {
            let pool = self.pool.read().await;
            if let Some(pool) = pool.as_ref() {
                return Ok(pool.clone());
            }
        }

        let mut slot = self.pool.write().await;
        // Another task may have connected while we waited for the write lock
        if let Some(pool) = slot.as_ref() {
            return Ok(pool.clone());
        }

        let settings = &config::config().database;
        let connection_string = Self::validate_connection_string(&settings.url)?;
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.connection_timeout))
            .connect(&connection_string)
            .await?;

        *slot = Some(pool.clone());
        info!("Created database pool for: {}", Self::redacted(&connection_string));
        Ok(pool)
    }

    fn validate_connection_string(raw: &str) -> Result<String, DatabaseError> {
        if raw.is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }
        let url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }
        Ok(url.into())
    }

    /// Connection string without credentials, for logs
    fn redacted(connection_string: &str) -> String {
        match url::Url::parse(connection_string) {
            Ok(mut url) => {
                let _ = url.set_password(None);
                url.into()
            }
            Err(_) => "<invalid url>".to_string(),
        }
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Close and forget the pool (e.g., on shutdown)
    pub async fn close_all() {
        let manager = Self::instance();
        let mut slot = manager.pool.write().await;
        if let Some(pool) = slot.take() {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}
