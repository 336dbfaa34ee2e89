use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Test,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub bcrypt_work_factor: u32,
}

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/jobly";
const TEST_DATABASE_NAME: &str = "jobly_test";
const DEV_JWT_SECRET: &str = "secret-dev";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("test") => Environment::Test,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Test => Self::test(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if self.environment == Environment::Test {
            if let Some(url) = swap_database_name(&self.database.url, TEST_DATABASE_NAME) {
                self.database.url = url;
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Ok(v) = env::var("PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("SECRET_KEY") {
            if !v.is_empty() {
                self.security.jwt_secret = v;
            }
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("BCRYPT_WORK_FACTOR") {
            self.security.bcrypt_work_factor = v.parse().unwrap_or(self.security.bcrypt_work_factor);
        }

        self
    }

    /// Production still signing tokens with the development secret, i.e. SECRET_KEY was never set.
    pub fn uses_dev_secret_in_production(&self) -> bool {
        self.environment == Environment::Production && self.security.jwt_secret == DEV_JWT_SECRET
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 3001,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                bcrypt_work_factor: 12,
            },
        }
    }

    fn test() -> Self {
        Self {
            environment: Environment::Test,
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: 5,
                connection_timeout: 10,
            },
            api: ApiConfig {
                port: 3001,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 1,
                // bcrypt's minimum cost; keeps the suite fast
                bcrypt_work_factor: 4,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                port: 3001,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 4,
                bcrypt_work_factor: 12,
            },
        }
    }
}

/// Replace the database name (URL path) of a Postgres connection string.
fn swap_database_name(base: &str, database_name: &str) -> Option<String> {
    let mut url = url::Url::parse(base).ok()?;
    url.set_path(&format!("/{}", database_name));
    Some(url.into())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
