use std::time::Duration;

use crate::constants::{
    CORS_ALLOWED_ORIGINS, DATABASE_CONNECT_RETRIES, DATABASE_URL, MAX_BODY_SIZE_BYTES,
    RATE_LIMIT_BURST, RATE_LIMIT_PER_MINUTE, REQUEST_TIMEOUT_SECS, SHUTDOWN_TIMEOUT_SECS,
    USER_STORE,
};

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone)]
pub struct MiddlewareConfig {
    pub rate_limit_per_minute: u32,
    pub rate_limit_burst: u32,
    pub request_timeout: Duration,
    pub max_body_size: usize,
    pub shutdown_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: 100,
            rate_limit_burst: 150,
            request_timeout: Duration::from_secs(30),
            max_body_size: 1_048_576, // 1MB
            shutdown_timeout: Duration::from_secs(30),
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

impl MiddlewareConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        // A zero rate would divide by zero when computing the replenish interval.
        let rate_limit_per_minute = env_or(RATE_LIMIT_PER_MINUTE, default.rate_limit_per_minute).max(1);
        let rate_limit_burst = env_or(RATE_LIMIT_BURST, default.rate_limit_burst).max(1);
        let request_timeout_secs: u64 = env_or(REQUEST_TIMEOUT_SECS, 30);
        let max_body_size = env_or(MAX_BODY_SIZE_BYTES, default.max_body_size);
        let shutdown_timeout_secs: u64 = env_or(SHUTDOWN_TIMEOUT_SECS, 30);

        let cors_allowed_origins = std::env::var(CORS_ALLOWED_ORIGINS)
            .ok()
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(default.cors_allowed_origins);

        Self {
            rate_limit_per_minute,
            rate_limit_burst,
            request_timeout: Duration::from_secs(request_timeout_secs),
            max_body_size,
            shutdown_timeout: Duration::from_secs(shutdown_timeout_secs),
            cors_allowed_origins,
        }
    }

    /// Milliseconds between replenished rate-limit tokens.
    pub fn replenish_interval_ms(&self) -> u64 {
        (60_000 / self.rate_limit_per_minute.max(1) as u64).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    MySql { database_url: String, connect_retries: u32 },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

impl StoreConfig {
    /// Load the store selection from environment variables.
    /// `USER_STORE` defaults to `mysql`, which requires `DATABASE_URL`.
    pub fn from_env() -> Result<Self, String> {
        let kind = std::env::var(USER_STORE).unwrap_or_else(|_| "mysql".to_string());

        let backend = match kind.trim().to_lowercase().as_str() {
            "mysql" => {
                let database_url = std::env::var(DATABASE_URL)
                    .map_err(|_| format!("{} environment variable must be set", DATABASE_URL))?;
                if database_url.is_empty() {
                    return Err(format!("{} cannot be empty", DATABASE_URL));
                }
                StoreBackend::MySql {
                    database_url,
                    connect_retries: env_or(DATABASE_CONNECT_RETRIES, 10),
                }
            }
            "memory" => StoreBackend::Memory,
            other => {
                return Err(format!(
                    "{} must be 'mysql' or 'memory', got '{}'",
                    USER_STORE, other
                ))
            }
        };

        Ok(Self { backend })
    }

    pub fn name(&self) -> &'static str {
        match self.backend {
            StoreBackend::MySql { .. } => "mysql",
            StoreBackend::Memory => "memory",
        }
    }
}
