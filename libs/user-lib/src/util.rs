use std::{str::FromStr, time::Duration};

use sqlx::{mysql::{MySqlConnectOptions, MySqlPoolOptions}, MySqlPool};

use crate::repository::errors::{map_sqlx_error, UserRepositoryError};

/// Embedded schema migrations for the `users` collection.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Open a MySQL pool, retrying once per second while the server comes up.
pub async fn connect_with_retry(
    database_url: &str,
    max_retries: u32,
) -> Result<MySqlPool, UserRepositoryError> {
    let mut retries = 0;

    let connect_options = MySqlConnectOptions::from_str(database_url).map_err(map_sqlx_error)?;

    loop {
        match MySqlPoolOptions::new()
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(connect_options.clone())
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) if retries < max_retries => {
                tracing::warn!(attempt = retries + 1, error = %e, "MySQL not ready yet");
                retries += 1;
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            Err(e) => {
                tracing::error!(retries = max_retries, error = %e, "failed to connect to MySQL");
                return Err(UserRepositoryError::Unavailable(e));
            }
        }
    }
}

/// Apply pending migrations.
pub async fn run_migrations(pool: &MySqlPool) -> Result<(), UserRepositoryError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| UserRepositoryError::Sqlx(e.into()))
}
