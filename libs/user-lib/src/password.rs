use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use secrecy::{ExposeSecret, SecretString};

use crate::errors_service::UserServiceError;

fn argon2_hash(password: &SecretString) -> Result<String, UserServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|e| UserServiceError::Internal(anyhow::anyhow!("failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Hashes a credential into an Argon2id PHC string with a fresh random salt.
/// The key derivation runs on the blocking pool so request workers stay free.
pub async fn hash_password(password: &SecretString) -> Result<String, UserServiceError> {
    let password = password.clone();
    tokio::task::spawn_blocking(move || argon2_hash(&password))
        .await
        .map_err(|e| UserServiceError::Internal(anyhow::anyhow!("password hashing task failed: {e}")))?
}
