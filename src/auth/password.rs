use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("password worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Hash a password with the configured bcrypt work factor.
///
/// bcrypt is CPU bound, so the work happens on the blocking pool.
pub async fn hash_password(password: String) -> Result<String, PasswordError> {
    // bcrypt refuses costs below 4
    let cost = config::config().security.bcrypt_work_factor.max(4);
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

/// Check `password` against a stored bcrypt hash.
pub async fn verify_password(password: String, hash: String) -> Result<bool, PasswordError> {
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(valid)
}
