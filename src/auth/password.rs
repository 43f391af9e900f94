use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;
use tokio::task;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] task::JoinError),
}

#[cfg(not(test))]
const COST: u32 = DEFAULT_COST;
#[cfg(test)]
const COST: u32 = 4;

/// bcrypt is CPU-bound, so both helpers run on the blocking pool.
pub async fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let plain = plain.to_string();
    Ok(task::spawn_blocking(move || hash(plain, COST)).await??)
}

/// `Ok(false)` for a wrong password; `Err` only when the stored hash is unreadable
pub async fn verify_password(plain: &str, hashed: &str) -> Result<bool, PasswordError> {
    let (plain, hashed) = (plain.to_string(), hashed.to_string());
    Ok(task::spawn_blocking(move || verify(plain, &hashed)).await??)
}
