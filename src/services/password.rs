/*
 * Responsibility
 * - Argon2 (PHC string) でのパスワードハッシュ化と照合
 * - CPU を食うので呼び出し側は spawn_blocking 経由で使う
 */
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to gather salt entropy: {0}")]
    Entropy(getrandom::Error),
    #[error("password hashing failed: {0}")]
    Hash(password_hash::Error),
    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub fn hash(password: &str) -> Result<String, PasswordError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::fill(&mut salt_bytes).map_err(PasswordError::Entropy)?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(PasswordError::Hash)?;

    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(PasswordError::Hash)?
        .to_string();

    Ok(phc)
}

/// `false` for a wrong password and for a stored value that is not a PHC string.
pub fn matches(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

pub async fn hash_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash(&password)).await?
}

pub async fn matches_blocking(password: String, phc: String) -> Result<bool, PasswordError> {
    Ok(tokio::task::spawn_blocking(move || matches(&password, &phc)).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_match() {
        let phc = hash("s3cret-pass").unwrap();
        assert!(phc.starts_with("$argon2"));
        assert!(matches("s3cret-pass", &phc));
        assert!(!matches("wrong-pass", &phc));
    }

    #[test]
    fn salts_differ() {
        assert_ne!(hash("same").unwrap(), hash("same").unwrap());
    }

    #[test]
    fn garbage_hash_never_matches() {
        assert!(!matches("anything", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn blocking_wrappers_agree() {
        let phc = hash_blocking("s3cret-pass".to_string()).await.unwrap();
        assert!(
            matches_blocking("s3cret-pass".to_string(), phc)
                .await
                .unwrap()
        );
    }
}
