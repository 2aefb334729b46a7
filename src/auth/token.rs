use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::AppResult;

const TOKEN_LEN: usize = 40;

/// Generate a fresh opaque bearer token.
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Compute SHA-256 hash of a raw token string, returned as lowercase hex.
/// Only the hash is ever stored.
pub fn hash_token(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Issue a token for an account: generate, store the hash, return the raw
/// token for the client.
pub async fn issue_token(db: &sqlx::PgPool, account_id: Uuid) -> AppResult<String> {
    let raw_token = generate_token();
    let token_hash = hash_token(&raw_token);

    sqlx::query(
        r#"
        INSERT INTO auth_tokens (id, account_id, token_hash, created_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(account_id)
    .bind(&token_hash)
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(raw_token)
}

/// Delete the token row for a presented token hash. Idempotent.
pub async fn revoke_token(db: &sqlx::PgPool, token_hash: &str) -> AppResult<()> {
    sqlx::query("DELETE FROM auth_tokens WHERE token_hash = $1")
        .bind(token_hash)
        .execute(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_deterministic() {
        let token = "test-bearer-token-value";
        let h1 = hash_token(token);
        let h2 = hash_token(token);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64); // SHA-256 hex = 64 chars
    }

    #[test]
    fn test_hash_token_different_inputs() {
        let h1 = hash_token("token-a");
        let h2 = hash_token("token-b");
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_generated_tokens_are_unique_and_sized() {
        let t1 = generate_token();
        let t2 = generate_token();
        assert_eq!(t1.len(), TOKEN_LEN);
        assert_ne!(t1, t2);
    }
}
