use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};

/// Tokens issued on behalf of the identity provider, mapped to user ids.
#[derive(Clone)]
pub struct SessionRepository {
    pool: DbPool,
}

impl SessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new session for a user. Returns the session token.
    pub async fn create(&self, user_id: &str, ttl: chrono::Duration) -> Result<String> {
        let pool = self.pool.clone();
        let token = Uuid::new_v4().to_string();
        let user_id = user_id.to_string();
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Validation(format!("session ttl out of range: {ttl}")))?;

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
                rusqlite::params![token, user_id, now, expires_at],
            )?;
            Ok(token)
        })
        .await?
    }

    /// Find a valid (non-expired) session and return its user_id.
    /// Lazily deletes the session if it has expired.
    pub async fn find_valid(&self, token: &str) -> Result<Option<String>> {
        let pool = self.pool.clone();
        let token = token.to_string();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let result: Option<(String, chrono::DateTime<Utc>)> = conn
                .query_row(
                    "SELECT user_id, expires_at FROM sessions WHERE token = ?",
                    [&token],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            match result {
                Some((_, expires_at)) if expires_at <= now => {
                    conn.execute("DELETE FROM sessions WHERE token = ?", [&token])?;
                    Ok(None)
                }
                Some((user_id, _)) => Ok(Some(user_id)),
                None => Ok(None),
            }
        })
        .await?
    }

    pub async fn delete(&self, token: &str) -> Result<()> {
        let pool = self.pool.clone();
        let token = token.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute("DELETE FROM sessions WHERE token = ?", [&token])?;
            Ok(())
        })
        .await?
    }

    /// Batch delete all expired sessions. Returns how many were removed.
    pub async fn cleanup_expired(&self) -> Result<usize> {
        let pool = self.pool.clone();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let removed = conn.execute(
                "DELETE FROM sessions WHERE expires_at <= ?",
                rusqlite::params![now],
            )?;
            Ok(removed)
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;

    fn setup_repo() -> SessionRepository {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        SessionRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_find_valid() {
        let repo = setup_repo();
        let token = repo.create("user1", chrono::Duration::days(7)).await.unwrap();

        assert_eq!(
            repo.find_valid(&token).await.unwrap(),
            Some("user1".to_string())
        );
        assert_eq!(repo.find_valid("unknown").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_rejects_unrepresentable_ttl() {
        let repo = setup_repo();
        let result = repo.create("user1", chrono::TimeDelta::MAX).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(repo.cleanup_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_and_removed() {
        let repo = setup_repo();
        let token = repo
            .create("user1", chrono::Duration::seconds(-1))
            .await
            .unwrap();

        assert_eq!(repo.find_valid(&token).await.unwrap(), None);
        assert_eq!(repo.cleanup_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_expired_keeps_live_sessions() {
        let repo = setup_repo();
        let live = repo.create("user1", chrono::Duration::days(1)).await.unwrap();
        repo.create("user2", chrono::Duration::seconds(-1))
            .await
            .unwrap();

        assert_eq!(repo.cleanup_expired().await.unwrap(), 1);
        assert!(repo.find_valid(&live).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup_repo();
        let token = repo.create("user1", chrono::Duration::days(1)).await.unwrap();

        repo.delete(&token).await.unwrap();
        assert_eq!(repo.find_valid(&token).await.unwrap(), None);
    }
}
