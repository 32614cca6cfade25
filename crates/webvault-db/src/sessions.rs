//! Session repository implementation.
//!
//! Sessions are issued by the external identity provider; this layer only
//! knows how to revoke them on sign-out.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use webvault_core::{Error, Result, SessionRepository};

/// PostgreSQL implementation of SessionRepository.
pub struct PgSessionRepository {
    pool: Pool<Postgres>,
}

impl PgSessionRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn revoke(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM session WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
