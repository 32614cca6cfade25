//! Audit log repository implementation.
//!
//! Rows are written once by admin mutation paths and never updated.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use webvault_core::{new_v7, AuditLog, AuditLogRepository, Error, Result};

/// PostgreSQL implementation of AuditLogRepository.
pub struct PgAuditLogRepository {
    pool: Pool<Postgres>,
}

impl PgAuditLogRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    async fn record(
        &self,
        actor: &str,
        action: &str,
        entity_type: &str,
        entity_id: &str,
        changes: JsonValue,
    ) -> Result<Uuid> {
        let id = new_v7();

        sqlx::query(
            "INSERT INTO audit_log (id, actor, action, entity_type, entity_id, changes, created_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id)
        .bind(actor)
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .bind(changes)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<AuditLog>> {
        let rows = sqlx::query(
            "SELECT id, actor, action, entity_type, entity_id, changes, created_at_utc
             FROM audit_log
             ORDER BY created_at_utc DESC, id DESC
             LIMIT $1",
        )
        .bind(limit.clamp(1, 500))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| AuditLog {
                id: row.get("id"),
                actor: row.get("actor"),
                action: row.get("action"),
                entity_type: row.get("entity_type"),
                entity_id: row.get("entity_id"),
                changes: row.get("changes"),
                created_at_utc: row.get("created_at_utc"),
            })
            .collect())
    }
}
