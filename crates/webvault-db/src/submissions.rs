//! Submission request repository implementation.
//!
//! Submissions are the audit trail for user-proposed websites: the raw
//! payload is stored as JSON and only becomes a website row when an admin
//! approves it. The review runs in one transaction so a submission can
//! never be marked approved without its website row existing.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use webvault_core::{
    new_v7, CreateWebsiteInput, Error, ListSubmissionsResponse, PageParams, Result,
    SubmissionRepository, SubmissionRequest, SubmissionReview, SubmissionStatus, WebsiteStatus,
};

use crate::websites::PgWebsiteRepository;

/// PostgreSQL implementation of SubmissionRepository.
pub struct PgSubmissionRepository {
    pool: Pool<Postgres>,
    websites: PgWebsiteRepository,
}

impl PgSubmissionRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            websites: PgWebsiteRepository::new(pool.clone()),
            pool,
        }
    }
}

fn map_row_to_submission(row: sqlx::postgres::PgRow) -> Result<SubmissionRequest> {
    let status_str: String = row.get("status");
    let status = SubmissionStatus::parse(&status_str)
        .ok_or_else(|| Error::Internal(format!("unknown submission status '{}'", status_str)))?;

    Ok(SubmissionRequest {
        id: row.get("id"),
        website_id: row.get("website_id"),
        payload: row.get("payload"),
        status,
        reviewed_by: row.get("reviewed_by"),
        reviewed_at: row.get("reviewed_at"),
        created_at_utc: row.get("created_at_utc"),
        updated_at_utc: row.get("updated_at_utc"),
    })
}

#[async_trait]
impl SubmissionRepository for PgSubmissionRepository {
    async fn create(&self, payload: JsonValue) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO submission_request (id, payload, status, created_at_utc, updated_at_utc)
             VALUES ($1, $2, 'pending', $3, $3)",
        )
        .bind(id)
        .bind(payload)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<SubmissionRequest> {
        let row = sqlx::query(
            "SELECT id, website_id, payload, status, reviewed_by, reviewed_at,
                    created_at_utc, updated_at_utc
             FROM submission_request WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::NotFound(format!("Submission {} not found", id)))?;

        map_row_to_submission(row)
    }

    async fn list(
        &self,
        status: Option<SubmissionStatus>,
        page: PageParams,
    ) -> Result<ListSubmissionsResponse> {
        let page = page.normalize();
        let (status_clause, limit_idx) = match status {
            Some(_) => ("WHERE status = $1", 2),
            None => ("", 1),
        };

        let count_sql = format!(
            "SELECT COUNT(*) FROM submission_request {}",
            status_clause
        );
        let total: i64 = {
            let mut q = sqlx::query_scalar(&count_sql);
            if let Some(s) = status {
                q = q.bind(s.as_str());
            }
            q.fetch_one(&self.pool).await.map_err(Error::Database)?
        };

        let rows_sql = format!(
            "SELECT id, website_id, payload, status, reviewed_by, reviewed_at,
                    created_at_utc, updated_at_utc
             FROM submission_request {}
             ORDER BY created_at_utc DESC
             LIMIT ${} OFFSET ${}",
            status_clause,
            limit_idx,
            limit_idx + 1,
        );
        let rows = {
            let mut q = sqlx::query(&rows_sql);
            if let Some(s) = status {
                q = q.bind(s.as_str());
            }
            q.bind(page.limit())
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await
                .map_err(Error::Database)?
        };

        let submissions = rows
            .into_iter()
            .map(map_row_to_submission)
            .collect::<Result<Vec<_>>>()?;

        Ok(ListSubmissionsResponse { submissions, total })
    }

    async fn review(&self, id: Uuid, review: SubmissionReview) -> Result<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let row = sqlx::query("SELECT status, payload FROM submission_request WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::NotFound(format!("Submission {} not found", id)))?;

        let status_str: String = row.get("status");
        if SubmissionStatus::parse(&status_str) != Some(SubmissionStatus::Pending) {
            return Err(Error::InvalidInput(
                "submission has already been reviewed".to_string(),
            ));
        }

        // Approval materializes the website row; the stored payload is
        // re-validated against the current schema before insertion.
        let website_id = if review.status == SubmissionStatus::Approved {
            let payload: JsonValue = row.get("payload");
            let input: CreateWebsiteInput = serde_json::from_value(payload)
                .map_err(|e| Error::Serialization(e.to_string()))?;
            let website = input.validate().map_err(Error::Validation)?;
            Some(
                self.websites
                    .insert_tx(&mut tx, website, WebsiteStatus::Active)
                    .await?,
            )
        } else {
            None
        };

        sqlx::query(
            "UPDATE submission_request
             SET status = $1, website_id = COALESCE($2, website_id),
                 reviewed_by = $3, reviewed_at = $4, updated_at_utc = $4
             WHERE id = $5",
        )
        .bind(review.status.as_str())
        .bind(website_id)
        .bind(&review.reviewed_by)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        sqlx::query(
            "INSERT INTO audit_log (id, actor, action, entity_type, entity_id, changes, created_at_utc)
             VALUES ($1, $2, 'review_submission', 'submission', $3, $4, $5)",
        )
        .bind(new_v7())
        .bind(&review.reviewed_by)
        .bind(id.to_string())
        .bind(serde_json::json!({
            "status": review.status.as_str(),
            "website_id": website_id,
        }))
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }
}
