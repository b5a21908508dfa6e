//! Submission repository over Postgres.
//!
//! Every state transition is a single `UPDATE ... WHERE id = $1 AND status =
//! 'processing' RETURNING *`, so readers only ever observe the record before
//! or after a transition, never in between. A transition that matches no row
//! (record deleted mid-flight, or already terminal) returns `None`.

use promptforge_core::models::{Submission, SubmissionListQuery, SubmissionStats};
use promptforge_core::AppError;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::store::{CompletionUpdate, NewSubmission};

const SUBMISSION_COLUMNS: &str = "id, title, status, input_type, raw_text, file_urls, \
     file_names, file_types, refined_prompt, completeness_score, validation_passed, \
     validation_errors, processing_time_ms, error_message, created_at, updated_at";

/// Escape LIKE wildcards in user-supplied search text.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Assemble the history query. Filters only bind when present; the limit is
/// clamped to 1..=500 and defaults to 50. The id tiebreaker keeps ordering
/// stable across identical queries when records share a creation timestamp.
fn build_list_query(query: &SubmissionListQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT {SUBMISSION_COLUMNS} FROM prompt_submissions WHERE TRUE"
    ));

    if let Some(status) = query.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(input_type) = query.input_type {
        builder.push(" AND input_type = ").push_bind(input_type);
    }
    if let Some(search) = query.search.as_deref() {
        let search = search.trim();
        if !search.is_empty() {
            let pattern = format!("%{}%", escape_like(search));
            builder
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR raw_text ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    let limit = query
        .limit
        .unwrap_or(promptforge_core::constants::DEFAULT_HISTORY_LIMIT)
        .clamp(1, 500);
    builder
        .push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(limit);
    builder
}

#[derive(Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new record in `processing`.
    #[tracing::instrument(skip(self, new), fields(input_type = %new.input_type))]
    pub async fn insert_processing(&self, new: NewSubmission) -> Result<Submission, AppError> {
        let submission = sqlx::query_as::<Postgres, Submission>(&format!(
            r#"
            INSERT INTO prompt_submissions (
                status, input_type, raw_text, file_urls, file_names, file_types
            )
            VALUES ('processing', $1, $2, $3, $4, $5)
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(new.input_type)
        .bind(new.raw_text)
        .bind(new.file_urls)
        .bind(new.file_names)
        .bind(new.file_types)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to insert submission record");
            AppError::Database(e)
        })?;

        tracing::debug!(submission_id = %submission.id, "Submission record created");
        Ok(submission)
    }

    /// Terminal transition: `processing` → `completed`.
    #[tracing::instrument(skip(self, update))]
    pub async fn mark_completed(
        &self,
        id: Uuid,
        update: CompletionUpdate,
    ) -> Result<Option<Submission>, AppError> {
        let refined_json = serde_json::to_value(&update.refined_prompt)?;

        let submission = sqlx::query_as::<Postgres, Submission>(&format!(
            r#"
            UPDATE prompt_submissions
            SET status = 'completed',
                title = $2,
                refined_prompt = $3,
                completeness_score = $4,
                validation_passed = $5,
                processing_time_ms = $6,
                updated_at = now()
            WHERE id = $1 AND status = 'processing'
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.title)
        .bind(refined_json)
        .bind(update.completeness_score)
        .bind(update.validation_passed)
        .bind(update.processing_time_ms)
        .fetch_optional(&self.pool)
        .await?;

        if submission.is_none() {
            tracing::warn!(submission_id = %id, "Completion update matched no processing record, skipping");
        }
        Ok(submission)
    }

    /// Terminal transition: `processing` → `failed`.
    #[tracing::instrument(skip(self))]
    pub async fn mark_failed(
        &self,
        id: Uuid,
        error_message: &str,
    ) -> Result<Option<Submission>, AppError> {
        let submission = sqlx::query_as::<Postgres, Submission>(&format!(
            r#"
            UPDATE prompt_submissions
            SET status = 'failed',
                error_message = $2,
                updated_at = now()
            WHERE id = $1 AND status = 'processing'
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(error_message)
        .fetch_optional(&self.pool)
        .await?;

        if submission.is_none() {
            tracing::warn!(submission_id = %id, "Failure update matched no processing record, skipping");
        }
        Ok(submission)
    }

    /// Terminal transition: `processing` → `rejected`. The reason becomes
    /// both the error message and the sole validation error; the score and
    /// validation flag are projected to 0/false so history needs no special
    /// casing.
    #[tracing::instrument(skip(self))]
    pub async fn mark_rejected(
        &self,
        id: Uuid,
        reason: &str,
    ) -> Result<Option<Submission>, AppError> {
        let submission = sqlx::query_as::<Postgres, Submission>(&format!(
            r#"
            UPDATE prompt_submissions
            SET status = 'rejected',
                error_message = $2,
                validation_errors = ARRAY[$2::text],
                completeness_score = 0,
                validation_passed = FALSE,
                updated_at = now()
            WHERE id = $1 AND status = 'processing'
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await?;

        if submission.is_none() {
            tracing::warn!(submission_id = %id, "Rejection update matched no processing record, skipping");
        }
        Ok(submission)
    }

    /// History query: optional status/input-type filters and case-insensitive
    /// substring search over title and raw text, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: &SubmissionListQuery) -> Result<Vec<Submission>, AppError> {
        let submissions = build_list_query(query)
            .build_query_as::<Submission>()
            .fetch_all(&self.pool)
            .await?;
        Ok(submissions)
    }

    /// Fetch a single record by id.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Submission>, AppError> {
        let submission = sqlx::query_as::<Postgres, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM prompt_submissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(submission)
    }

    /// Delete a record by id. Deleting an absent record is not an error.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM prompt_submissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            submission_id = %id,
            deleted = result.rows_affected(),
            "Delete submission"
        );
        Ok(())
    }

    /// Per-status record counts for the history view.
    #[tracing::instrument(skip(self))]
    pub async fn stats(&self) -> Result<SubmissionStats, AppError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'processing') AS processing,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                COUNT(*) FILTER (WHERE status = 'failed') AS failed,
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected
            FROM prompt_submissions
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(SubmissionStats {
            total: row.get("total"),
            pending: row.get("pending"),
            processing: row.get("processing"),
            completed: row.get("completed"),
            failed: row.get("failed"),
            rejected: row.get("rejected"),
        })
    }
}
