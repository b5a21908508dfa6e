//! Submission handlers: submit, history, get, delete, stats.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use promptforge_core::validation::{validate_submit_input, FileCheck};
use promptforge_core::{AppError, Submission, SubmissionListQuery, SubmissionStats};
use promptforge_pipeline::{SubmitRequest, UploadFile};

use crate::error::HttpAppError;
use crate::state::AppState;

/// `POST /api/v0/submissions`
///
/// Multipart body: an optional `text` field plus zero or more `files`
/// fields. Validation runs before any upload; the response is the terminal
/// submission record.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Submission>, HttpAppError> {
    let mut text = String::new();
    let mut files: Vec<UploadFile> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        HttpAppError(AppError::InvalidInput(format!(
            "Malformed multipart body: {}",
            e
        )))
    })? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("text") => {
                text = field.text().await.map_err(|e| {
                    HttpAppError(AppError::InvalidInput(format!(
                        "Failed to read text field: {}",
                        e
                    )))
                })?;
            }
            Some("files") => {
                let name = field
                    .file_name()
                    .unwrap_or("file")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        HttpAppError(AppError::InvalidInput(format!(
                            "Failed to read file {}: {}",
                            name, e
                        )))
                    })?
                    .to_vec();
                files.push(UploadFile {
                    name,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    let checks: Vec<FileCheck<'_>> = files
        .iter()
        .map(|f| FileCheck {
            name: &f.name,
            content_type: &f.content_type,
            size_bytes: f.data.len(),
        })
        .collect();
    validate_submit_input(&text, &checks).map_err(HttpAppError)?;

    let submission = state
        .service
        .submit(SubmitRequest { text, files })
        .await
        .map_err(HttpAppError)?;
    Ok(Json(submission))
}

/// `GET /api/v0/submissions` with optional `status`, `input_type`, `search`
/// and `limit` query parameters. Newest first, limit defaults to 50.
pub async fn list_submissions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SubmissionListQuery>,
) -> Result<Json<Vec<Submission>>, HttpAppError> {
    let submissions = state.repository.list(&query).await.map_err(HttpAppError)?;
    Ok(Json(submissions))
}

/// `GET /api/v0/submissions/{id}`
pub async fn get_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Submission>, HttpAppError> {
    let submission = state
        .repository
        .get(id)
        .await
        .map_err(HttpAppError)?
        .ok_or_else(|| HttpAppError(AppError::NotFound(format!("Submission {}", id))))?;
    Ok(Json(submission))
}

/// `DELETE /api/v0/submissions/{id}`. Deleting an absent record succeeds.
pub async fn delete_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    state.repository.delete(id).await.map_err(HttpAppError)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/v0/submissions/stats`, record counts per status.
pub async fn submission_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SubmissionStats>, HttpAppError> {
    let stats = state.repository.stats().await.map_err(HttpAppError)?;
    Ok(Json(stats))
}
