//! The refinement pipeline orchestrator.
//!
//! One `submit` call drives the whole lifecycle: upload files, create the
//! `processing` record, call the completion gateway, interpret the result,
//! and move the record to exactly one terminal state. Gateway and
//! interpretation failures are recorded on the submission rather than
//! surfaced as errors; only pre-record failures (uploads, inserts) error out.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use promptforge_core::error::AppError;
use promptforge_core::models::refined::RefinedPrompt;
use promptforge_core::models::submission::{StoredFile, Submission, SubmissionStatus};
use promptforge_db::store::{CompletionUpdate, NewSubmission, SubmissionStore};
use promptforge_gateway::CompletionClient;
use promptforge_storage::Storage;

use crate::finalize::finalize;
use crate::interpret::{interpret, Interpretation, PARSE_ERROR_MESSAGE};
use crate::normalize::{classify_input, normalize_input};

/// Rejection reason recorded when a submission carries nothing to refine.
const NO_INPUT_REASON: &str = "No input provided";

/// One file as received from the client, before upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A validated submit request. Input limits are enforced by the caller
/// before construction.
#[derive(Debug, Clone, Default)]
pub struct SubmitRequest {
    pub text: String,
    pub files: Vec<UploadFile>,
}

/// The decided fate of a submission, before it is written to the store.
///
/// Exactly one outcome is produced per submission; `apply_outcome` projects
/// it onto the flat record in a single store update.
#[derive(Debug)]
pub enum SubmissionOutcome {
    Completed {
        refined: RefinedPrompt,
        title: String,
        score: i32,
        validation_passed: bool,
        processing_time_ms: i64,
    },
    Failed {
        message: String,
    },
    Rejected {
        reason: String,
    },
}

/// Drives a submission from raw input to a terminal record.
pub struct SubmissionService {
    store: Arc<dyn SubmissionStore>,
    storage: Arc<dyn Storage>,
    client: Arc<dyn CompletionClient>,
}

impl SubmissionService {
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        storage: Arc<dyn Storage>,
        client: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            store,
            storage,
            client,
        }
    }

    /// Run one submission through the pipeline and return its terminal record.
    ///
    /// Errors are returned only for failures that happen before a record
    /// exists (uploads, the insert itself). Once the `processing` record is
    /// in place, every outcome lands on the record instead.
    #[tracing::instrument(skip_all, fields(file_count = request.files.len()))]
    pub async fn submit(&self, request: SubmitRequest) -> Result<Submission, AppError> {
        let stored_files = self.upload_all(&request.files).await?;
        let input_type = classify_input(&request.text, &stored_files);

        let raw_text = {
            let trimmed = request.text.trim();
            (!trimmed.is_empty()).then(|| request.text.clone())
        };
        let record = self
            .store
            .insert_processing(NewSubmission {
                input_type,
                raw_text,
                file_urls: stored_files.iter().map(|f| f.url.clone()).collect(),
                file_names: stored_files.iter().map(|f| f.name.clone()).collect(),
                file_types: stored_files.iter().map(|f| f.content_type.clone()).collect(),
            })
            .await?;
        tracing::info!(
            submission_id = %record.id,
            input_type = %input_type,
            file_count = stored_files.len(),
            "Submission created"
        );

        let parts = normalize_input(&request.text, &stored_files);
        if parts.is_empty() {
            let outcome = SubmissionOutcome::Rejected {
                reason: NO_INPUT_REASON.to_string(),
            };
            return self.apply_outcome(record, outcome).await;
        }

        let started = Instant::now();
        let completion = self.client.complete(parts).await;
        let elapsed_ms = started.elapsed().as_millis() as i64;

        let outcome = match completion {
            Err(e) => {
                if e.is_transient() {
                    tracing::warn!(submission_id = %record.id, error = %e, "Gateway throttled the request");
                } else {
                    tracing::error!(submission_id = %record.id, error = %e, "Gateway call failed");
                }
                SubmissionOutcome::Failed {
                    message: e.to_string(),
                }
            }
            Ok(raw) => match interpret(&raw) {
                Interpretation::Malformed => SubmissionOutcome::Failed {
                    message: PARSE_ERROR_MESSAGE.to_string(),
                },
                Interpretation::Rejected { reason } => SubmissionOutcome::Rejected { reason },
                Interpretation::Refined(refined) => {
                    let finalized = finalize(*refined, &request.text, &stored_files);
                    SubmissionOutcome::Completed {
                        title: finalized.title,
                        score: finalized.refined.metadata.confidence_score,
                        validation_passed: finalized.validation_passed,
                        refined: finalized.refined,
                        processing_time_ms: elapsed_ms,
                    }
                }
            },
        };
        self.apply_outcome(record, outcome).await
    }

    /// Upload every file before any record exists. The first failure aborts
    /// the whole submission.
    async fn upload_all(&self, files: &[UploadFile]) -> Result<Vec<StoredFile>, AppError> {
        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            let (key, url) = self
                .storage
                .upload(&file.name, &file.content_type, file.data.clone())
                .await
                .map_err(|e| AppError::UploadFailed {
                    file_name: file.name.clone(),
                    message: e.to_string(),
                })?;
            tracing::debug!(storage_key = %key, file_name = %file.name, "File uploaded");
            stored.push(StoredFile {
                url,
                name: file.name.clone(),
                content_type: file.content_type.clone(),
            });
        }
        Ok(stored)
    }

    /// Write the outcome to the store in a single terminal transition. A
    /// record deleted mid-flight surfaces as `None`; the response is then
    /// projected in memory so the caller still sees a coherent terminal
    /// submission.
    async fn apply_outcome(
        &self,
        record: Submission,
        outcome: SubmissionOutcome,
    ) -> Result<Submission, AppError> {
        match outcome {
            SubmissionOutcome::Completed {
                refined,
                title,
                score,
                validation_passed,
                processing_time_ms,
            } => {
                let update = CompletionUpdate {
                    title,
                    refined_prompt: refined,
                    completeness_score: score,
                    validation_passed,
                    processing_time_ms,
                };
                tracing::info!(
                    submission_id = %record.id,
                    score,
                    validation_passed,
                    processing_time_ms,
                    "Submission refined"
                );
                match self.store.mark_completed(record.id, update.clone()).await? {
                    Some(submission) => Ok(submission),
                    None => Ok(project_completed(record, update)),
                }
            }
            SubmissionOutcome::Failed { message } => {
                match self.store.mark_failed(record.id, &message).await? {
                    Some(submission) => Ok(submission),
                    None => Ok(project_failed(record, &message)),
                }
            }
            SubmissionOutcome::Rejected { reason } => {
                tracing::info!(submission_id = %record.id, reason = %reason, "Submission rejected");
                match self.store.mark_rejected(record.id, &reason).await? {
                    Some(submission) => Ok(submission),
                    None => Ok(project_rejected(record, &reason)),
                }
            }
        }
    }
}

// The project_* helpers mirror the store's terminal transitions so a record
// deleted mid-flight still produces a coherent response. Nothing is
// persisted for a vanished record.

fn project_completed(mut record: Submission, update: CompletionUpdate) -> Submission {
    record.status = SubmissionStatus::Completed;
    record.title = Some(update.title);
    record.refined_prompt = Some(update.refined_prompt);
    record.completeness_score = Some(update.completeness_score);
    record.validation_passed = update.validation_passed;
    record.processing_time_ms = Some(update.processing_time_ms);
    record.updated_at = Utc::now();
    record
}

fn project_failed(mut record: Submission, message: &str) -> Submission {
    record.status = SubmissionStatus::Failed;
    record.error_message = Some(message.to_string());
    record.updated_at = Utc::now();
    record
}

fn project_rejected(mut record: Submission, reason: &str) -> Submission {
    record.status = SubmissionStatus::Rejected;
    record.error_message = Some(reason.to_string());
    record.validation_errors = vec![reason.to_string()];
    record.completeness_score = Some(0);
    record.validation_passed = false;
    record.updated_at = Utc::now();
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{InMemorySubmissionStore, MockCompletionClient, MockStorage};
    use promptforge_core::models::submission::InputType;
    use promptforge_gateway::GatewayError;
    use serde_json::json;

    fn service(
        client: MockCompletionClient,
    ) -> (SubmissionService, Arc<InMemorySubmissionStore>, Arc<MockCompletionClient>) {
        let store = Arc::new(InMemorySubmissionStore::new());
        let client = Arc::new(client);
        let service = SubmissionService::new(
            store.clone(),
            Arc::new(MockStorage::new()),
            client.clone(),
        );
        (service, store, client)
    }

    fn text_request(text: &str) -> SubmitRequest {
        SubmitRequest {
            text: text.to_string(),
            files: vec![],
        }
    }

    fn png_file(name: &str) -> UploadFile {
        UploadFile {
            name: name.to_string(),
            content_type: "image/png".to_string(),
            data: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    fn refined_completion() -> String {
        json!({
            "refinedPrompt": {
                "metadata": { "confidence_score": 85 },
                "product_overview": { "title": "Recipe App", "description": "Meal planning" },
                "requirements": { "functional": ["browse recipes"] },
                "validation_flags": { "missing_sections": [], "ambiguous_items": [] }
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected_without_gateway_call() {
        let (service, store, client) = service(MockCompletionClient::new());

        let submission = service.submit(text_request("   ")).await.unwrap();
        assert_eq!(submission.status, SubmissionStatus::Rejected);
        assert_eq!(submission.error_message.as_deref(), Some("No input provided"));
        assert_eq!(submission.validation_errors, vec!["No input provided"]);
        assert_eq!(submission.completeness_score, Some(0));
        assert_eq!(client.call_count(), 0);

        // The rejected record is persisted, not discarded.
        let persisted = store.get(submission.id).unwrap();
        assert_eq!(persisted.status, SubmissionStatus::Rejected);
    }

    #[tokio::test]
    async fn test_model_rejection_propagates_reason() {
        let (service, _store, client) = service(MockCompletionClient::with_text(
            json!({ "rejected": true, "reason": "Not a product description" }).to_string(),
        ));

        let submission = service
            .submit(text_request("the weather is nice today"))
            .await
            .unwrap();
        assert_eq!(submission.status, SubmissionStatus::Rejected);
        assert_eq!(
            submission.error_message.as_deref(),
            Some("Not a product description")
        );
        assert_eq!(submission.validation_errors, vec!["Not a product description"]);
        assert_eq!(submission.completeness_score, Some(0));
        assert!(!submission.validation_passed);
        assert_eq!(client.call_count(), 1);
        assert!(submission.is_consistent());
    }

    #[tokio::test]
    async fn test_fenced_completion_reaches_completed() {
        let fenced = format!("```json\n{}\n```", refined_completion());
        let (service, _store, _client) = service(MockCompletionClient::with_text(fenced));

        let submission = service
            .submit(text_request("Build a recipe application for home cooks"))
            .await
            .unwrap();
        assert_eq!(submission.status, SubmissionStatus::Completed);
        assert_eq!(submission.title.as_deref(), Some("Recipe App"));
        assert_eq!(submission.completeness_score, Some(85));
        assert!(submission.validation_passed);
        assert!(submission.processing_time_ms.is_some());
        assert!(submission.is_consistent());

        let refined = submission.refined_prompt.unwrap();
        assert_eq!(refined.metadata.source_types, vec![InputType::Text]);
        assert_ne!(refined.metadata.id, uuid::Uuid::nil());
    }

    #[tokio::test]
    async fn test_rate_limited_gateway_marks_failed() {
        let (service, _store, _client) =
            service(MockCompletionClient::with_error(GatewayError::RateLimited));

        let submission = service
            .submit(text_request("Build a recipe application"))
            .await
            .unwrap();
        assert_eq!(submission.status, SubmissionStatus::Failed);
        assert!(submission
            .error_message
            .as_deref()
            .unwrap()
            .contains("Rate limit exceeded"));
        assert!(submission.refined_prompt.is_none());
    }

    #[tokio::test]
    async fn test_non_json_completion_marks_failed() {
        let (service, _store, _client) = service(MockCompletionClient::with_text(
            "Sure! Here is your refined prompt:".to_string(),
        ));

        let submission = service
            .submit(text_request("Build a recipe application"))
            .await
            .unwrap();
        assert_eq!(submission.status, SubmissionStatus::Failed);
        assert_eq!(
            submission.error_message.as_deref(),
            Some("Failed to parse AI response")
        );
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_before_record_exists() {
        let store = Arc::new(InMemorySubmissionStore::new());
        let storage = Arc::new(MockStorage::failing_on("bad.png"));
        let client = Arc::new(MockCompletionClient::new());
        let service = SubmissionService::new(store.clone(), storage, client.clone());

        let result = service
            .submit(SubmitRequest {
                text: "Build a recipe application".to_string(),
                files: vec![png_file("bad.png")],
            })
            .await;
        match result {
            Err(AppError::UploadFailed { file_name, .. }) => assert_eq!(file_name, "bad.png"),
            other => panic!("expected upload failure, got {:?}", other),
        }
        assert_eq!(store.len(), 0);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mixed_input_classification_and_source_types() {
        let (service, _store, _client) =
            service(MockCompletionClient::with_text(refined_completion()));

        let submission = service
            .submit(SubmitRequest {
                text: "Build a recipe application".to_string(),
                files: vec![png_file("mockup.png")],
            })
            .await
            .unwrap();
        assert_eq!(submission.input_type, InputType::Mixed);
        assert_eq!(submission.file_names, vec!["mockup.png"]);
        assert_eq!(submission.file_types, vec!["image/png"]);
        assert_eq!(submission.file_urls.len(), 1);

        let refined = submission.refined_prompt.unwrap();
        assert_eq!(
            refined.metadata.source_types,
            vec![InputType::Text, InputType::Image]
        );
    }

    #[tokio::test]
    async fn test_record_deleted_mid_flight_still_returns_terminal_result() {
        let (service, store, _client) =
            service(MockCompletionClient::with_text(refined_completion()));
        store.vanish_on_update(true);

        let submission = service
            .submit(text_request("Build a recipe application"))
            .await
            .unwrap();
        // The response is coherent even though nothing was persisted.
        assert_eq!(submission.status, SubmissionStatus::Completed);
        assert!(submission.is_consistent());
        assert_eq!(store.len(), 0);
    }
}
