//! Store trait abstraction for pipeline testing
//!
//! This trait defines the minimal persistence interface the submission
//! pipeline needs, allowing for easy mocking and testing without database
//! dependencies.

use anyhow::Result;
use async_trait::async_trait;
use promptforge_core::models::{InputType, RefinedPrompt, Submission};
use uuid::Uuid;

use crate::repository::SubmissionRepository;

/// Fields known at record creation time, before the gateway call.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub input_type: InputType,
    pub raw_text: Option<String>,
    pub file_urls: Vec<String>,
    pub file_names: Vec<String>,
    pub file_types: Vec<String>,
}

/// Fields applied on the `processing` → `completed` transition.
#[derive(Debug, Clone)]
pub struct CompletionUpdate {
    pub title: String,
    pub refined_prompt: RefinedPrompt,
    pub completeness_score: i32,
    pub validation_passed: bool,
    pub processing_time_ms: i64,
}

/// Persistence operations used by the submission state machine.
///
/// Each `mark_*` method is a single atomic update and only applies while the
/// record is still in `processing`; `Ok(None)` means the record vanished (or
/// already reached a terminal state) and the caller treats it as a no-op.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist a new record in `processing`.
    async fn insert_processing(&self, new: NewSubmission) -> Result<Submission>;

    /// Transition to `completed` with the finalized refinement.
    async fn mark_completed(
        &self,
        id: Uuid,
        update: CompletionUpdate,
    ) -> Result<Option<Submission>>;

    /// Transition to `failed`, recording the error message.
    async fn mark_failed(&self, id: Uuid, error_message: &str) -> Result<Option<Submission>>;

    /// Transition to `rejected`, recording the reason as both the error
    /// message and the sole validation error.
    async fn mark_rejected(&self, id: Uuid, reason: &str) -> Result<Option<Submission>>;
}

#[async_trait]
impl SubmissionStore for SubmissionRepository {
    async fn insert_processing(&self, new: NewSubmission) -> Result<Submission> {
        SubmissionRepository::insert_processing(self, new)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }

    async fn mark_completed(
        &self,
        id: Uuid,
        update: CompletionUpdate,
    ) -> Result<Option<Submission>> {
        SubmissionRepository::mark_completed(self, id, update)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }

    async fn mark_failed(&self, id: Uuid, error_message: &str) -> Result<Option<Submission>> {
        SubmissionRepository::mark_failed(self, id, error_message)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }

    async fn mark_rejected(&self, id: Uuid, reason: &str) -> Result<Option<Submission>> {
        SubmissionRepository::mark_rejected(self, id, reason)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
