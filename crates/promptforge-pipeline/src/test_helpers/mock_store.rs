//! In-memory submission store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use promptforge_core::constants::DEFAULT_HISTORY_LIMIT;
use promptforge_core::models::submission::{Submission, SubmissionListQuery, SubmissionStatus};
use promptforge_db::store::{CompletionUpdate, NewSubmission, SubmissionStore};

/// Backs the pipeline with a `HashMap` and mirrors the repository's
/// guard: terminal transitions only apply to records still in `processing`.
/// `vanish_on_update` simulates a concurrent delete by dropping the record
/// instead of updating it.
#[derive(Default)]
pub struct InMemorySubmissionStore {
    submissions: Mutex<HashMap<Uuid, Submission>>,
    vanish_on_update: AtomicBool,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vanish_on_update(&self, vanish: bool) {
        self.vanish_on_update.store(vanish, Ordering::SeqCst);
    }

    pub fn get(&self, id: Uuid) -> Option<Submission> {
        self.submissions
            .lock()
            .expect("submissions lock poisoned")
            .get(&id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.submissions
            .lock()
            .expect("submissions lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// History query with the same semantics as the database repository:
    /// optional status and input type filters, case-insensitive substring
    /// search over title and raw text, newest-first with the id as a
    /// tiebreaker, limit clamped to 1..=500 and defaulting to 50.
    pub fn list(&self, query: &SubmissionListQuery) -> Vec<Submission> {
        let submissions = self.submissions.lock().expect("submissions lock poisoned");
        let needle = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut matches: Vec<Submission> = submissions
            .values()
            .filter(|s| query.status.map_or(true, |status| s.status == status))
            .filter(|s| query.input_type.map_or(true, |ty| s.input_type == ty))
            .filter(|s| {
                let Some(needle) = &needle else { return true };
                let title_hit = s
                    .title
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(needle));
                let text_hit = s
                    .raw_text
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(needle));
                title_hit || text_hit
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let limit = query
            .limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, 500) as usize;
        matches.truncate(limit);
        matches
    }

    fn transition<F>(&self, id: Uuid, apply: F) -> Option<Submission>
    where
        F: FnOnce(&mut Submission),
    {
        let mut submissions = self.submissions.lock().expect("submissions lock poisoned");
        if self.vanish_on_update.load(Ordering::SeqCst) {
            submissions.remove(&id);
            return None;
        }
        let submission = submissions.get_mut(&id)?;
        if submission.status != SubmissionStatus::Processing {
            return None;
        }
        apply(submission);
        submission.updated_at = Utc::now();
        Some(submission.clone())
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn insert_processing(&self, new: NewSubmission) -> Result<Submission> {
        let now = Utc::now();
        let submission = Submission {
            id: Uuid::new_v4(),
            title: None,
            status: SubmissionStatus::Processing,
            input_type: new.input_type,
            raw_text: new.raw_text,
            file_urls: new.file_urls,
            file_names: new.file_names,
            file_types: new.file_types,
            refined_prompt: None,
            completeness_score: None,
            validation_passed: false,
            validation_errors: vec![],
            processing_time_ms: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        };
        self.submissions
            .lock()
            .expect("submissions lock poisoned")
            .insert(submission.id, submission.clone());
        Ok(submission)
    }

    async fn mark_completed(
        &self,
        id: Uuid,
        update: CompletionUpdate,
    ) -> Result<Option<Submission>> {
        Ok(self.transition(id, |s| {
            s.status = SubmissionStatus::Completed;
            s.title = Some(update.title);
            s.refined_prompt = Some(update.refined_prompt);
            s.completeness_score = Some(update.completeness_score);
            s.validation_passed = update.validation_passed;
            s.processing_time_ms = Some(update.processing_time_ms);
        }))
    }

    async fn mark_failed(&self, id: Uuid, error_message: &str) -> Result<Option<Submission>> {
        Ok(self.transition(id, |s| {
            s.status = SubmissionStatus::Failed;
            s.error_message = Some(error_message.to_string());
        }))
    }

    async fn mark_rejected(&self, id: Uuid, reason: &str) -> Result<Option<Submission>> {
        Ok(self.transition(id, |s| {
            s.status = SubmissionStatus::Rejected;
            s.error_message = Some(reason.to_string());
            s.validation_errors = vec![reason.to_string()];
            s.completeness_score = Some(0);
            s.validation_passed = false;
        }))
    }
}
