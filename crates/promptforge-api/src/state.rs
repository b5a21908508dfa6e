//! Shared application state.

use std::sync::Arc;

use promptforge_db::SubmissionRepository;
use promptforge_pipeline::SubmissionService;

pub struct AppState {
    /// Direct repository access for the read/delete handlers.
    pub repository: Arc<SubmissionRepository>,
    /// The refinement pipeline behind the submit handler.
    pub service: SubmissionService,
}
