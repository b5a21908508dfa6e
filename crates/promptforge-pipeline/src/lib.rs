//! Promptforge Pipeline Library
//!
//! The refinement pipeline: normalize a submission's inputs into gateway
//! content parts, interpret the completion, post-process the refinement, and
//! drive the submission record to exactly one terminal state. The pipeline
//! talks to its collaborators only through traits (`SubmissionStore`,
//! `Storage`, `CompletionClient`); `test_helpers` provides in-memory fakes
//! for all three.

pub mod finalize;
pub mod interpret;
pub mod normalize;
pub mod service;
pub mod test_helpers;

pub use interpret::{interpret, Interpretation};
pub use normalize::{classify_input, normalize_input};
pub use service::{SubmissionOutcome, SubmissionService, SubmitRequest, UploadFile};
