//! Domain models
//!
//! Submission records and the structured refinement produced from them.

pub mod refined;
pub mod submission;

pub use refined::{
    Constraints, Deliverables, FinalizedRefinement, ProductOverview, RefinedPrompt,
    RefinedPromptMetadata, Requirements, ValidationFlags,
};
pub use submission::{
    InputType, StoredFile, Submission, SubmissionListQuery, SubmissionStats, SubmissionStatus,
};
